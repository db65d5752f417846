use bevy::prelude::*;

use crate::resources::simulation::seed_fragment;
use crate::resources::universe::Universe;

/// Résumé périodique de l'état de la simulation
pub fn debug_universe_activity(time: Res<Time>, mut timer: Local<Timer>, universe: Res<Universe>) {
    // Initialiser le timer la première fois
    if timer.duration() == std::time::Duration::ZERO {
        *timer = Timer::from_seconds(5.0, TimerMode::Repeating);
    }

    timer.tick(time.delta());

    if timer.just_finished() {
        if universe.particle_count() == 0 {
            warn!("Aucune particule dans la simulation!");
            return;
        }

        let clusters = universe.clusters();
        let active = clusters.iter().filter(|c| c.is_active()).count();

        debug!("=== Simulation {} ===", seed_fragment(universe.seed()));
        debug!("Ticks: {} | Particules: {}", universe.tick_count(), universe.particle_count());
        debug!("Activité moyenne: {:.3}", universe.activity());
        debug!("Clusters actifs: {}/{}", active, clusters.len());
    }
}
