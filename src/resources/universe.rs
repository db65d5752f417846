//! État complet d'une simulation, possédé par une seule poignée.
//!
//! Toute la génération aléatoire passe par la graine de la configuration :
//! même graine et même configuration donnent une mise en place identique au
//! bit près. Les reconfigurations se font entre deux ticks (`&mut self`).

use bevy::prelude::Resource;

use crate::components::cluster::Cluster;
use crate::components::particle::{Particle, ParticleSet};
use crate::error::ConfigError;
use crate::resources::grid::GridParameters;
use crate::resources::random::SeededRandom;
use crate::resources::rules::{RuleMatrix, RuleMutation};
use crate::resources::simulation::{
    SimulationConfig, validate_gravity, validate_time_scale, validate_viscosity, validate_wall_repel,
};
use crate::systems::clustering::ClusterTracker;
use crate::systems::movement::{self, Impulse};

#[derive(Resource, Debug, Clone)]
pub struct Universe {
    config: SimulationConfig,
    rules: RuleMatrix,
    particles: ParticleSet,
    rng: SeededRandom,
    clusters: ClusterTracker,
    impulse: Option<Impulse>,
    velocities: Vec<(f64, f64)>,
    activity: f64,
    tick_count: u64,
}

impl Universe {
    /// Valide la configuration puis tire règles et particules depuis la graine
    pub fn configure(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = SeededRandom::from_seed_value(config.seed);
        let rules = generate_rules(&config, &mut rng)?;
        let particles = ParticleSet::spawn(config.color_count, config.atoms_per_color, &config.grid, &mut rng);
        let clusters = ClusterTracker::new(config.clusters, config.seed);

        Ok(Self {
            velocities: Vec::with_capacity(particles.len()),
            config,
            rules,
            particles,
            rng,
            clusters,
            impulse: None,
            activity: 0.0,
            tick_count: 0,
        })
    }

    /// Remplace toute la simulation (couleurs, taille du monde, graine...)
    pub fn reconfigure(&mut self, config: SimulationConfig) -> Result<(), ConfigError> {
        *self = Self::configure(config)?;
        Ok(())
    }

    /// Repart de la graine configurée : nouvelles règles, nouvelles particules
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        self.reconfigure(self.config.clone())
    }

    /// Nouvelles règles depuis une graine, sans toucher aux particules
    pub fn randomize_rules(&mut self, seed: u64) -> Result<(), ConfigError> {
        let mut rng = SeededRandom::from_seed_value(seed);
        let rules = generate_rules(&self.config, &mut rng)?;
        self.config.seed = seed;
        self.rules = rules;
        self.rng = rng;
        Ok(())
    }

    /// Un pas complet : forces et vitesses, puis positions, puis clusters
    pub fn tick(&mut self) {
        self.activity = movement::step(
            self.particles.as_mut_slice(),
            &self.rules,
            &self.config,
            self.impulse.as_ref(),
            &mut self.velocities,
        );

        if let Some(impulse) = self.impulse.as_mut() {
            impulse.decay();
        }
        if self.impulse.is_some_and(|impulse| !impulse.is_active()) {
            self.impulse = None;
        }

        self.clusters.update(self.particles.as_slice(), &self.config.grid);
        self.tick_count += 1;
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn particles(&self) -> &[Particle] {
        self.particles.as_slice()
    }

    /// `[x, y, vx, vy, couleur]` par particule, sans copie
    pub fn particles_flat(&self) -> &[f64] {
        self.particles.as_flat()
    }

    pub fn clusters(&self) -> &[Cluster] {
        if self.config.clusters.enabled {
            self.clusters.clusters()
        } else {
            &[]
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleMatrix {
        &self.rules
    }

    pub fn grid(&self) -> &GridParameters {
        &self.config.grid
    }

    pub fn seed(&self) -> u64 {
        self.config.seed
    }

    pub fn activity(&self) -> f64 {
        self.activity
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn impulse(&self) -> Option<&Impulse> {
        self.impulse.as_ref()
    }

    /// Remplace les règles par des tableaux plats (forces ligne par ligne,
    /// rayons non élevés au carré)
    pub fn set_rules(&mut self, strengths: &[f64], radii: &[f64]) -> Result<(), ConfigError> {
        self.rules = RuleMatrix::from_flat(self.config.color_count, strengths, radii)?;
        Ok(())
    }

    pub fn set_viscosity(&mut self, viscosity: f64) -> Result<(), ConfigError> {
        validate_viscosity(viscosity)?;
        self.config.viscosity = viscosity;
        Ok(())
    }

    pub fn set_time_scale(&mut self, time_scale: f64) -> Result<(), ConfigError> {
        validate_time_scale(time_scale)?;
        self.config.time_scale = time_scale;
        Ok(())
    }

    pub fn set_wall_repel(&mut self, wall_repel: f64) -> Result<(), ConfigError> {
        validate_wall_repel(wall_repel)?;
        self.config.wall_repel = wall_repel;
        Ok(())
    }

    pub fn set_gravity(&mut self, gravity: f64) -> Result<(), ConfigError> {
        validate_gravity(gravity)?;
        self.config.gravity = gravity;
        Ok(())
    }

    pub fn set_toroid(&mut self, toroid: bool) {
        self.config.toroid = toroid;
    }

    /// Ne s'applique qu'aux prochaines générations de règles
    pub fn set_symmetric_rules(&mut self, symmetric: bool) {
        self.config.symmetric_rules = symmetric;
    }

    pub fn set_explore(&mut self, enabled: bool) {
        self.config.explore.enabled = enabled;
    }

    pub fn mutate_rules_once(&mut self) -> RuleMutation {
        self.rules.mutate(&mut self.rng)
    }

    /// Enregistre une impulsion qui s'éteint sur `duration_ticks` ticks.
    /// Remplace l'impulsion en cours s'il y en a une.
    pub fn apply_impulse(&mut self, x: f64, y: f64, magnitude: f64, duration_ticks: u32) -> Result<(), ConfigError> {
        ConfigError::check_range("impulse x", x, f64::MIN, f64::MAX)?;
        ConfigError::check_range("impulse y", y, f64::MIN, f64::MAX)?;
        ConfigError::check_range("impulse magnitude", magnitude, f64::MIN, f64::MAX)?;
        let impulse = Impulse::new(x, y, magnitude, duration_ticks);
        self.impulse = impulse.is_active().then_some(impulse);
        Ok(())
    }
}

fn generate_rules(config: &SimulationConfig, rng: &mut SeededRandom) -> Result<RuleMatrix, ConfigError> {
    let mut rules = RuleMatrix::generate(config.color_count, rng)?;
    if config.symmetric_rules {
        rules.symmetrize();
    }
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::globals::FIELDS_PER_PARTICLE;
    use crate::resources::simulation::ClusterSettings;

    fn small_config(seed: u64) -> SimulationConfig {
        SimulationConfig {
            grid: GridParameters::new(400.0, 300.0).unwrap(),
            color_count: 3,
            atoms_per_color: 40,
            seed,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn configure_rejects_invalid_config() {
        let config = SimulationConfig {
            color_count: 0,
            ..small_config(1)
        };
        assert!(matches!(Universe::configure(config), Err(ConfigError::InvalidColorCount(0))));
    }

    #[test]
    fn setup_consumes_rules_then_particles() {
        let universe = Universe::configure(small_config(77)).unwrap();
        let mut rng = SeededRandom::from_seed_value(77);
        let rules = RuleMatrix::generate(3, &mut rng).unwrap();
        let first_x = rng.next() * 400.0;
        let first_y = rng.next() * 300.0;
        assert_eq!(universe.rules(), &rules);
        assert_eq!(universe.particles()[0].x, first_x);
        assert_eq!(universe.particles()[0].y, first_y);
    }

    #[test]
    fn symmetric_mode_symmetrizes_generation() {
        let config = SimulationConfig {
            symmetric_rules: true,
            ..small_config(5)
        };
        let universe = Universe::configure(config).unwrap();
        assert!(universe.rules().is_symmetric());
    }

    #[test]
    fn tick_preserves_count_and_colors() {
        let mut universe = Universe::configure(small_config(3)).unwrap();
        let colors: Vec<usize> = universe.particles().iter().map(Particle::color_index).collect();
        for _ in 0..5 {
            universe.tick();
        }
        assert_eq!(universe.particle_count(), 120);
        assert_eq!(universe.tick_count(), 5);
        let after: Vec<usize> = universe.particles().iter().map(Particle::color_index).collect();
        assert_eq!(colors, after);
    }

    #[test]
    fn flat_view_matches_particles() {
        let mut universe = Universe::configure(small_config(4)).unwrap();
        universe.tick();
        let flat = universe.particles_flat();
        assert_eq!(flat.len(), universe.particle_count() * FIELDS_PER_PARTICLE);
        let p = universe.particles()[7];
        assert_eq!(&flat[35..40], &[p.x, p.y, p.vx, p.vy, p.color_index() as f64]);
    }

    #[test]
    fn set_rules_validates_dimensions() {
        let mut universe = Universe::configure(small_config(6)).unwrap();
        let before = universe.rules().clone();
        assert!(universe.set_rules(&[0.1; 4], &[10.0; 2]).is_err());
        assert_eq!(universe.rules(), &before);

        universe.set_rules(&[0.25; 9], &[10.0, 20.0, 30.0]).unwrap();
        assert_eq!(universe.rules().strength(2, 1), 0.25);
        assert_eq!(universe.rules().radius_squared(2), 900.0);
    }

    #[test]
    fn setters_reject_without_partial_application() {
        let mut universe = Universe::configure(small_config(8)).unwrap();
        assert!(universe.set_viscosity(3.0).is_err());
        assert!(universe.set_time_scale(0.0).is_err());
        assert!(universe.set_wall_repel(-5.0).is_err());
        assert!(universe.set_gravity(f64::INFINITY).is_err());
        assert_eq!(universe.config(), &small_config(8));

        universe.set_viscosity(1.2).unwrap();
        universe.set_time_scale(1.0).unwrap();
        universe.set_wall_repel(10.0).unwrap();
        universe.set_gravity(0.3).unwrap();
        universe.set_toroid(false);
        let config = universe.config();
        assert_eq!(
            (config.viscosity, config.time_scale, config.wall_repel, config.gravity, config.toroid),
            (1.2, 1.0, 10.0, 0.3, false)
        );
    }

    #[test]
    fn randomize_rules_keeps_particles() {
        let mut universe = Universe::configure(small_config(10)).unwrap();
        let particles = universe.particles().to_vec();
        universe.randomize_rules(11).unwrap();
        assert_eq!(universe.particles(), particles.as_slice());
        assert_eq!(universe.seed(), 11);
        let mut rng = SeededRandom::from_seed_value(11);
        assert_eq!(universe.rules(), &RuleMatrix::generate(3, &mut rng).unwrap());
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut universe = Universe::configure(small_config(12)).unwrap();
        let initial = universe.particles().to_vec();
        universe.tick();
        universe.mutate_rules_once();
        universe.reset().unwrap();
        assert_eq!(universe.particles(), initial.as_slice());
        assert_eq!(universe.tick_count(), 0);
    }

    #[test]
    fn impulse_expires_after_duration() {
        let mut universe = Universe::configure(small_config(13)).unwrap();
        universe.apply_impulse(200.0, 150.0, 5.0, 3).unwrap();
        assert!(universe.impulse().is_some());
        for _ in 0..3 {
            universe.tick();
        }
        assert!(universe.impulse().is_none());

        universe.apply_impulse(0.0, 0.0, 1.0, 0).unwrap();
        assert!(universe.impulse().is_none());
        assert!(universe.apply_impulse(f64::NAN, 0.0, 1.0, 3).is_err());
    }

    #[test]
    fn clusters_hidden_when_disabled() {
        let config = SimulationConfig {
            clusters: ClusterSettings {
                enabled: false,
                ..ClusterSettings::default()
            },
            ..small_config(14)
        };
        let mut universe = Universe::configure(config).unwrap();
        universe.tick();
        assert!(universe.clusters().is_empty());

        let mut universe = Universe::configure(small_config(14)).unwrap();
        universe.tick();
        assert_eq!(universe.clusters().len(), ClusterSettings::default().max_clusters);
    }
}
