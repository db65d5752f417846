use std::time::Duration;

use bevy::prelude::*;
use flume::{Receiver, Sender};

use crate::error::ConfigError;
use crate::resources::particle_types::{ColorIndex, ParticleTypesConfig};
use crate::resources::rules::RuleMutation;
use crate::resources::simulation::{SimulationConfig, seed_fragment};
use crate::resources::universe::Universe;
use crate::systems::debug::debug_universe_activity;

/// Commandes externes, appliquées entre deux ticks
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationCommand {
    Impulse {
        x: f64,
        y: f64,
        magnitude: f64,
        duration_ticks: u32,
    },
    MutateRules,
    SetRules {
        strengths: Vec<f64>,
        radii: Vec<f64>,
    },
    SetViscosity(f64),
    SetTimeScale(f64),
    SetWallRepel(f64),
    SetGravity(f64),
    SetToroid(bool),
    SetSymmetricRules(bool),
    SetExplore(bool),
    /// Nouvelles règles depuis la graine, particules conservées
    RandomizeRules(u64),
    /// Configuration tirée de la graine, taille du monde conservée
    RandomSetup(u64),
    Reconfigure(Box<SimulationConfig>),
    Reset,
}

/// File de commandes. Le `Sender` peut être cloné et envoyé à d'autres threads.
#[derive(Resource, Clone)]
pub struct SimulationCommands {
    sender: Sender<SimulationCommand>,
    receiver: Receiver<SimulationCommand>,
}

impl Default for SimulationCommands {
    fn default() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self { sender, receiver }
    }
}

impl SimulationCommands {
    pub fn sender(&self) -> Sender<SimulationCommand> {
        self.sender.clone()
    }

    pub fn send(&self, command: SimulationCommand) {
        // Le récepteur vit dans la même ressource, l'envoi ne peut pas échouer
        let _ = self.sender.send(command);
    }
}

/// Cadence des mutations d'exploration
#[derive(Resource, Debug)]
pub struct ExplorationTimer(pub Timer);

impl ExplorationTimer {
    pub fn new(period: f32) -> Self {
        Self(Timer::from_seconds(period, TimerMode::Repeating))
    }
}

#[derive(Default)]
pub struct ParticleLifePlugin {
    pub config: SimulationConfig,
}

impl ParticleLifePlugin {
    pub fn with_config(config: SimulationConfig) -> Self {
        Self { config }
    }
}

impl Plugin for ParticleLifePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationCommands>()
            .insert_resource(ExplorationTimer::new(self.config.explore.period));

        match setup_resources(&self.config) {
            Ok((universe, types)) => {
                info!(
                    "Simulation prête: {} particules, {} couleurs, graine {}",
                    universe.particle_count(),
                    types.type_count,
                    seed_fragment(universe.seed())
                );
                app.insert_resource(universe).insert_resource(types);
            }
            Err(e) => error!("Configuration refusée, simulation désactivée: {}", e),
        }

        app.add_systems(
            Update,
            (apply_commands, explore_rules, tick_universe, debug_universe_activity)
                .chain()
                .run_if(resource_exists::<Universe>),
        );
    }
}

fn setup_resources(config: &SimulationConfig) -> Result<(Universe, ParticleTypesConfig), ConfigError> {
    let universe = Universe::configure(config.clone())?;
    let types = ParticleTypesConfig::new(config.color_count)?;
    Ok((universe, types))
}

/// Vide la file de commandes avant le tick
pub fn apply_commands(
    commands: Res<SimulationCommands>,
    mut universe: ResMut<Universe>,
    mut types: ResMut<ParticleTypesConfig>,
    mut timer: ResMut<ExplorationTimer>,
) {
    for command in commands.receiver.try_iter() {
        if let Err(e) = apply_command(&mut universe, command) {
            warn!("Commande ignorée: {}", e);
        }
    }

    let config = universe.config();
    if types.type_count != config.color_count {
        match ParticleTypesConfig::new(config.color_count) {
            Ok(new_types) => *types = new_types,
            Err(e) => warn!("Palette non mise à jour: {}", e),
        }
    }

    let period = Duration::from_secs_f32(config.explore.period);
    if timer.0.duration() != period {
        timer.0.set_duration(period);
        timer.0.reset();
    }
}

fn apply_command(universe: &mut Universe, command: SimulationCommand) -> Result<(), ConfigError> {
    match command {
        SimulationCommand::Impulse {
            x,
            y,
            magnitude,
            duration_ticks,
        } => universe.apply_impulse(x, y, magnitude, duration_ticks)?,
        SimulationCommand::MutateRules => log_mutation(universe.mutate_rules_once()),
        SimulationCommand::SetRules { strengths, radii } => universe.set_rules(&strengths, &radii)?,
        SimulationCommand::SetViscosity(v) => universe.set_viscosity(v)?,
        SimulationCommand::SetTimeScale(v) => universe.set_time_scale(v)?,
        SimulationCommand::SetWallRepel(v) => universe.set_wall_repel(v)?,
        SimulationCommand::SetGravity(v) => universe.set_gravity(v)?,
        SimulationCommand::SetToroid(toroid) => universe.set_toroid(toroid),
        SimulationCommand::SetSymmetricRules(symmetric) => universe.set_symmetric_rules(symmetric),
        SimulationCommand::SetExplore(enabled) => universe.set_explore(enabled),
        SimulationCommand::RandomizeRules(seed) => {
            universe.randomize_rules(seed)?;
            info!("Nouvelles règles, graine {}", seed_fragment(seed));
        }
        SimulationCommand::RandomSetup(seed) => {
            let grid = *universe.grid();
            let config = SimulationConfig::randomized(seed, grid.width, grid.height)?;
            universe.reconfigure(config)?;
            info!(
                "Mise en place aléatoire {}: {} particules, {} couleurs",
                seed_fragment(seed),
                universe.particle_count(),
                universe.config().color_count
            );
        }
        SimulationCommand::Reconfigure(config) => {
            universe.reconfigure(*config)?;
            info!("Simulation reconfigurée: {} particules", universe.particle_count());
        }
        SimulationCommand::Reset => {
            universe.reset()?;
            info!("Simulation réinitialisée, graine {}", seed_fragment(universe.seed()));
        }
    }
    Ok(())
}

/// Mutation périodique des règles quand l'exploration est active
pub fn explore_rules(time: Res<Time>, mut timer: ResMut<ExplorationTimer>, mut universe: ResMut<Universe>) {
    if !universe.config().explore.enabled {
        return;
    }

    timer.0.tick(time.delta());
    for _ in 0..timer.0.times_finished_this_tick() {
        log_mutation(universe.mutate_rules_once());
    }
}

pub fn tick_universe(mut universe: ResMut<Universe>) {
    universe.tick();
}

fn log_mutation(mutation: RuleMutation) {
    match mutation {
        RuleMutation::Strength {
            source,
            target,
            old,
            new,
        } => info!(
            "Exploration: {} -> {} : {:.3} => {:.3}",
            ColorIndex(source).name(),
            ColorIndex(target).name(),
            old,
            new
        ),
        RuleMutation::Radius { source, old, new } => info!(
            "Exploration: rayon {} : {:.0} => {:.0}",
            ColorIndex(source).name(),
            old,
            new
        ),
    }
}
