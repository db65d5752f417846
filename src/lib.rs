//! Moteur de simulation "particle life" : des particules colorées s'attirent
//! ou se repoussent selon une matrice de règles tirée d'une graine.
//!
//! Le cœur (`Universe`) est indépendant du rendu. `ParticleLifePlugin` le
//! branche dans une application Bevy.

pub mod components;
pub mod error;
pub mod globals;
pub mod plugins;
pub mod resources;
pub mod systems;

pub use components::cluster::Cluster;
pub use components::particle::Particle;
pub use error::ConfigError;
pub use plugins::simulation::{ParticleLifePlugin, SimulationCommand, SimulationCommands};
pub use resources::boundary::BoundaryMode;
pub use resources::grid::GridParameters;
pub use resources::particle_types::ColorIndex;
pub use resources::random::SeededRandom;
pub use resources::rules::{FlatRules, RuleMatrix, RuleMutation};
pub use resources::simulation::{ClusterSettings, ExploreSettings, SimulationConfig};
pub use resources::universe::Universe;
pub use systems::preset_save::Preset;
