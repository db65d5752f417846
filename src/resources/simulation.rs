use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::globals::*;
use crate::resources::boundary::BoundaryMode;
use crate::resources::grid::GridParameters;
use crate::resources::particle_types::validate_color_count;
use crate::resources::random::SeededRandom;

/// Exploration : mutation périodique des règles, cadencée par l'appelant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExploreSettings {
    pub enabled: bool,
    pub period: f32, // secondes
}

impl Default for ExploreSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            period: DEFAULT_EXPLORE_PERIOD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterSettings {
    pub enabled: bool,
    pub max_clusters: usize,
    pub min_cluster_size: usize,
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_clusters: DEFAULT_MAX_CLUSTERS,
            min_cluster_size: DEFAULT_MIN_CLUSTER_SIZE,
        }
    }
}

/// Paramètres complets d'une simulation. Figés pendant un tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub grid: GridParameters,
    pub color_count: usize,
    pub atoms_per_color: usize,
    pub toroid: bool,
    pub wall_repel: f64,
    pub wall_strength: f64,
    pub viscosity: f64,
    pub time_scale: f64,
    pub gravity: f64,
    pub symmetric_rules: bool,
    pub seed: u64,
    pub explore: ExploreSettings,
    pub clusters: ClusterSettings,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid: GridParameters::default(),
            color_count: DEFAULT_COLOR_COUNT,
            atoms_per_color: DEFAULT_ATOMS_PER_COLOR,
            toroid: true,
            wall_repel: DEFAULT_WALL_REPEL,
            wall_strength: DEFAULT_WALL_STRENGTH,
            viscosity: DEFAULT_VISCOSITY,
            time_scale: DEFAULT_TIME_SCALE,
            gravity: DEFAULT_GRAVITY,
            symmetric_rules: false,
            seed: DEFAULT_SEED,
            explore: ExploreSettings::default(),
            clusters: ClusterSettings::default(),
        }
    }
}

impl SimulationConfig {
    /// Tire une configuration complète depuis la graine : nombre de couleurs,
    /// nombre d'atomes, viscosité et répulsion des murs.
    pub fn randomized(seed: u64, width: f64, height: f64) -> Result<Self, ConfigError> {
        let grid = GridParameters::new(width, height)?;
        let mut rng = SeededRandom::from_seed_value(seed);

        let color_count = (rng.next() * RANDOM_SETUP_COLOR_SPAN + RANDOM_SETUP_MIN_COLORS).floor() as usize;
        let total_atoms = (rng.next() * RANDOM_SETUP_ATOM_SPAN + RANDOM_SETUP_MIN_ATOMS).floor() as usize;
        let viscosity = rng.next() * RANDOM_SETUP_VISCOSITY_SPAN + RANDOM_SETUP_MIN_VISCOSITY;
        let wall_repel = (rng.next() * RANDOM_SETUP_WALL_SPAN).floor();

        let config = Self {
            grid,
            color_count,
            atoms_per_color: total_atoms / color_count,
            viscosity,
            wall_repel,
            seed,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn boundary_mode(&self) -> BoundaryMode {
        BoundaryMode::from_toroid(self.toroid)
    }

    pub fn particle_count(&self) -> usize {
        self.color_count * self.atoms_per_color
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        validate_color_count(self.color_count)?;
        if self.atoms_per_color == 0 {
            return Err(ConfigError::NoAtoms);
        }
        validate_viscosity(self.viscosity)?;
        validate_time_scale(self.time_scale)?;
        validate_wall_repel(self.wall_repel)?;
        ConfigError::check_range("wall strength", self.wall_strength, 0.0, f64::MAX)?;
        validate_gravity(self.gravity)?;
        ConfigError::check_range(
            "explore period",
            f64::from(self.explore.period),
            f64::from(f32::MIN_POSITIVE),
            f64::from(f32::MAX),
        )?;
        Ok(())
    }
}

pub fn validate_viscosity(viscosity: f64) -> Result<(), ConfigError> {
    ConfigError::check_range("viscosity", viscosity, 0.0, MAX_VISCOSITY)
}

pub fn validate_time_scale(time_scale: f64) -> Result<(), ConfigError> {
    ConfigError::check_range("time scale", time_scale, f64::MIN_POSITIVE, MAX_TIME_SCALE)
}

pub fn validate_wall_repel(wall_repel: f64) -> Result<(), ConfigError> {
    ConfigError::check_range("wall repel", wall_repel, 0.0, f64::MAX)
}

pub fn validate_gravity(gravity: f64) -> Result<(), ConfigError> {
    ConfigError::check_range("gravity", gravity, f64::MIN, f64::MAX)
}

/// Lit une graine depuis un fragment d'URL (`#1234` ou `1234`)
pub fn parse_seed_fragment(fragment: &str) -> Result<u64, ConfigError> {
    let digits = fragment.trim().trim_start_matches('#');
    digits
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidSeed(fragment.to_string()))
}

/// Fragment partageable pour une graine
pub fn seed_fragment(seed: u64) -> String {
    format!("#{seed}")
}

/// Graine du fragment si elle est lisible, sinon la graine de secours
pub fn seed_or_fallback(fragment: Option<&str>) -> u64 {
    fragment
        .and_then(|f| parse_seed_fragment(f).ok())
        .unwrap_or(FALLBACK_SEED)
}
