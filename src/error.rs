//! Erreurs de configuration de la simulation.
//!
//! Toute reconfiguration est validée avant application : une erreur signifie
//! qu'aucun champ n'a été modifié.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid world size {width}x{height}: both dimensions must be finite and positive")]
    InvalidWorldSize { width: f64, height: f64 },
    #[error("Invalid color count {0}: must be between 1 and {max}", max = crate::resources::particle_types::PALETTE.len())]
    InvalidColorCount(usize),
    #[error("Atoms per color must be at least 1")]
    NoAtoms,
    #[error("Invalid {name} {value}: expected a value in {min}..={max}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("Rule arrays do not match {colors} colors: got {strengths} strengths and {radii} radii")]
    RuleDimensions {
        colors: usize,
        strengths: usize,
        radii: usize,
    },
    #[error("Invalid seed fragment: {0:?}")]
    InvalidSeed(String),
    #[error("Invalid preset: {0}")]
    InvalidPreset(String),
    #[error("Failed to access preset file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse preset: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    /// Vérifie qu'une valeur est finie et dans l'intervalle fermé donné
    pub(crate) fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), Self> {
        if value.is_finite() && value >= min && value <= max {
            Ok(())
        } else {
            Err(ConfigError::OutOfRange { name, value, min, max })
        }
    }
}
