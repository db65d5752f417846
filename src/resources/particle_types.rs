use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::globals::*;

/// Palette fixe : l'indice de couleur d'une particule pointe ici
pub const PALETTE: [(&str, [u8; 3]); 7] = [
    ("green", [0, 128, 0]),
    ("red", [255, 0, 0]),
    ("orange", [255, 165, 0]),
    ("cyan", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("lavender", [230, 230, 250]),
    ("teal", [0, 128, 128]),
];

/// Indice dans la palette
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColorIndex(pub usize);

impl ColorIndex {
    pub fn name(self) -> &'static str {
        PALETTE[self.0 % PALETTE.len()].0
    }

    pub fn color(self) -> Color {
        let [r, g, b] = PALETTE[self.0 % PALETTE.len()].1;
        Color::srgb_u8(r, g, b)
    }
}

#[derive(Resource, Clone, Debug)]
pub struct ParticleTypesConfig {
    pub type_count: usize,
    pub colors: Vec<Color>, // Couleur par type
}

impl Default for ParticleTypesConfig {
    fn default() -> Self {
        Self {
            type_count: DEFAULT_COLOR_COUNT,
            colors: Self::palette_colors(DEFAULT_COLOR_COUNT),
        }
    }
}

impl ParticleTypesConfig {
    pub fn new(type_count: usize) -> Result<Self, ConfigError> {
        validate_color_count(type_count)?;
        Ok(Self {
            type_count,
            colors: Self::palette_colors(type_count),
        })
    }

    /// Les `count` premières couleurs de la palette, dans l'ordre
    fn palette_colors(count: usize) -> Vec<Color> {
        (0..count).map(|i| ColorIndex(i).color()).collect()
    }

    pub fn names(&self) -> Vec<&'static str> {
        (0..self.type_count).map(|i| ColorIndex(i).name()).collect()
    }
}

pub fn validate_color_count(count: usize) -> Result<(), ConfigError> {
    if count == 0 || count > PALETTE.len() {
        return Err(ConfigError::InvalidColorCount(count));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_assignment_is_positional() {
        let config = ParticleTypesConfig::new(3).unwrap();
        assert_eq!(config.names(), vec!["green", "red", "orange"]);
        assert_eq!(config.colors.len(), 3);
    }

    #[test]
    fn rejects_counts_outside_palette() {
        assert!(matches!(ParticleTypesConfig::new(0), Err(ConfigError::InvalidColorCount(0))));
        assert!(ParticleTypesConfig::new(PALETTE.len()).is_ok());
        assert!(ParticleTypesConfig::new(PALETTE.len() + 1).is_err());
    }
}
