use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::globals::*;
use crate::resources::particle_types::validate_color_count;
use crate::resources::random::SeededRandom;

/// Matrice des interactions entre couleurs.
///
/// `strength[source][target]` est stockée à plat (ligne par source). Chaque
/// couleur source possède un rayon d'interaction, gardé aussi au carré pour
/// la boucle de forces.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FlatRules", into = "FlatRules")]
pub struct RuleMatrix {
    color_count: usize,
    strengths: Vec<f64>,
    radii: Vec<f64>,
    radii_squared: Vec<f64>,
}

/// Forme aplatie échangée avec l'extérieur (rayons non élevés au carré)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlatRules {
    pub color_count: usize,
    pub strengths: Vec<f64>,
    pub radii: Vec<f64>,
}

/// Résultat d'une mutation d'exploration
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RuleMutation {
    Strength { source: usize, target: usize, old: f64, new: f64 },
    Radius { source: usize, old: f64, new: f64 },
}

impl RuleMatrix {
    /// Tire une matrice complète. L'ordre de parcours (source puis cible,
    /// dans l'ordre de la palette) fixe la consommation du flux aléatoire.
    pub fn generate(color_count: usize, rng: &mut SeededRandom) -> Result<Self, ConfigError> {
        validate_color_count(color_count)?;
        let mut strengths = Vec::with_capacity(color_count * color_count);
        for _source in 0..color_count {
            for _target in 0..color_count {
                strengths.push(rng.next() * 2.0 - 1.0);
            }
        }
        let radii = vec![DEFAULT_RULE_RADIUS; color_count];
        Ok(Self::assemble(color_count, strengths, radii))
    }

    /// Construit depuis des tableaux plats, après validation complète
    pub fn from_flat(color_count: usize, strengths: &[f64], radii: &[f64]) -> Result<Self, ConfigError> {
        validate_color_count(color_count)?;
        if strengths.len() != color_count * color_count || radii.len() != color_count {
            return Err(ConfigError::RuleDimensions {
                colors: color_count,
                strengths: strengths.len(),
                radii: radii.len(),
            });
        }
        for &strength in strengths {
            ConfigError::check_range("rule strength", strength, -1.0, 1.0)?;
        }
        for &radius in radii {
            check_radius(radius)?;
        }
        Ok(Self::assemble(color_count, strengths.to_vec(), radii.to_vec()))
    }

    fn assemble(color_count: usize, strengths: Vec<f64>, radii: Vec<f64>) -> Self {
        let radii_squared = radii.iter().map(|r| r * r).collect();
        Self {
            color_count,
            strengths,
            radii,
            radii_squared,
        }
    }

    pub fn color_count(&self) -> usize {
        self.color_count
    }

    pub fn strength(&self, source: usize, target: usize) -> f64 {
        self.strengths[source * self.color_count + target]
    }

    pub fn set_strength(&mut self, source: usize, target: usize, value: f64) -> Result<(), ConfigError> {
        self.check_color(source)?;
        self.check_color(target)?;
        ConfigError::check_range("rule strength", value, -1.0, 1.0)?;
        self.strengths[source * self.color_count + target] = value;
        Ok(())
    }

    pub fn radius(&self, source: usize) -> f64 {
        self.radii[source]
    }

    pub fn radius_squared(&self, source: usize) -> f64 {
        self.radii_squared[source]
    }

    pub fn set_radius(&mut self, source: usize, radius: f64) -> Result<(), ConfigError> {
        self.check_color(source)?;
        check_radius(radius)?;
        self.radii[source] = radius;
        self.radii_squared[source] = radius * radius;
        Ok(())
    }

    fn check_color(&self, index: usize) -> Result<(), ConfigError> {
        if index < self.color_count {
            Ok(())
        } else {
            Err(ConfigError::OutOfRange {
                name: "color index",
                value: index as f64,
                min: 0.0,
                max: (self.color_count - 1) as f64,
            })
        }
    }

    pub fn strengths(&self) -> &[f64] {
        &self.strengths
    }

    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    /// Ligne de forces d'une couleur source
    pub fn row(&self, source: usize) -> &[f64] {
        let start = source * self.color_count;
        &self.strengths[start..start + self.color_count]
    }

    pub fn flatten(&self) -> FlatRules {
        FlatRules {
            color_count: self.color_count,
            strengths: self.strengths.clone(),
            radii: self.radii.clone(),
        }
    }

    /// Remplace chaque paire {i, j} par sa moyenne
    pub fn symmetrize(&mut self) {
        let n = self.color_count;
        for i in 0..n {
            for j in 0..i {
                let mean = 0.5 * (self.strengths[i * n + j] + self.strengths[j * n + i]);
                self.strengths[i * n + j] = mean;
                self.strengths[j * n + i] = mean;
            }
        }
    }

    pub fn is_symmetric(&self) -> bool {
        let n = self.color_count;
        (0..n).all(|i| (0..i).all(|j| self.strengths[i * n + j] == self.strengths[j * n + i]))
    }

    /// Une mutation d'exploration : 80% du temps une force (signe forcé à
    /// l'opposé de l'ancien), sinon le rayon de la couleur source.
    pub fn mutate(&mut self, rng: &mut SeededRandom) -> RuleMutation {
        let n = self.color_count;
        let source = rng.next_index(n);
        if rng.next() >= RADIUS_MUTATION_PROBABILITY {
            let target = rng.next_index(n);
            let old = self.strengths[source * n + target];
            let mut new = rng.next();
            if old > 0.0 {
                new = -new;
            }
            self.strengths[source * n + target] = new;
            RuleMutation::Strength { source, target, old, new }
        } else {
            let old = self.radii[source];
            let new = 1.0 + (rng.next() * MAX_RULE_RADIUS).floor();
            self.radii[source] = new;
            self.radii_squared[source] = new * new;
            RuleMutation::Radius { source, old, new }
        }
    }
}

fn check_radius(radius: f64) -> Result<(), ConfigError> {
    if radius > 0.0 && radius <= MAX_RULE_RADIUS {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name: "rule radius",
            value: radius,
            min: 0.0,
            max: MAX_RULE_RADIUS,
        })
    }
}

impl From<RuleMatrix> for FlatRules {
    fn from(rules: RuleMatrix) -> Self {
        FlatRules {
            color_count: rules.color_count,
            strengths: rules.strengths,
            radii: rules.radii,
        }
    }
}

impl TryFrom<FlatRules> for RuleMatrix {
    type Error = ConfigError;

    fn try_from(flat: FlatRules) -> Result<Self, Self::Error> {
        RuleMatrix::from_flat(flat.color_count, &flat.strengths, &flat.radii)
    }
}
