use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::globals::*;
use crate::resources::boundary::BoundaryMode;

/// Dimensions du monde 2D, origine en (0, 0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridParameters {
    pub width: f64,
    pub height: f64,
}

impl Default for GridParameters {
    fn default() -> Self {
        Self {
            width: DEFAULT_WORLD_WIDTH,
            height: DEFAULT_WORLD_HEIGHT,
        }
    }
}

impl GridParameters {
    pub fn new(width: f64, height: f64) -> Result<Self, ConfigError> {
        let grid = Self { width, height };
        grid.validate()?;
        Ok(grid)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(self.width) && valid(self.height) {
            Ok(())
        } else {
            Err(ConfigError::InvalidWorldSize {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Vérifie si une position est dans les limites du monde
    pub fn is_in_bounds(&self, x: f64, y: f64) -> bool {
        (0.0..self.width).contains(&x) && (0.0..self.height).contains(&y)
    }

    /// Vecteur le plus court de `from` vers `to`, en passant par les bords si
    /// le monde est torique
    pub fn shortest_delta(&self, from: (f64, f64), to: (f64, f64), mode: BoundaryMode) -> (f64, f64) {
        let dx = to.0 - from.0;
        let dy = to.1 - from.1;
        if !mode.is_toroidal() {
            return (dx, dy);
        }
        (torus_axis(dx, self.width), torus_axis(dy, self.height))
    }

    /// Applique le mode de bord à une particule qui vient de se déplacer
    pub fn apply_bounds(&self, x: &mut f64, y: &mut f64, vx: &mut f64, vy: &mut f64, mode: BoundaryMode) {
        match mode {
            BoundaryMode::Wrap => {
                wrap_axis(x, self.width);
                wrap_axis(y, self.height);
            }
            BoundaryMode::Bounce => {
                reflect_axis(x, vx, self.width);
                reflect_axis(y, vy, self.height);
            }
        }
    }
}

/// Garde le plus court entre l'écart direct et l'écart qui traverse le bord
pub(crate) fn torus_axis(delta: f64, size: f64) -> f64 {
    let wrapped = if delta > 0.0 { delta - size } else { delta + size };
    if wrapped.abs() < delta.abs() { wrapped } else { delta }
}

fn wrap_axis(pos: &mut f64, size: f64) {
    if *pos >= size {
        *pos -= size;
    } else if *pos < 0.0 {
        *pos += size;
    }
    // Saut de plus d'une largeur de monde (impulsion forte)
    if !(0.0..size).contains(pos) {
        *pos = pos.rem_euclid(size);
        if *pos >= size {
            *pos = 0.0;
        }
    }
}

/// Rebond élastique : on replie le dépassement et on inverse la vitesse
fn reflect_axis(pos: &mut f64, vel: &mut f64, size: f64) {
    if *pos < 0.0 {
        *pos = -*pos;
        *vel = -*vel;
    }
    if *pos >= size {
        *pos = 2.0 * size - *pos;
        *vel = -*vel;
    }
    // Saut de plus d'une largeur de monde : on replie sur la période 2 * size
    if !(0.0..size).contains(pos) {
        let folded = pos.rem_euclid(2.0 * size);
        if folded >= size {
            *pos = 2.0 * size - folded;
            *vel = -*vel;
        } else {
            *pos = folded;
        }
        if *pos >= size {
            *pos = size - size * f64::EPSILON;
        }
    }
}
