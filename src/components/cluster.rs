use serde::{Deserialize, Serialize};

use crate::resources::particle_types::ColorIndex;

/// Centroïde approximatif d'un groupe de particules, pour l'affichage
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: Option<ColorIndex>,
}

impl Cluster {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            radius: 0.0,
            color: None,
        }
    }

    /// Un cluster de rayon nul est inactif et peut être remplacé
    pub fn is_active(&self) -> bool {
        self.radius > 0.0
    }

    pub fn deactivate(&mut self) {
        self.radius = 0.0;
        self.color = None;
    }
}

/// Accumulateur du tick courant, jeté après la finalisation
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct ClusterAccumulator {
    pub count: usize,
    pub sum_x: f64,
    pub sum_y: f64,
    pub sum_d2: f64,
    pub sum_color: f64,
}
