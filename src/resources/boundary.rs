use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryMode {
    Bounce, // Rebondir sur les murs
    #[default]
    Wrap, // Monde torique : ressortir de l'autre côté
}

impl BoundaryMode {
    pub fn from_toroid(toroid: bool) -> Self {
        if toroid { BoundaryMode::Wrap } else { BoundaryMode::Bounce }
    }

    pub fn is_toroidal(self) -> bool {
        self == BoundaryMode::Wrap
    }
}
