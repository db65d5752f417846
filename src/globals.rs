// Graine par défaut (celle du lien partagé historique)
pub const DEFAULT_SEED: u64 = 3762108977281;
// Graine de secours si la graine fournie n'est pas exploitable
pub const FALLBACK_SEED: u64 = 0xcafecafe;

// Paramètres du monde
pub const DEFAULT_WORLD_WIDTH: f64 = 1600.0;
pub const DEFAULT_WORLD_HEIGHT: f64 = 900.0;

// Paramètres des particules
pub const DEFAULT_COLOR_COUNT: usize = 6;
pub const DEFAULT_ATOMS_PER_COLOR: usize = 500;
pub const FIELDS_PER_PARTICLE: usize = 5;

// Paramètres des règles
pub const DEFAULT_RULE_RADIUS: f64 = 80.0;
pub const MAX_RULE_RADIUS: f64 = 200.0;
pub const RADIUS_MUTATION_PROBABILITY: f64 = 0.2;

// Paramètres physiques
pub const DEFAULT_TIME_SCALE: f64 = 0.2;
pub const MAX_TIME_SCALE: f64 = 5.0;
pub const DEFAULT_VISCOSITY: f64 = 0.7;
pub const MAX_VISCOSITY: f64 = 2.0;
pub const DEFAULT_GRAVITY: f64 = 0.0;
pub const DEFAULT_WALL_REPEL: f64 = 40.0;
pub const DEFAULT_WALL_STRENGTH: f64 = 0.1;
pub const PULSE_STRENGTH: f64 = 100.0;

// Exploration
pub const DEFAULT_EXPLORE_PERIOD: f32 = 4.0; // secondes

// Paramètres des clusters
pub const DEFAULT_MAX_CLUSTERS: usize = 12;
pub const DEFAULT_MIN_CLUSTER_SIZE: usize = 20;
pub const CLUSTER_RADIUS_FACTOR: f64 = 1.10;
pub const CLUSTER_RADIUS_SMOOTHING: f64 = 0.95;
pub const CLUSTER_SEED_SALT: u32 = 0x9E37_79B9;

// Tirage aléatoire d'une configuration complète
pub const RANDOM_SETUP_MIN_COLORS: f64 = 2.0;
pub const RANDOM_SETUP_COLOR_SPAN: f64 = 6.0;
pub const RANDOM_SETUP_MIN_ATOMS: f64 = 500.0;
pub const RANDOM_SETUP_ATOM_SPAN: f64 = 2500.0;
pub const RANDOM_SETUP_MIN_VISCOSITY: f64 = 0.1;
pub const RANDOM_SETUP_VISCOSITY_SPAN: f64 = 1.9;
pub const RANDOM_SETUP_WALL_SPAN: f64 = 100.0;
