pub mod boundary;
pub mod grid;
pub mod particle_types;
pub mod random;
pub mod rules;
pub mod simulation;
pub mod universe;
