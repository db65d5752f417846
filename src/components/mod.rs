pub mod cluster;
pub mod particle;
