pub mod clustering;
pub mod debug;
pub mod movement;
pub mod preset_save;
