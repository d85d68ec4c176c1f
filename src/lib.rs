pub mod agenda;
pub mod audio;
pub mod camera_systems;
pub mod components;
pub mod config;
pub mod effects;
pub mod encounter;
pub mod error;
pub mod prompt;
pub mod proximity;
pub mod riddle;
pub mod room;
pub mod sequencer;
pub mod stage;
pub mod tween;
