//! Port traits: the engine's boundaries with the outside world.

pub mod data_port;
pub mod config_port;
pub mod report_port;
