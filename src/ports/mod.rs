//! Port traits for the collaborators around the engine.

pub mod cache_port;
pub mod config_port;
pub mod data_port;
