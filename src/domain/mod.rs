//! Core domain types and logic.

pub mod analysis;
pub mod augmented;
pub mod config_validation;
pub mod engine;
pub mod error;
pub mod frame;
pub mod indicator;
pub mod ohlcv;
pub mod scoring;
pub mod summary;
