//! Core domain types and logic.

pub mod bar;
pub mod indicator;
pub mod signal;
pub mod pattern;
pub mod strategy;
pub mod preset;
pub mod simulator;
pub mod metrics;
pub mod error;
