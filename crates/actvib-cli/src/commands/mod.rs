//! CLI command implementations.

pub mod batch;
pub mod check;
pub mod common;
pub mod config;
pub mod organize;
