// file: src/config/mod.rs
// version: 2.0.0
// guid: a1b2c3d4-e5f6-7a8b-9c0d-1e2f3a4b5c6d

//! Configuration module for the ISO customizer
//!
//! Handles loading and validation of ISO rebuild settings.

pub mod build;
pub mod loader;

pub use build::{BuildConfig, DEFAULT_FILESYSTEM_OPTIONS};
pub use loader::ConfigLoader;
