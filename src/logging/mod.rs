// file: src/logging/mod.rs
// version: 1.1.0
// guid: i9j0k1l2-m3n4-5678-9012-345678ijklmn

//! Logging setup for the ISO customizer

pub mod logger;

pub use logger::{init_json_logger, init_logger, operation_span, with_operation_span};
