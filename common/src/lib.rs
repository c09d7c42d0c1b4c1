pub mod config;

/// Common utilities shared across the Food Share project
///
/// This crate provides shared functionality used by the checkout service:
///
/// - YAML configuration loading
/// - Shared test utilities and fixture helpers

// Test helpers module - available for both development and test builds
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

// Re-export commonly used test utilities for easier access
#[cfg(any(test, feature = "test-helpers"))]
pub use test_helpers::{generate_unique_id, write_temp_config};
