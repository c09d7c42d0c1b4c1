//! Shared test utilities for the Food Share project.
//!
//! These helpers are compiled for tests and for downstream crates that enable
//! the `test-helpers` feature, so fixture identifiers stay unique across
//! concurrently running test binaries.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a unique identifier with the given prefix.
///
/// Combines the process id, a monotonic counter and the current timestamp so
/// ids never collide across test binaries sharing a remote collection.
pub fn generate_unique_id(prefix: &str) -> String {
    let counter = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{}_{}_{}_{}", prefix, std::process::id(), counter, nanos)
}

/// Write a YAML config fixture into the system temp directory and return its
/// path. Each call produces a distinct file.
pub fn write_temp_config(name: &str, contents: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("{}.yaml", generate_unique_id(name)));
    std::fs::write(&path, contents).expect("failed to write config fixture");
    path
}
