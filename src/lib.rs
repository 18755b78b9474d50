//! Facility recommendation scoring for municipal (LGU) reservation workflows.
//!
//! Residents describe what they want to book a venue for; the service ranks
//! the available facilities with a weighted additive heuristic and, when a
//! scheduling-model gateway is configured, defers to its ranking with a hard
//! fallback to the heuristic on any failure.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
