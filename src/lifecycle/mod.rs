//! Composition root and process-level setup.
//!
//! # Main Components
//!
//! - [`AdminSystem`] - Wires the shared transport into every client and starts view watches
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod admin_system;
pub mod tracing;

pub use admin_system::*;
pub use tracing::*;
