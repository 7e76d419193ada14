//! Generic client framework for backend resources.
//!
//! This module provides the building blocks every resource shares: the retrying transport
//! that talks to the backend and the generic resource client built on top of it.
//!
//! # Main Components
//!
//! - [`Resource`] - Trait that backend records implement to be served by a client
//! - [`ResourceClient`] - Generic list/create/update/delete client
//! - [`RetryingTransport`] - Timeout + fixed-delay retry around a [`Backend`]
//! - [`TransportError`] - Failure taxonomy and retry classification
//!
//! # Testing
//!
//! See [`mock`] module for a scripted backend that needs no network.

pub mod core;
pub mod mock;
pub mod transport;

// Re-export core types for convenience
pub use self::core::*;
pub use self::transport::*;
