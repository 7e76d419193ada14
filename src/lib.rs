//! # Admin Dashboard Client
//!
//! > **Backend access for a storefront admin dashboard that survives a sleeping backend.**
//!
//! The backend is a single REST service on a host that idles it when unused. The first request
//! after a quiet period can take tens of seconds, and some requests fail outright while it wakes
//! up. This crate wraps every call in a timeout and a fixed-delay retry, serves orders, products
//! and banners through one generic client, and keeps dashboard views fresh by polling.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Reads degrade, writes report
//! - A list that cannot be fetched comes back empty (or flagged stale), never as an error.
//! - A write always returns an [`OperationResult`](framework::OperationResult) carrying either
//!   the backend's answer or a human-readable message. Nothing is thrown at the caller.
//!
//! ### Generics: The Power of `T`
//! You'll see `ResourceClient<T: Resource>` everywhere. Orders, products and banners differ only
//! in their routes and payload shapes, so the retry handling, error normalization and list
//! decoding are written **once**.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Error Handling
//! Transport failures are a [`TransportError`](framework::TransportError) that knows whether it is
//! worth retrying. Configuration problems are a [`ConfigError`](config::ConfigError).
//!
//! ### 2. Concurrency Model
//! Each polled view runs its own Tokio task. Ticks and manual refreshes are processed
//! sequentially by that task, so a slow fetch can never overlap the next tick.
//!
//! ### 3. Observability
//! `tracing` everywhere with structured fields. See [`lifecycle::tracing`].
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! - **Role**: The retrying transport and the generic resource client.
//! - **Key items**: [`Resource`](framework::Resource), [`ResourceClient`](framework::ResourceClient),
//!   [`RetryingTransport`](framework::RetryingTransport).
//!
//! ### 2. The Interface ([`clients`])
//! - **Role**: Typed wrappers adding resource-specific helpers.
//! - **Key items**: [`OrderClient`](clients::OrderClient), [`ProductClient`](clients::ProductClient),
//!   [`BannerClient`](clients::BannerClient).
//!
//! ### 3. The Records ([`model`])
//! - **Role**: Serde models of the backend's JSON.
//!
//! ### 4. The Watchers ([`monitor`])
//! - **Role**: Polling, change detection and auto-expiring alerts.
//!
//! ### 5. The Orchestrator ([`lifecycle`])
//! - **Role**: Wires everything together from a [`ClientConfig`](config::ClientConfig).
//! - **Key items**: [`AdminSystem`](lifecycle::AdminSystem).
//!
//! Also: [`warmup`] for waking the backend and [`stats`] for dashboard aggregates.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! BACKEND_URL=http://localhost:5000 RUST_LOG=info cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod clients;
pub mod config;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod monitor;
pub mod stats;
pub mod warmup;
