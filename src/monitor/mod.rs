//! Change monitoring for polled views.
//!
//! - [`ChangeDetector`] - Pure snapshot diffing
//! - [`NotificationBoard`] - Auto-expiring alerts, one per kind
//! - [`Poller`] - The per-view polling task tying both to a [`ResourceClient`](crate::framework::ResourceClient)

pub mod detector;
pub mod notification;
pub mod poller;

pub use detector::*;
pub use notification::*;
pub use poller::*;
