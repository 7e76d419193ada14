//! Type-safe wrappers around [`ResourceClient`](crate::framework::ResourceClient).

pub mod banner_client;
pub mod order_client;
pub mod product_client;
pub mod resource_api;

pub use banner_client::*;
pub use order_client::*;
pub use product_client::*;
pub use resource_api::*;
