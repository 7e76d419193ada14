//! Backend records implementing the [`Resource`](crate::framework::Resource) trait.

pub mod banner;
mod lenient;
pub mod order;
pub mod product;

pub use banner::*;
pub use order::*;
pub use product::*;
