//! Plain data records stored by the actors, plus their DTOs.

pub mod cart;
pub mod ids;
pub mod product;

pub use cart::*;
pub use ids::*;
pub use product::*;
