//! Custom actions for the Product actor.
//!
//! These are the stock primitives. Each one is a single request to the catalog actor, so the
//! check and the write it performs happen in one turn of the loop and cannot interleave with
//! another caller's. See [`entity`](super::entity) for how they are applied.

/// Custom actions for Product entities.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductAction {
    /// Reads the current stock without modifying it.
    CheckStock,
    /// Takes units out of stock on behalf of a cart line.
    ///
    /// # Errors
    /// `InsufficientStock` if the amount exceeds what is left; the stock is not touched.
    ReserveStock(u32),
    /// Puts units back. There is no deduplication: releasing twice restores twice.
    ReleaseStock(u32),
}

/// Results from ProductActions - variants match 1:1 with ProductAction.
///
/// Every variant carries the stock level after the action.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductActionResult {
    CheckStock(u32),
    ReserveStock(u32),
    ReleaseStock(u32),
}
