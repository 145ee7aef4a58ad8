//! Line primitives for the Cart actor. None of them touch stock.

use crate::model::{CartLine, LineChange, ProductId};

#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Adds `delta` to the product's line, creating it when `delta > 0` and removing it when
    /// the result drops to 0 or below.
    UpsertLine { product_id: ProductId, delta: i64 },
    /// Removes the product's line, if any.
    RemoveLine(ProductId),
    /// Empties the cart but keeps it.
    Clear,
}

/// Results from CartActions - variants match 1:1 with CartAction.
#[derive(Debug, Clone, PartialEq)]
pub enum CartActionResult {
    UpsertLine(LineChange),
    /// Removed quantity, 0 if there was no line.
    RemoveLine(u32),
    /// Lines that were in the cart.
    Clear(Vec<CartLine>),
}
