//! What the notifier receives and what subscribers get.

use crate::model::{Product, ProductId};
use serde::Serialize;
use std::sync::Arc;

/// The full catalog at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSnapshot {
    /// Increases with every snapshot the notifier builds.
    pub version: u64,
    pub products: Vec<Product>,
}

/// An event delivered to subscribers.
///
/// Snapshots are shared between subscribers rather than copied per channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum CatalogEvent {
    #[serde(rename = "updateProducts")]
    Snapshot(Arc<CatalogSnapshot>),
    #[serde(rename = "productAdded")]
    ProductAdded(Product),
}

impl CatalogEvent {
    /// Wire form: `{"event": "updateProducts" | "productAdded", "data": ...}`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A catalog mutation reported to the notifier.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogChange {
    ProductCreated(Product),
    ProductUpdated(ProductId),
    ProductDeleted(ProductId),
    /// Reservation or release through a cart operation.
    StockChanged(Vec<ProductId>),
}
