use crate::model::ProductId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog product.
///
/// # Actor Framework
/// Implements [`ActorEntity`](crate::framework::ActorEntity) (see
/// [`product_actor::entity`](crate::product_actor::entity)), so the whole catalog lives in one
/// [`ResourceActor`](crate::framework::ResourceActor) and every stock change is a single
/// request to it.
///
/// `stock` is what can still be reserved. `reserved` is what carts currently hold; it is
/// bookkeeping for the delete guard and never leaves the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub code: String,
    pub price: f64,
    pub stock: u32,
    pub category: String,
    pub thumbnails: Vec<String>,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub reserved: u32,
}

impl Product {
    /// Builds an active product with no thumbnails, stamped now.
    pub fn new(
        id: ProductId,
        title: impl Into<String>,
        code: impl Into<String>,
        price: f64,
        stock: u32,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            code: code.into(),
            price,
            stock,
            category: category.into(),
            thumbnails: Vec::new(),
            status: true,
            created_at: Utc::now(),
            reserved: 0,
        }
    }
}

/// Payload for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub code: String,
    pub price: f64,
    pub stock: u32,
    pub category: String,
    #[serde(default)]
    pub thumbnails: Vec<String>,
    /// Defaults to active.
    #[serde(default)]
    pub status: Option<bool>,
}

impl ProductCreate {
    /// Minimal payload; the remaining fields take their defaults.
    pub fn new(
        title: impl Into<String>,
        code: impl Into<String>,
        price: f64,
        stock: u32,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            code: code.into(),
            price,
            stock,
            category: category.into(),
            thumbnails: Vec::new(),
            status: None,
        }
    }
}

/// Partial update for a product. `None` leaves the field alone.
///
/// Setting `stock` is an administrative restock. `code` may only be repeated as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<u32>,
    pub category: Option<String>,
    pub thumbnails: Option<Vec<String>>,
    pub status: Option<bool>,
}
