use crate::model::{CartId, Product, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A shopping cart: at most one line per product, every line with quantity ≥ 1.
///
/// Carts are only ever changed through the cart actions
/// ([`CartAction`](crate::cart_actor::CartAction)), which keep both invariants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: CartId,
    pub lines: Vec<CartLine>,
    pub created_at: DateTime<Utc>,
}

impl Cart {
    pub fn new(id: CartId) -> Self {
        Self {
            id,
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Quantity held for `product_id`, 0 when there is no line.
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.lines
            .iter()
            .find(|line| line.product_id == product_id)
            .map_or(0, |line| line.quantity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Quantity of one line before and after an upsert. Both are 0 when no line exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LineChange {
    pub previous: u32,
    pub current: u32,
}

/// Payload for creating a cart. Carts always start empty.
#[derive(Debug, Clone, Default)]
pub struct CartCreate;

/// A cart with its product records resolved, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub id: CartId,
    pub lines: Vec<CartViewLine>,
    /// Sum of price × quantity over the lines whose product still resolves.
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartViewLine {
    pub product_id: ProductId,
    pub quantity: u32,
    /// `None` if the product record is gone.
    pub product: Option<Product>,
}

impl CartView {
    /// Joins `cart` against a catalog listing.
    pub fn resolve(cart: &Cart, catalog: &[Product]) -> Self {
        let lines: Vec<CartViewLine> = cart
            .lines
            .iter()
            .map(|line| CartViewLine {
                product_id: line.product_id,
                quantity: line.quantity,
                product: catalog.iter().find(|p| p.id == line.product_id).cloned(),
            })
            .collect();
        let total = lines
            .iter()
            .filter_map(|line| line.product.as_ref().map(|p| p.price * f64::from(line.quantity)))
            .sum();
        Self {
            id: cart.id,
            lines,
            total,
        }
    }
}
