//! Error types for the Product actor.

use crate::framework::FrameworkError;
use thiserror::Error;

/// Errors that can occur during product operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    /// The requested product was not found.
    #[error("Product not found: {0}")]
    NotFound(String),

    /// The requested quantity exceeds the available stock.
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },

    /// Another product already uses this code.
    #[error("Duplicate product code: {0}")]
    DuplicateCode(String),

    /// Carts still hold units of the product.
    #[error("Product {id} is in use: {reserved} units held by carts")]
    ProductInUse { id: String, reserved: u32 },

    /// The payload or quantity is malformed.
    #[error("Invalid product data: {0}")]
    Validation(String),

    /// The catalog actor is not answering.
    #[error("Product store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<FrameworkError> for ProductError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => ProductError::NotFound(id),
            e @ (FrameworkError::ActorClosed | FrameworkError::ActorDropped) => {
                ProductError::StoreUnavailable(e.to_string())
            }
            e => e
                .downcast_entity::<ProductError>()
                .unwrap_or_else(|other| ProductError::StoreUnavailable(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framework_errors_map_onto_the_catalog_taxonomy() {
        assert_eq!(
            ProductError::from(FrameworkError::NotFound("product_4".into())),
            ProductError::NotFound("product_4".into())
        );
        assert!(matches!(
            ProductError::from(FrameworkError::ActorDropped),
            ProductError::StoreUnavailable(_)
        ));
        let inner = ProductError::InsufficientStock {
            requested: 3,
            available: 1,
        };
        assert_eq!(
            ProductError::from(FrameworkError::EntityError(Box::new(inner.clone()))),
            inner
        );
    }
}
