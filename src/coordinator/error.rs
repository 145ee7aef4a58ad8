//! Error taxonomy reported by the coordinator.

use crate::cart_actor::CartError;
use crate::model::ProductId;
use crate::notifier::NotifierError;
use crate::product_actor::ProductError;
use std::fmt;
use thiserror::Error;

/// A cart line whose stock could not be put back where it belongs.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseFailure {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Why the restoring step failed.
    pub error: String,
}

impl fmt::Display for ReleaseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{}: {}", self.product_id, self.quantity, self.error)
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoordinatorError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },

    #[error("Duplicate product code: {0}")]
    DuplicateCode(String),

    #[error("Product {product_id} is in use: {reserved} units held by carts")]
    ProductInUse { product_id: String, reserved: u32 },

    /// A saga failed part-way and could not be fully undone. `failures` lists every line left
    /// out of step; `cause` is the failure that started the compensation, if any.
    #[error("Compensation failed during {operation}: {}", format_failures(.failures))]
    CompensationFailure {
        operation: &'static str,
        failures: Vec<ReleaseFailure>,
        cause: Option<Box<CoordinatorError>>,
    },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

fn format_failures(failures: &[ReleaseFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ProductError> for CoordinatorError {
    fn from(e: ProductError) -> Self {
        match e {
            ProductError::NotFound(id) => CoordinatorError::NotFound(id),
            ProductError::InsufficientStock {
                requested,
                available,
            } => CoordinatorError::InsufficientStock {
                requested,
                available,
            },
            ProductError::DuplicateCode(code) => CoordinatorError::DuplicateCode(code),
            ProductError::ProductInUse { id, reserved } => CoordinatorError::ProductInUse {
                product_id: id,
                reserved,
            },
            ProductError::Validation(msg) => CoordinatorError::Validation(msg),
            ProductError::StoreUnavailable(msg) => CoordinatorError::StoreUnavailable(msg),
        }
    }
}

impl From<CartError> for CoordinatorError {
    fn from(e: CartError) -> Self {
        match e {
            CartError::NotFound(id) => CoordinatorError::NotFound(id),
            CartError::Validation(msg) => CoordinatorError::Validation(msg),
            CartError::StoreUnavailable(msg) => CoordinatorError::StoreUnavailable(msg),
        }
    }
}

impl From<NotifierError> for CoordinatorError {
    fn from(e: NotifierError) -> Self {
        match e {
            NotifierError::Catalog(inner) => inner.into(),
            other => CoordinatorError::StoreUnavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compensation_failure_lists_every_line() {
        let err = CoordinatorError::CompensationFailure {
            operation: "delete_cart",
            failures: vec![
                ReleaseFailure {
                    product_id: ProductId(1),
                    quantity: 2,
                    error: "down".into(),
                },
                ReleaseFailure {
                    product_id: ProductId(3),
                    quantity: 1,
                    error: "down".into(),
                },
            ],
            cause: None,
        };
        assert_eq!(
            err.to_string(),
            "Compensation failed during delete_cart: product_1 x2: down; product_3 x1: down"
        );
    }
}
