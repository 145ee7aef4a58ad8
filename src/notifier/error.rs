use crate::product_actor::ProductError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum NotifierError {
    #[error("Notifier closed")]
    Closed,
    #[error("Notifier dropped response channel")]
    Dropped,
    /// The snapshot for a new subscriber could not be built.
    #[error("Catalog unavailable for snapshot: {0}")]
    Catalog(#[from] ProductError),
}
