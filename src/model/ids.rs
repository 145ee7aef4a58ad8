//! Typed identifiers and boundary parsing.
//!
//! Ids are allocated by the owning store from a counter and print as `product_<n>` /
//! `cart_<n>`. The HTTP layer hands us text; [`FromStr`] accepts either the prefixed form or
//! the bare number and reports anything else as a validation failure.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Text that could not be turned into an id or a quantity.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("invalid {kind}: {input:?}")]
pub struct ParseError {
    pub kind: &'static str,
    pub input: String,
}

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "_{}"), self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                let digits = trimmed
                    .strip_prefix(concat!($prefix, "_"))
                    .unwrap_or(trimmed);
                match digits.parse::<u32>() {
                    Ok(n) if n > 0 => Ok(Self(n)),
                    _ => Err(ParseError {
                        kind: $kind,
                        input: s.to_string(),
                    }),
                }
            }
        }
    };
}

typed_id!(
    /// Identifier of a catalog product.
    ProductId,
    "product",
    "product id"
);

typed_id!(
    /// Identifier of a shopping cart.
    CartId,
    "cart",
    "cart id"
);

/// Parses a requested line quantity. Zero, negative and non-numeric input are rejected.
pub fn parse_quantity(s: &str) -> Result<u32, ParseError> {
    match s.trim().parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(ParseError {
            kind: "quantity",
            input: s.to_string(),
        }),
    }
}
