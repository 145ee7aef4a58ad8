//! ActorEntity trait implementation for the Product domain type.
//!
//! Enables [`Product`] to be managed by the generic [`crate::framework::ResourceActor`]:
//! creation validation, code uniqueness, the in-use delete guard, admin updates and the stock
//! primitives from [`ProductAction`].

use super::actions::{ProductAction, ProductActionResult};
use super::error::ProductError;
use crate::framework::ActorEntity;
use crate::model::{Product, ProductCreate, ProductId, ProductUpdate};
use async_trait::async_trait;
use chrono::Utc;

fn validate_text(field: &str, value: &str) -> Result<(), ProductError> {
    if value.trim().is_empty() {
        return Err(ProductError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), ProductError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ProductError::Validation(format!(
            "price must be a non-negative number, got {price}"
        )));
    }
    Ok(())
}

fn validate_quantity(quantity: u32) -> Result<(), ProductError> {
    if quantity == 0 {
        return Err(ProductError::Validation("quantity must be at least 1".into()));
    }
    Ok(())
}

#[async_trait]
impl ActorEntity for Product {
    type Id = ProductId;
    type Create = ProductCreate;
    type Update = ProductUpdate;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Context = ();
    type Error = ProductError;

    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, ProductError> {
        validate_text("title", &params.title)?;
        validate_text("code", &params.code)?;
        validate_text("category", &params.category)?;
        validate_price(params.price)?;

        Ok(Self {
            id,
            title: params.title,
            description: params.description,
            code: params.code,
            price: params.price,
            stock: params.stock,
            category: params.category,
            thumbnails: params.thumbnails,
            status: params.status.unwrap_or(true),
            created_at: Utc::now(),
            reserved: 0,
        })
    }

    fn conflicts_with(&self, existing: &Self) -> Option<ProductError> {
        (self.code == existing.code).then(|| ProductError::DuplicateCode(self.code.clone()))
    }

    /// Applies an admin edit. The code is fixed once set; `stock` is a restock and leaves the
    /// units held by carts alone.
    async fn on_update(&mut self, update: ProductUpdate, _ctx: &()) -> Result<(), ProductError> {
        if let Some(code) = update.code {
            if code != self.code {
                return Err(ProductError::Validation(format!(
                    "code is immutable: {} cannot become {}",
                    self.code, code
                )));
            }
        }
        if let Some(title) = update.title {
            validate_text("title", &title)?;
            self.title = title;
        }
        if let Some(category) = update.category {
            validate_text("category", &category)?;
            self.category = category;
        }
        if let Some(price) = update.price {
            validate_price(price)?;
            self.price = price;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
        if let Some(thumbnails) = update.thumbnails {
            self.thumbnails = thumbnails;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        Ok(())
    }

    async fn on_delete(&self, _ctx: &()) -> Result<(), ProductError> {
        if self.reserved > 0 {
            return Err(ProductError::ProductInUse {
                id: self.id.to_string(),
                reserved: self.reserved,
            });
        }
        Ok(())
    }

    /// # Actions
    /// - `CheckStock`: current stock
    /// - `ReserveStock`: stock → reserved if enough is left
    /// - `ReleaseStock`: reserved → stock
    async fn handle_action(
        &mut self,
        action: ProductAction,
        _ctx: &(),
    ) -> Result<ProductActionResult, ProductError> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::CheckStock(self.stock)),
            ProductAction::ReserveStock(quantity) => {
                validate_quantity(quantity)?;
                if self.stock < quantity {
                    return Err(ProductError::InsufficientStock {
                        requested: quantity,
                        available: self.stock,
                    });
                }
                self.stock -= quantity;
                self.reserved = self.reserved.saturating_add(quantity);
                Ok(ProductActionResult::ReserveStock(self.stock))
            }
            ProductAction::ReleaseStock(quantity) => {
                validate_quantity(quantity)?;
                self.stock = self.stock.checked_add(quantity).ok_or_else(|| {
                    ProductError::Validation(format!(
                        "releasing {quantity} would overflow stock {}",
                        self.stock
                    ))
                })?;
                self.reserved = self.reserved.saturating_sub(quantity);
                Ok(ProductActionResult::ReleaseStock(self.stock))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lamp(stock: u32) -> Product {
        Product::from_create_params(ProductId(1), ProductCreate::new("Lamp", "L-1", 20.0, stock, "home"))
            .unwrap()
    }

    #[test]
    fn create_validates_the_payload() {
        let product = lamp(5);
        assert!(product.status);
        assert_eq!(product.reserved, 0);

        let blank_title = ProductCreate::new("  ", "L-2", 1.0, 1, "home");
        assert!(matches!(
            Product::from_create_params(ProductId(2), blank_title),
            Err(ProductError::Validation(_))
        ));
        let negative = ProductCreate::new("Lamp", "L-3", -1.0, 1, "home");
        assert!(Product::from_create_params(ProductId(3), negative).is_err());
        let nan = ProductCreate::new("Lamp", "L-4", f64::NAN, 1, "home");
        assert!(Product::from_create_params(ProductId(4), nan).is_err());
    }

    #[test]
    fn codes_must_be_unique() {
        let a = lamp(1);
        let mut b = lamp(1);
        b.id = ProductId(2);
        assert_eq!(b.conflicts_with(&a), Some(ProductError::DuplicateCode("L-1".into())));
        b.code = "L-2".into();
        assert_eq!(b.conflicts_with(&a), None);
    }

    #[tokio::test]
    async fn reserve_is_all_or_nothing() {
        let mut product = lamp(3);
        let err = product
            .handle_action(ProductAction::ReserveStock(4), &())
            .await
            .unwrap_err();
        assert_eq!(err, ProductError::InsufficientStock { requested: 4, available: 3 });
        assert_eq!(product.stock, 3);

        let ok = product.handle_action(ProductAction::ReserveStock(3), &()).await.unwrap();
        assert_eq!(ok, ProductActionResult::ReserveStock(0));
        assert_eq!(product.reserved, 3);

        let back = product.handle_action(ProductAction::ReleaseStock(2), &()).await.unwrap();
        assert_eq!(back, ProductActionResult::ReleaseStock(2));
        assert_eq!(product.reserved, 1);
    }

    #[tokio::test]
    async fn release_past_reserved_saturates_and_overflow_is_rejected() {
        let mut product = lamp(1);
        product.handle_action(ProductAction::ReleaseStock(5), &()).await.unwrap();
        assert_eq!((product.stock, product.reserved), (6, 0));

        product.stock = u32::MAX;
        assert!(matches!(
            product.handle_action(ProductAction::ReleaseStock(1), &()).await,
            Err(ProductError::Validation(_))
        ));
        assert!(product.handle_action(ProductAction::ReserveStock(0), &()).await.is_err());
    }

    #[tokio::test]
    async fn code_is_immutable_but_other_fields_update() {
        let mut product = lamp(1);
        let rename = ProductUpdate {
            code: Some("L-9".into()),
            ..Default::default()
        };
        assert!(matches!(
            product.on_update(rename, &()).await,
            Err(ProductError::Validation(_))
        ));

        let edit = ProductUpdate {
            code: Some("L-1".into()),
            price: Some(25.0),
            stock: Some(40),
            status: Some(false),
            ..Default::default()
        };
        product.on_update(edit, &()).await.unwrap();
        assert_eq!((product.price, product.stock, product.status), (25.0, 40, false));
    }

    #[tokio::test]
    async fn delete_is_refused_while_carts_hold_units() {
        let mut product = lamp(2);
        product.handle_action(ProductAction::ReserveStock(1), &()).await.unwrap();
        assert_eq!(
            product.on_delete(&()).await,
            Err(ProductError::ProductInUse { id: "product_1".into(), reserved: 1 })
        );
        product.handle_action(ProductAction::ReleaseStock(1), &()).await.unwrap();
        assert!(product.on_delete(&()).await.is_ok());
    }
}
