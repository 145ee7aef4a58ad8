//! # Consistency Coordinator
//!
//! Every operation that touches both a cart and the catalog goes through here. The coordinator
//! keeps no state of its own; it sequences the stock primitives of the product actor and the
//! line primitives of the cart actor so that, for every product,
//! `stock + Σ cart quantities` stays constant.
//!
//! ## Ordering
//!
//! Stock is reserved before a cart line grows, and released after a cart line shrinks. Each
//! single step is atomic inside its actor; the sequence is not, so a failure between steps is
//! undone by a compensating step. When the compensation fails too, the caller gets
//! [`CoordinatorError::CompensationFailure`] naming every line left out of step.
//!
//! ```text
//! add_to_cart:     reserve ─▶ upsert(+q)          upsert fails ─▶ release
//! increase:        reserve ─▶ upsert(+d)          upsert fails ─▶ release
//! decrease:        upsert(-d) ─▶ release(removed)  release fails ─▶ upsert(+removed)
//! remove_from_cart: remove ─▶ release(removed)     release fails ─▶ upsert(+removed)
//! clear/delete:    clear|delete ─▶ release each line (best effort)
//! ```
//!
//! Validation and existence checks run before anything is changed. After any mutation the
//! notifier is told, whether the whole saga succeeded or not.

mod error;

pub use error::*;

use crate::clients::{ActorClient, CartClient, ProductClient};
use crate::model::{
    Cart, CartId, CartLine, CartView, LineChange, Product, ProductCreate, ProductId,
    ProductUpdate,
};
use crate::notifier::{CatalogChange, NotifierHandle, Subscription};
use crate::query::{ListingQuery, Page};
use std::cmp::Ordering;
use tracing::{error, info, instrument, warn};

/// Facade over the catalog, the cart store and the notifier.
#[derive(Clone)]
pub struct ConsistencyCoordinator {
    products: ProductClient,
    carts: CartClient,
    notifier: NotifierHandle,
}

impl ConsistencyCoordinator {
    pub fn new(products: ProductClient, carts: CartClient, notifier: NotifierHandle) -> Self {
        Self {
            products,
            carts,
            notifier,
        }
    }

    // --- Carts ---

    #[instrument(skip(self))]
    pub async fn create_cart(&self) -> Result<CartId, CoordinatorError> {
        let id = self.carts.create_cart().await?;
        info!(cart_id = %id, "Cart created");
        Ok(id)
    }

    #[instrument(skip(self))]
    pub async fn get_cart(&self, cart_id: CartId) -> Result<Cart, CoordinatorError> {
        Ok(self.carts.get_cart(cart_id).await?)
    }

    /// Every cart, in id order.
    #[instrument(skip(self))]
    pub async fn list_carts(&self) -> Result<Vec<Cart>, CoordinatorError> {
        Ok(self.carts.list().await?)
    }

    /// The cart with each line's product resolved and the total computed.
    #[instrument(skip(self))]
    pub async fn get_cart_view(&self, cart_id: CartId) -> Result<CartView, CoordinatorError> {
        let cart = self.carts.get_cart(cart_id).await?;
        let catalog = self.products.list().await?;
        Ok(CartView::resolve(&cart, &catalog))
    }

    /// Reserves `quantity` units and adds them to the cart's line for the product.
    ///
    /// Nothing changes if the stock is short or the cart does not exist.
    #[instrument(skip(self))]
    pub async fn add_to_cart(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<LineChange, CoordinatorError> {
        if quantity == 0 {
            return Err(CoordinatorError::Validation(
                "quantity must be at least 1".into(),
            ));
        }
        self.carts.get_cart(cart_id).await?;

        self.products.reserve_stock(product_id, quantity).await?;
        let result = self.grow_line("add_to_cart", cart_id, product_id, quantity).await;
        self.notify_stock(vec![product_id]);
        let change = result?;
        info!(%cart_id, %product_id, quantity = change.current, "Added to cart");
        Ok(change)
    }

    /// Sets the line for `product_id` to `new_quantity`, reserving or releasing the difference.
    ///
    /// The line must already exist. An increase beyond the available stock fails with
    /// `InsufficientStock` and changes nothing.
    #[instrument(skip(self))]
    pub async fn update_line_quantity(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        new_quantity: u32,
    ) -> Result<LineChange, CoordinatorError> {
        if new_quantity == 0 {
            return Err(CoordinatorError::Validation(
                "quantity must be at least 1; remove the line instead".into(),
            ));
        }
        let cart = self.carts.get_cart(cart_id).await?;
        let current = cart.quantity_of(product_id);
        if current == 0 {
            return Err(CoordinatorError::NotFound(format!(
                "{product_id} in {cart_id}"
            )));
        }

        let result = match new_quantity.cmp(&current) {
            Ordering::Equal => {
                return Ok(LineChange {
                    previous: current,
                    current,
                })
            }
            Ordering::Greater => {
                let delta = new_quantity - current;
                self.products.reserve_stock(product_id, delta).await?;
                self.grow_line("update_line_quantity", cart_id, product_id, delta)
                    .await
            }
            Ordering::Less => {
                let delta = current - new_quantity;
                let change = self
                    .carts
                    .upsert_line(cart_id, product_id, -i64::from(delta))
                    .await?;
                let removed = change.previous.saturating_sub(change.current);
                self.release_removed("update_line_quantity", cart_id, product_id, removed)
                    .await
                    .map(|()| change)
            }
        };
        self.notify_stock(vec![product_id]);
        let change = result?;
        info!(%cart_id, %product_id, from = change.previous, to = change.current, "Line updated");
        Ok(change)
    }

    /// Removes the product's line and puts its units back in stock.
    ///
    /// Removing a line that is not there succeeds and returns 0.
    #[instrument(skip(self))]
    pub async fn remove_from_cart(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<u32, CoordinatorError> {
        let removed = self.carts.remove_line(cart_id, product_id).await?;
        if removed == 0 {
            return Ok(0);
        }
        let result = self
            .release_removed("remove_from_cart", cart_id, product_id, removed)
            .await;
        self.notify_stock(vec![product_id]);
        result?;
        info!(%cart_id, %product_id, removed, "Removed from cart");
        Ok(removed)
    }

    /// Empties the cart and restores the stock of every line. The cart itself stays.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self, cart_id: CartId) -> Result<Vec<CartLine>, CoordinatorError> {
        let lines = self.carts.clear_cart(cart_id).await?;
        self.release_all("clear_cart", &lines).await?;
        info!(%cart_id, lines = lines.len(), "Cart cleared");
        Ok(lines)
    }

    /// Destroys the cart and restores the stock of every line it held.
    #[instrument(skip(self))]
    pub async fn delete_cart(&self, cart_id: CartId) -> Result<Vec<CartLine>, CoordinatorError> {
        let lines = self.carts.delete_cart(cart_id).await?;
        self.release_all("delete_cart", &lines).await?;
        info!(%cart_id, lines = lines.len(), "Cart deleted");
        Ok(lines)
    }

    // --- Catalog ---

    #[instrument(skip(self))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<ProductId, CoordinatorError> {
        let id = self.products.create_product(params).await?;
        match self.products.get_product(id).await {
            Ok(product) => self.notifier.notify(CatalogChange::ProductCreated(product)),
            Err(e) => {
                warn!(product_id = %id, error = %e, "Created product not readable");
                self.notifier.notify(CatalogChange::ProductUpdated(id));
            }
        }
        info!(product_id = %id, "Product created");
        Ok(id)
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, product_id: ProductId) -> Result<Product, CoordinatorError> {
        Ok(self.products.get_product(product_id).await?)
    }

    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        product_id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, CoordinatorError> {
        let product = self.products.update_product(product_id, update).await?;
        self.notifier.notify(CatalogChange::ProductUpdated(product_id));
        info!(%product_id, "Product updated");
        Ok(product)
    }

    /// Deletes a product. Refused with `ProductInUse` while any cart holds units of it.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, product_id: ProductId) -> Result<Product, CoordinatorError> {
        let product = self.products.delete(product_id).await?;
        self.notifier.notify(CatalogChange::ProductDeleted(product_id));
        info!(%product_id, "Product deleted");
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn list_catalog(&self, query: &ListingQuery) -> Result<Page<Product>, CoordinatorError> {
        Ok(self.products.list_catalog(query).await?)
    }

    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<String>, CoordinatorError> {
        Ok(self.products.list_categories().await?)
    }

    /// Connects a viewer to the change feed.
    pub async fn subscribe(&self) -> Result<Subscription, CoordinatorError> {
        Ok(self.notifier.subscribe().await?)
    }

    // --- Saga steps ---

    /// Adds already reserved units to the line, releasing them again if that fails.
    async fn grow_line(
        &self,
        operation: &'static str,
        cart_id: CartId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<LineChange, CoordinatorError> {
        let cause = match self
            .carts
            .upsert_line(cart_id, product_id, i64::from(quantity))
            .await
        {
            Ok(change) => return Ok(change),
            Err(e) => CoordinatorError::from(e),
        };
        warn!(operation, %cart_id, %product_id, error = %cause, "Cart step failed, releasing reservation");

        match self.products.release_stock(product_id, quantity).await {
            Ok(_) => Err(cause),
            Err(e) => {
                error!(operation, %product_id, quantity, error = %e, "Release compensation failed");
                Err(CoordinatorError::CompensationFailure {
                    operation,
                    failures: vec![ReleaseFailure {
                        product_id,
                        quantity,
                        error: e.to_string(),
                    }],
                    cause: Some(Box::new(cause)),
                })
            }
        }
    }

    /// Releases units already taken off the line, putting them back on the line if that fails.
    async fn release_removed(
        &self,
        operation: &'static str,
        cart_id: CartId,
        product_id: ProductId,
        removed: u32,
    ) -> Result<(), CoordinatorError> {
        if removed == 0 {
            return Ok(());
        }
        let cause = match self.products.release_stock(product_id, removed).await {
            Ok(_) => return Ok(()),
            Err(e) => CoordinatorError::from(e),
        };
        warn!(operation, %cart_id, %product_id, error = %cause, "Release failed, restoring line");

        match self
            .carts
            .upsert_line(cart_id, product_id, i64::from(removed))
            .await
        {
            Ok(_) => Err(cause),
            Err(e) => {
                error!(operation, %cart_id, %product_id, removed, error = %e, "Line compensation failed");
                Err(CoordinatorError::CompensationFailure {
                    operation,
                    failures: vec![ReleaseFailure {
                        product_id,
                        quantity: removed,
                        error: e.to_string(),
                    }],
                    cause: Some(Box::new(cause)),
                })
            }
        }
    }

    /// Releases every line independently. A failed line does not stop the others.
    async fn release_all(
        &self,
        operation: &'static str,
        lines: &[CartLine],
    ) -> Result<(), CoordinatorError> {
        let mut failures = Vec::new();
        let mut touched = Vec::with_capacity(lines.len());
        for line in lines {
            match self
                .products
                .release_stock(line.product_id, line.quantity)
                .await
            {
                Ok(_) => touched.push(line.product_id),
                Err(e) => {
                    error!(
                        operation,
                        product_id = %line.product_id,
                        quantity = line.quantity,
                        error = %e,
                        "Release failed"
                    );
                    failures.push(ReleaseFailure {
                        product_id: line.product_id,
                        quantity: line.quantity,
                        error: e.to_string(),
                    });
                }
            }
        }
        if !touched.is_empty() {
            self.notify_stock(touched);
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(CoordinatorError::CompensationFailure {
                operation,
                failures,
                cause: None,
            })
        }
    }

    fn notify_stock(&self, products: Vec<ProductId>) {
        self.notifier.notify(CatalogChange::StockChanged(products));
    }
}
