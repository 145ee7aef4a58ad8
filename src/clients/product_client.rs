//! # Product Client
//!
//! Provides a high‑level API for interacting with the `Product` actor.
//! It wraps a `ResourceClient<Product>` and exposes the catalog operations and the stock
//! primitives the coordinator builds its sagas from.
use crate::clients::actor_client::ActorClient;
use crate::framework::ResourceClient;
use crate::model::{Product, ProductCreate, ProductId, ProductUpdate};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError};
use crate::query::{paginate, ListingQuery, Page};
use async_trait::async_trait;
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl ProductClient {
    pub fn new(inner: ResourceClient<Product>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Product> for ProductClient {
    type Error = ProductError;

    fn inner(&self) -> &ResourceClient<Product> {
        &self.inner
    }
}

impl ProductClient {
    #[instrument(skip(self))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<ProductId, ProductError> {
        debug!("Sending request");
        Ok(self.inner.create(params).await?)
    }

    /// Like [`ActorClient::get`], with a missing product reported as `NotFound`.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner
            .get(id)
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, ProductError> {
        debug!("Sending request");
        Ok(self.inner.update(id, update).await?)
    }

    /// Check the current stock level for a product.
    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: ProductId) -> Result<u32, ProductError> {
        debug!("Checking stock for product {}", id);
        match self.inner.perform_action(id, ProductAction::CheckStock).await? {
            ProductActionResult::CheckStock(level) => Ok(level),
            _ => unreachable!("CheckStock action must return CheckStock result"),
        }
    }

    /// Atomically takes `quantity` units out of stock.
    ///
    /// Returns the stock left, or `InsufficientStock` with the stock untouched.
    #[instrument(skip(self))]
    pub async fn reserve_stock(&self, id: ProductId, quantity: u32) -> Result<u32, ProductError> {
        debug!("Reserving {} units for product {}", quantity, id);
        match self
            .inner
            .perform_action(id, ProductAction::ReserveStock(quantity))
            .await?
        {
            ProductActionResult::ReserveStock(level) => Ok(level),
            _ => unreachable!("ReserveStock action must return ReserveStock result"),
        }
    }

    /// Puts `quantity` units back into stock and returns the new level.
    #[instrument(skip(self))]
    pub async fn release_stock(&self, id: ProductId, quantity: u32) -> Result<u32, ProductError> {
        debug!("Releasing {} units for product {}", quantity, id);
        match self
            .inner
            .perform_action(id, ProductAction::ReleaseStock(quantity))
            .await?
        {
            ProductActionResult::ReleaseStock(level) => Ok(level),
            _ => unreachable!("ReleaseStock action must return ReleaseStock result"),
        }
    }

    /// One filtered, sorted page of the catalog.
    #[instrument(skip(self))]
    pub async fn list_catalog(&self, query: &ListingQuery) -> Result<Page<Product>, ProductError> {
        debug!("Sending request");
        let products = self.inner.list().await?;
        Ok(paginate(products, query))
    }

    /// Distinct categories, sorted.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<String>, ProductError> {
        debug!("Sending request");
        let products = self.inner.list().await?;
        let categories: BTreeSet<String> = products.into_iter().map(|p| p.category).collect();
        Ok(categories.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockClient;
    use crate::framework::FrameworkError;

    #[tokio::test]
    async fn test_check_stock_returns_correct_level() {
        let mut mock = MockClient::<Product>::new();
        mock.expect_action(ProductId(1))
            .return_ok(ProductActionResult::CheckStock(42));

        let client = ProductClient::new(mock.client());
        assert_eq!(client.check_stock(ProductId(1)).await.unwrap(), 42);
        assert_eq!(mock.take_actions(), vec![(ProductId(1), ProductAction::CheckStock)]);
        mock.verify();
    }

    #[tokio::test]
    async fn test_reserve_stock_insufficient_stock() {
        let mut mock = MockClient::<Product>::new();
        mock.expect_action(ProductId(1))
            .return_err(FrameworkError::EntityError(Box::new(
                ProductError::InsufficientStock {
                    requested: 100,
                    available: 3,
                },
            )));

        let client = ProductClient::new(mock.client());
        let result = client.reserve_stock(ProductId(1), 100).await;
        assert_eq!(
            result,
            Err(ProductError::InsufficientStock {
                requested: 100,
                available: 3
            })
        );
        mock.verify();
    }

    #[tokio::test]
    async fn test_missing_product_is_not_found() {
        let mut mock = MockClient::<Product>::new();
        mock.expect_get(ProductId(7)).return_ok(None);
        mock.expect_action(ProductId(7))
            .return_err(FrameworkError::NotFound("product_7".into()));

        let client = ProductClient::new(mock.client());
        assert_eq!(
            client.get_product(ProductId(7)).await,
            Err(ProductError::NotFound("product_7".into()))
        );
        assert_eq!(
            client.release_stock(ProductId(7), 1).await,
            Err(ProductError::NotFound("product_7".into()))
        );
        mock.verify();
    }

    #[tokio::test]
    async fn test_categories_are_distinct_and_sorted() {
        let mut mock = MockClient::<Product>::new();
        mock.expect_list().return_ok(vec![
            Product::new(ProductId(1), "A", "A", 1.0, 1, "toys"),
            Product::new(ProductId(2), "B", "B", 1.0, 1, "books"),
            Product::new(ProductId(3), "C", "C", 1.0, 1, "toys"),
        ]);

        let client = ProductClient::new(mock.client());
        assert_eq!(client.list_categories().await.unwrap(), vec!["books", "toys"]);
        mock.verify();
    }

    #[tokio::test]
    async fn test_closed_store_is_unavailable() {
        let mut mock = MockClient::<Product>::new();
        mock.expect_list().return_err(FrameworkError::ActorClosed);

        let client = ProductClient::new(mock.client());
        assert!(matches!(
            client.list_catalog(&ListingQuery::default()).await,
            Err(ProductError::StoreUnavailable(_))
        ));
    }
}
