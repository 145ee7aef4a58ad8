//! # Cart Client
//!
//! Wraps a `ResourceClient<Cart>` with the cart line primitives. Nothing here touches stock;
//! pairing line changes with stock changes is the coordinator's job.
use crate::cart_actor::{CartAction, CartActionResult, CartError};
use crate::clients::actor_client::ActorClient;
use crate::framework::ResourceClient;
use crate::model::{Cart, CartCreate, CartId, CartLine, LineChange, ProductId};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Cart actor.
#[derive(Clone)]
pub struct CartClient {
    inner: ResourceClient<Cart>,
}

impl CartClient {
    pub fn new(inner: ResourceClient<Cart>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Cart> for CartClient {
    type Error = CartError;

    fn inner(&self) -> &ResourceClient<Cart> {
        &self.inner
    }
}

impl CartClient {
    /// Creates an empty cart.
    #[instrument(skip(self))]
    pub async fn create_cart(&self) -> Result<CartId, CartError> {
        debug!("Sending request");
        Ok(self.inner.create(CartCreate).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_cart(&self, id: CartId) -> Result<Cart, CartError> {
        debug!("Sending request");
        self.inner
            .get(id)
            .await?
            .ok_or_else(|| CartError::NotFound(id.to_string()))
    }

    /// Adds `delta` (possibly negative) to the product's line.
    #[instrument(skip(self))]
    pub async fn upsert_line(
        &self,
        id: CartId,
        product_id: ProductId,
        delta: i64,
    ) -> Result<LineChange, CartError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id, CartAction::UpsertLine { product_id, delta })
            .await?
        {
            CartActionResult::UpsertLine(change) => Ok(change),
            _ => unreachable!("UpsertLine action must return UpsertLine result"),
        }
    }

    /// Removes the product's line and returns its quantity (0 if absent).
    #[instrument(skip(self))]
    pub async fn remove_line(&self, id: CartId, product_id: ProductId) -> Result<u32, CartError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id, CartAction::RemoveLine(product_id))
            .await?
        {
            CartActionResult::RemoveLine(quantity) => Ok(quantity),
            _ => unreachable!("RemoveLine action must return RemoveLine result"),
        }
    }

    /// Empties the cart, returning the lines it held.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self, id: CartId) -> Result<Vec<CartLine>, CartError> {
        debug!("Sending request");
        match self.inner.perform_action(id, CartAction::Clear).await? {
            CartActionResult::Clear(lines) => Ok(lines),
            _ => unreachable!("Clear action must return Clear result"),
        }
    }

    /// Destroys the cart, returning the lines it held.
    #[instrument(skip(self))]
    pub async fn delete_cart(&self, id: CartId) -> Result<Vec<CartLine>, CartError> {
        debug!("Sending request");
        Ok(self.inner.delete(id).await?.lines)
    }
}
