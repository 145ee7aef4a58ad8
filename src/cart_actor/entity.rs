//! ActorEntity trait implementation for [`Cart`].
//!
//! Lines are only changed through [`CartAction`]; the generic update path is closed.

use super::actions::{CartAction, CartActionResult};
use super::error::CartError;
use crate::framework::ActorEntity;
use crate::model::{Cart, CartCreate, CartId, CartLine, LineChange, ProductId};
use async_trait::async_trait;

impl Cart {
    fn upsert_line(&mut self, product_id: ProductId, delta: i64) -> Result<LineChange, CartError> {
        let index = self.lines.iter().position(|line| line.product_id == product_id);
        let previous = index.map_or(0, |i| self.lines[i].quantity);
        let next = i64::from(previous) + delta;
        let current = u32::try_from(next.max(0)).map_err(|_| {
            CartError::Validation(format!("quantity for {product_id} would exceed {}", u32::MAX))
        })?;

        match (index, current) {
            (Some(i), 0) => {
                self.lines.remove(i);
            }
            (Some(i), quantity) => self.lines[i].quantity = quantity,
            (None, 0) => {}
            (None, quantity) => self.lines.push(CartLine {
                product_id,
                quantity,
            }),
        }
        Ok(LineChange { previous, current })
    }

    fn remove_line(&mut self, product_id: ProductId) -> u32 {
        match self.lines.iter().position(|line| line.product_id == product_id) {
            Some(i) => self.lines.remove(i).quantity,
            None => 0,
        }
    }
}

#[async_trait]
impl ActorEntity for Cart {
    type Id = CartId;
    type Create = CartCreate;
    type Update = ();
    type Action = CartAction;
    type ActionResult = CartActionResult;
    type Context = ();
    type Error = CartError;

    fn from_create_params(id: CartId, _params: CartCreate) -> Result<Self, CartError> {
        Ok(Cart::new(id))
    }

    async fn on_update(&mut self, _update: (), _ctx: &()) -> Result<(), CartError> {
        Err(CartError::Validation(
            "cart lines change only through line actions".into(),
        ))
    }

    async fn handle_action(
        &mut self,
        action: CartAction,
        _ctx: &(),
    ) -> Result<CartActionResult, CartError> {
        match action {
            CartAction::UpsertLine { product_id, delta } => {
                self.upsert_line(product_id, delta).map(CartActionResult::UpsertLine)
            }
            CartAction::RemoveLine(product_id) => {
                Ok(CartActionResult::RemoveLine(self.remove_line(product_id)))
            }
            CartAction::Clear => Ok(CartActionResult::Clear(std::mem::take(&mut self.lines))),
        }
    }
}
