//! # ActorEntity Trait
//!
//! The `ActorEntity` trait is the contract every stored record (Product, Cart) implements to
//! be managed by the generic [`ResourceActor`](crate::framework::ResourceActor). It names the
//! record's identifier, its DTOs, its custom actions and its error type, and provides the
//! lifecycle hooks the actor loop calls while it owns the record.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::on_create`]
//! - [`ActorEntity::on_delete`]
//! - [`ActorEntity::conflicts_with`]
//!
//! The defaults accept everything.

use async_trait::async_trait;
use std::fmt::{Debug, Display};

/// Trait that any stored record must implement to be managed by `ResourceActor`.
///
/// # Async & Context
/// Hooks are `#[async_trait]` so they may await other actors. The `Context` type is injected
/// into every hook when the actor loop starts (`run(context)`), not at construction time.
///
/// # Atomicity
/// Every hook runs inside a single turn of the owning actor's loop. Whatever a hook reads and
/// writes on `self` happens without interleaving from other requests for the same store.
#[async_trait]
pub trait ActorEntity: Clone + Debug + Send + Sync + 'static {
    /// The unique identifier. Allocated by the actor from a `u32` counter; ordered so that
    /// listings come back in a stable id order.
    type Id: Ord + Clone + Send + Sync + Display + Debug + From<u32>;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Enum of record-specific operations (e.g. `ReserveStock`).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor. `()` when none.
    type Context: Send + Sync;

    /// One error enum for the whole store.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Build the full record from the allocated id and the creation payload.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Uniqueness check against an already stored record, run for every stored record
    /// before a new one is inserted. Return the error to reject the creation.
    fn conflicts_with(&self, _existing: &Self) -> Option<Self::Error> {
        None
    }

    // --- Lifecycle Hooks (Async) ---

    /// Called after the record is built and before it is inserted.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when an update request is received.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called before the record is removed. Returning an error keeps the record.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Handle a record-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
