//! Generic actor framework for the record stores.
//!
//! # Main Components
//!
//! - [`ActorEntity`] - Trait that stored record types implement
//! - [`ResourceActor`] - Generic actor owning one store
//! - [`ResourceClient`] - Type-safe, cloneable handle to an actor
//! - [`FrameworkError`] - Plumbing errors (closed channel, missing record, entity error)
//!
//! # Testing
//!
//! See [`mock`] for a scripted client that answers without spawning a real store.

pub mod actor;
pub mod client;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
