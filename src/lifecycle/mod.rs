//! # System Lifecycle
//!
//! Starting, wiring and shutting down the actors.
//!
//! ## Wiring
//!
//! Actors are created without dependencies and receive them when their loop starts
//! (`run(context)`):
//!
//! - product and cart stores: `Context = ()`
//! - notifier: a [`ProductClient`](crate::clients::ProductClient) to read snapshots with
//! - coordinator: not an actor; it holds clients for all three
//!
//! The dependency graph is acyclic, so dropping every handle shuts everything down.
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop all handles** - closes the sender side of the channels
//! 2. **Actors detect closure** - `recv()` returns `None` once the queue is drained
//! 3. **Await completion** - wait for every actor task
//!
//! ## Observability
//!
//! [`setup_tracing`] installs the subscriber; see [`tracing`] for what gets logged.

pub mod storefront_system;
pub mod tracing;

pub use storefront_system::*;
pub use tracing::*;
