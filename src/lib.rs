//! # Storefront Sync
//!
//! Inventory–cart consistency engine with live catalog fan-out, built from resource actors
//! on Tokio.
//!
//! ## Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! The generic [`ResourceActor<T>`](framework::ResourceActor) owns one store and handles its
//! requests one at a time, which is what makes every stock check-and-decrement atomic.
//!
//! ### 2. The Stores ([`product_actor`], [`cart_actor`])
//! [`ActorEntity`](framework::ActorEntity) implementations for [`Product`](model::Product)
//! (stock primitives, code uniqueness, in-use delete guard) and [`Cart`](model::Cart) (line
//! primitives).
//!
//! ### 3. The Interface ([`clients`])
//! Typed wrappers over the generic client, one per store.
//!
//! ### 4. The Sagas ([`coordinator`])
//! [`ConsistencyCoordinator`](coordinator::ConsistencyCoordinator) pairs every cart change
//! with the matching stock change and compensates when the second step fails.
//!
//! ### 5. Fan-out and Listings ([`notifier`], [`query`])
//! Snapshot-on-subscribe, broadcast-on-mutation; pure filtering, sorting and pagination.
//!
//! ### 6. The Orchestrator ([`lifecycle`], [`config`])
//! [`StorefrontSystem`](lifecycle::StorefrontSystem) spawns and wires everything and shuts it
//! down again.
//!
//! ```bash
//! RUST_LOG=info cargo run
//! cargo test
//! ```

pub mod cart_actor;
pub mod clients;
pub mod config;
pub mod coordinator;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod notifier;
pub mod product_actor;
pub mod query;
