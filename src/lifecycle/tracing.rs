//! # Observability & Tracing
//!
//! Tracing setup for the storefront actors.
//!
//! ## Overview
//!
//! The [`setup_tracing`] function initializes structured logging with the `tracing` crate,
//! providing hierarchical spans that show the complete request flow through the system.
//!
//! ## Configuration
//!
//! Two formats, chosen by [`LogFormat`]: a compact format that hides the crate/module prefix
//! (`with_target(false)`), and one JSON object per line for log shippers.
//!
//! - **Structured logging** with `tracing` crate
//! - **Hierarchical spans** for request tracing
//! - **Configurable log levels** via `RUST_LOG` environment variable
//!
//! ## What Gets Traced
//!
//! - **Actor Lifecycle**: `Actor started` / `Shutdown` with an `entity_type` field
//! - **Store Operations**: Create, Get, List, Update, Delete and the stock and line actions
//! - **Sagas**: one span per coordinator operation; `warn` when a step is compensated,
//!   `error` when compensation fails
//! - **Fan-out**: subscriptions, broadcasts, dropped subscribers
//!
//! ## Usage Examples
//!
//! ```bash
//! # Compact logs (default)
//! RUST_LOG=info cargo run
//!
//! # Show full payloads with debug logs
//! RUST_LOG=debug cargo run
//!
//! # Very verbose tracing
//! RUST_LOG=trace cargo run
//!
//! # Filter to specific modules
//! RUST_LOG=storefront_sync::coordinator=debug cargo run
//! ```
//!
//! ## Workflow Trace Example
//!
//! **With `RUST_LOG=info`**, adding two units to a cart:
//!
//! ```text
//! INFO Action ok entity_type="Product" id=product_1
//! INFO Action ok entity_type="Cart" id=cart_1
//! INFO cart_flow:add_to_cart: Added to cart cart_id=cart_1 product_id=product_1 quantity=2
//! ```
//!
//! Actor lines carry no caller span: each actor logs from its own task.
//!
//! **With `RUST_LOG=debug`** the request payloads show up as well
//! (`Action ... action=ReserveStock(2)`) together with every broadcast.

use crate::config::LogFormat;

/// Installs the compact subscriber, filtered by `RUST_LOG`.
pub fn setup_tracing() {
    setup_tracing_with(LogFormat::Compact);
}

/// Installs a subscriber in the given format, filtered by `RUST_LOG`.
pub fn setup_tracing_with(format: LogFormat) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false); // entity_type identifies the actor
    match format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }
}
