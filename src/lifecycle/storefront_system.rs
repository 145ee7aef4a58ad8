use crate::clients::{CartClient, ProductClient};
use crate::config::{ConfigError, SystemConfig};
use crate::coordinator::ConsistencyCoordinator;
use crate::notifier::{ChangeNotifier, NotifierHandle};
use tracing::{error, info};

/// The runtime orchestrator for the storefront.
///
/// `StorefrontSystem` is responsible for:
/// - **Lifecycle Management**: starting and stopping the product, cart and notifier actors
/// - **Dependency Wiring**: the notifier reads snapshots through a `ProductClient`, the
///   coordinator talks to all three
///
/// # Example
///
/// ```ignore
/// let system = StorefrontSystem::new();
///
/// let product_id = system.coordinator.create_product(params).await?;
/// let cart_id = system.coordinator.create_cart().await?;
/// system.coordinator.add_to_cart(cart_id, product_id, 2).await?;
///
/// system.shutdown().await?;
/// ```
pub struct StorefrontSystem {
    /// Entry point for every cart and catalog operation.
    pub coordinator: ConsistencyCoordinator,

    /// Direct access to the catalog, for reads that bypass the coordinator.
    pub product_client: ProductClient,

    pub cart_client: CartClient,

    pub notifier: NotifierHandle,

    /// Task handles for all running actors (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl Default for StorefrontSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl StorefrontSystem {
    /// Starts the system with the default capacities. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        Self::spawn(&SystemConfig::default())
    }

    /// Starts the system with the given capacities after validating them.
    pub fn with_config(config: &SystemConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::spawn(config))
    }

    fn spawn(config: &SystemConfig) -> Self {
        // 1. Create actors (no dependencies)
        let (product_actor, product_client) = crate::product_actor::new(config.product_buffer);
        let (cart_actor, cart_client) = crate::cart_actor::new(config.cart_buffer);
        let (notifier, notifier_handle) =
            ChangeNotifier::new(config.notifier_buffer, config.subscriber_buffer);

        // 2. Start actors with injected context
        let product_handle = tokio::spawn(product_actor.run(()));
        let cart_handle = tokio::spawn(cart_actor.run(()));
        let notifier_handle_task = tokio::spawn(notifier.run(product_client.clone()));

        let coordinator = ConsistencyCoordinator::new(
            product_client.clone(),
            cart_client.clone(),
            notifier_handle.clone(),
        );

        info!(?config, "System started");
        Self {
            coordinator,
            product_client,
            cart_client,
            notifier: notifier_handle,
            handles: vec![notifier_handle_task, product_handle, cart_handle],
        }
    }

    /// Gracefully shuts down the entire system.
    ///
    /// Dropping the handles closes every channel; each actor then drains and exits. The
    /// notifier holds a product client of its own, so the catalog stops only after the
    /// notifier has. Clones of the coordinator or clients held elsewhere keep their actors
    /// alive and make this wait for them.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if all actors shut down cleanly
    /// - `Err(String)` if any actor task failed or panicked
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        drop(self.coordinator);
        drop(self.product_client);
        drop(self.cart_client);
        drop(self.notifier);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
