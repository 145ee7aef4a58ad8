use storefront_sync::config::SystemConfig;
use storefront_sync::lifecycle::{setup_tracing_with, StorefrontSystem};
use storefront_sync::model::ProductCreate;
use storefront_sync::notifier::CatalogEvent;
use storefront_sync::query::{ListingQuery, PriceSort};
use tracing::{error, info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = match std::env::var("STOREFRONT_CONFIG") {
        Ok(path) => SystemConfig::load(&path).map_err(|e| e.to_string())?,
        Err(_) => SystemConfig::default(),
    };
    setup_tracing_with(config.log_format);

    info!("Starting storefront");
    let system = StorefrontSystem::with_config(&config).map_err(|e| e.to_string())?;
    let coordinator = system.coordinator.clone();

    let mut viewer = coordinator.subscribe().await.map_err(|e| e.to_string())?;
    let viewer_task = tokio::spawn(
        async move {
            while let Some(event) = viewer.recv().await {
                match (&event, event.to_json()) {
                    (CatalogEvent::Snapshot(snapshot), _) => info!(
                        version = snapshot.version,
                        products = snapshot.products.len(),
                        "Catalog update"
                    ),
                    (CatalogEvent::ProductAdded(product), Ok(json)) => {
                        info!(product_id = %product.id, %json, "Product added")
                    }
                    (_, Err(e)) => warn!(error = %e, "Event not encodable"),
                }
            }
        }
        .instrument(tracing::info_span!("viewer")),
    );

    let span = tracing::info_span!("catalog_setup");
    let (lamp, chair) = async {
        let lamp = coordinator
            .create_product(ProductCreate::new("Desk lamp", "LAMP-1", 24.5, 3, "home"))
            .await?;
        let chair = coordinator
            .create_product(ProductCreate::new("Chair", "CHAIR-1", 80.0, 5, "home"))
            .await?;
        Ok::<_, storefront_sync::coordinator::CoordinatorError>((lamp, chair))
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;
    info!(%lamp, %chair, "Catalog ready");

    let span = tracing::info_span!("cart_flow");
    let outcome = async {
        let cart = coordinator.create_cart().await?;
        coordinator.add_to_cart(cart, lamp, 2).await?;
        coordinator.add_to_cart(cart, chair, 1).await?;

        if let Err(e) = coordinator.add_to_cart(cart, lamp, 5).await {
            warn!(error = %e, "Second lamp order rejected");
        }
        coordinator.update_line_quantity(cart, chair, 3).await?;

        let view = coordinator.get_cart_view(cart).await?;
        info!(cart_id = %cart, total = view.total, lines = view.lines.len(), "Cart");

        let restored = coordinator.delete_cart(cart).await?;
        info!(lines = restored.len(), "Cart deleted, stock restored");
        Ok::<_, storefront_sync::coordinator::CoordinatorError>(())
    }
    .instrument(span)
    .await;
    if let Err(e) = outcome {
        error!(error = %e, "Cart flow failed");
    }

    let page = coordinator
        .list_catalog(&ListingQuery::default().sort(PriceSort::Desc).limit(1))
        .await
        .map_err(|e| e.to_string())?;
    info!(
        first = ?page.items.first().map(|p| &p.title),
        total_pages = page.total_pages,
        next = ?page.next_link,
        "Listing"
    );

    drop(coordinator);
    system.shutdown().await?;
    let _ = viewer_task.await;

    info!("Application completed successfully");
    Ok(())
}
