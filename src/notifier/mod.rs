//! # Change Notifier
//!
//! Pushes the canonical catalog to every connected viewer after each mutation.
//!
//! The notifier is an actor like the stores: one task owns the subscriber registry and is the
//! only thing that ever touches it. It listens on two channels:
//!
//! - subscribe requests (bounded): build a snapshot, register a bounded channel, hand the
//!   first event over.
//! - catalog changes (unbounded): drain every change waiting, send `productAdded` for each
//!   creation, then rebuild the snapshot once and fan it out.
//!
//! Changes never share a queue with subscribe requests, so [`NotifierHandle::notify`] neither
//! blocks nor loses a change. A burst of changes still costs a single snapshot. Queued
//! subscribe requests are served first; every change received afterwards reaches the new
//! subscriber too.
//!
//! Delivery never blocks the notifier. A subscriber whose channel is full or closed is dropped
//! and the rest carry on.

mod error;
mod events;

pub use error::*;
pub use events::*;

use crate::clients::{ActorClient, ProductClient};
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

struct SubscribeRequest {
    respond_to: oneshot::Sender<Result<Subscription, NotifierError>>,
}

/// A connected viewer's end of the fan-out.
///
/// Each subscription has room for `subscriber_buffer` undelivered events. A viewer that falls
/// that far behind is disconnected: the events already buffered are still delivered, then
/// [`recv`](Self::recv) returns `None` for good. Subscribe again to resume from a fresh
/// snapshot.
#[derive(Debug)]
pub struct Subscription {
    pub id: u64,
    receiver: mpsc::Receiver<CatalogEvent>,
}

impl Subscription {
    /// Next event; `None` once the notifier has dropped this subscriber or shut down.
    pub async fn recv(&mut self) -> Option<CatalogEvent> {
        self.receiver.recv().await
    }

    /// Next event if one is already waiting.
    pub fn try_recv(&mut self) -> Option<CatalogEvent> {
        self.receiver.try_recv().ok()
    }
}

/// Cloneable handle to the notifier task.
#[derive(Clone)]
pub struct NotifierHandle {
    sender: mpsc::Sender<SubscribeRequest>,
    changes: mpsc::UnboundedSender<CatalogChange>,
}

impl NotifierHandle {
    /// Registers a new subscriber. Its first event is a snapshot of the current catalog.
    #[tracing::instrument(skip(self))]
    pub async fn subscribe(&self) -> Result<Subscription, NotifierError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(SubscribeRequest { respond_to })
            .await
            .map_err(|_| NotifierError::Closed)?;
        response.await.map_err(|_| NotifierError::Dropped)?
    }

    /// Reports a mutation. Returns immediately.
    pub fn notify(&self, change: CatalogChange) {
        if self.changes.send(change).is_err() {
            warn!("Notifier closed, change not broadcast");
        }
    }
}

/// The notifier actor.
pub struct ChangeNotifier {
    receiver: mpsc::Receiver<SubscribeRequest>,
    changes: mpsc::UnboundedReceiver<CatalogChange>,
    subscribers: Vec<(u64, mpsc::Sender<CatalogEvent>)>,
    subscriber_buffer: usize,
    next_subscriber: u64,
    version: u64,
}

impl ChangeNotifier {
    /// `buffer_size` bounds the subscribe queue, `subscriber_buffer` each subscriber's channel.
    pub fn new(buffer_size: usize, subscriber_buffer: usize) -> (Self, NotifierHandle) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (changes_tx, changes) = mpsc::unbounded_channel();
        let notifier = Self {
            receiver,
            changes,
            subscribers: Vec::new(),
            subscriber_buffer,
            next_subscriber: 1,
            version: 0,
        };
        let handle = NotifierHandle {
            sender,
            changes: changes_tx,
        };
        (notifier, handle)
    }

    /// Runs until every handle is dropped. Snapshots are read through `products`.
    pub async fn run(mut self, products: ProductClient) {
        info!(entity_type = "ChangeNotifier", "Actor started");

        let mut subscribing = true;
        let mut changing = true;
        while subscribing || changing {
            tokio::select! {
                biased;
                request = self.receiver.recv(), if subscribing => match request {
                    Some(SubscribeRequest { respond_to }) => {
                        let result = self.register(&products).await;
                        if let Ok(subscription) = &result {
                            info!(
                                subscriber = subscription.id,
                                subscribers = self.subscribers.len(),
                                "Subscribed"
                            );
                        }
                        let _ = respond_to.send(result);
                    }
                    None => subscribing = false,
                },
                change = self.changes.recv(), if changing => match change {
                    Some(change) => self.publish(change, &products).await,
                    None => changing = false,
                },
            }
        }

        info!(
            entity_type = "ChangeNotifier",
            subscribers = self.subscribers.len(),
            "Shutdown"
        );
    }

    /// Broadcasts `first` and every change already waiting behind it, with one snapshot.
    async fn publish(&mut self, first: CatalogChange, products: &ProductClient) {
        let mut batch = vec![first];
        while let Ok(change) = self.changes.try_recv() {
            batch.push(change);
        }
        debug!(changes = batch.len(), "Notify");

        for change in batch {
            if let CatalogChange::ProductCreated(product) = change {
                self.broadcast(CatalogEvent::ProductAdded(product));
            }
        }
        match self.snapshot(products).await {
            Ok(snapshot) => self.broadcast(CatalogEvent::Snapshot(snapshot)),
            Err(e) => warn!(error = %e, "Snapshot failed, broadcast skipped"),
        }
    }

    async fn snapshot(
        &mut self,
        products: &ProductClient,
    ) -> Result<Arc<CatalogSnapshot>, NotifierError> {
        let listing = products.list().await?;
        self.version += 1;
        Ok(Arc::new(CatalogSnapshot {
            version: self.version,
            products: listing,
        }))
    }

    async fn register(&mut self, products: &ProductClient) -> Result<Subscription, NotifierError> {
        let snapshot = self.snapshot(products).await?;
        let (sender, receiver) = mpsc::channel(self.subscriber_buffer);
        // A fresh channel always has room for the first event.
        let _ = sender.try_send(CatalogEvent::Snapshot(snapshot));

        let id = self.next_subscriber;
        self.next_subscriber += 1;
        self.subscribers.push((id, sender));
        Ok(Subscription { id, receiver })
    }

    fn broadcast(&mut self, event: CatalogEvent) {
        self.subscribers
            .retain(|(id, sender)| match sender.try_send(event.clone()) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    warn!(subscriber = id, "Subscriber lagging, dropped");
                    false
                }
                Err(TrySendError::Closed(_)) => {
                    debug!(subscriber = id, "Subscriber disconnected");
                    false
                }
            });
        debug!(subscribers = self.subscribers.len(), "Broadcast");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockClient;
    use crate::framework::{ResourceClient, ResourceRequest};
    use crate::model::{Product, ProductCreate, ProductId};
    use crate::product_actor;
    use std::time::Duration;
    use tokio::time::timeout;

    async fn setup(subscriber_buffer: usize) -> (ProductClient, NotifierHandle) {
        let (catalog, products) = product_actor::new(8);
        tokio::spawn(catalog.run(()));
        let (notifier, handle) = ChangeNotifier::new(8, subscriber_buffer);
        tokio::spawn(notifier.run(products.clone()));
        (products, handle)
    }

    #[tokio::test]
    async fn subscribers_start_with_a_snapshot() {
        let (products, notifier) = setup(4).await;
        products
            .create_product(ProductCreate::new("Lamp", "L-1", 10.0, 3, "home"))
            .await
            .unwrap();

        let mut sub = notifier.subscribe().await.unwrap();
        match sub.recv().await {
            Some(CatalogEvent::Snapshot(snapshot)) => {
                assert_eq!(snapshot.products.len(), 1);
                assert_eq!(snapshot.products[0].id, ProductId(1));
            }
            other => panic!("expected snapshot, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn creation_sends_product_added_then_snapshot() {
        let (products, notifier) = setup(4).await;
        let mut sub = notifier.subscribe().await.unwrap();
        sub.recv().await.unwrap();

        let id = products
            .create_product(ProductCreate::new("Lamp", "L-1", 10.0, 3, "home"))
            .await
            .unwrap();
        let product = products.get_product(id).await.unwrap();
        notifier.notify(CatalogChange::ProductCreated(product.clone()));

        assert_eq!(sub.recv().await, Some(CatalogEvent::ProductAdded(product)));
        match sub.recv().await {
            Some(CatalogEvent::Snapshot(snapshot)) => assert_eq!(snapshot.version, 2),
            other => panic!("expected snapshot, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn lagging_subscriber_is_dropped_without_affecting_others() {
        let (_products, notifier) = setup(1).await;
        let mut lagging = notifier.subscribe().await.unwrap();
        let mut live = notifier.subscribe().await.unwrap();
        live.recv().await.unwrap();

        // `lagging` never drains its initial snapshot, so its channel of 1 is full.
        notifier.notify(CatalogChange::ProductUpdated(ProductId(1)));
        assert!(matches!(live.recv().await, Some(CatalogEvent::Snapshot(_))));

        assert!(matches!(lagging.recv().await, Some(CatalogEvent::Snapshot(_))));
        assert_eq!(lagging.recv().await, None);
    }

    async fn wait_until_queue_full(handle: &NotifierHandle) {
        while handle.sender.capacity() > 0 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn change_reported_while_subscribe_queue_is_full_is_still_broadcast() {
        let lamp = Product::new(ProductId(1), "Lamp", "L-1", 10.0, 3, "home");
        let mut catalog = MockClient::<Product>::new();
        catalog.expect_list().return_ok(Vec::new());
        catalog.expect_list().return_ok(vec![lamp.clone()]);

        let (notifier, handle) = ChangeNotifier::new(1, 8);
        let pending = tokio::spawn({
            let handle = handle.clone();
            async move { handle.subscribe().await }
        });
        wait_until_queue_full(&handle).await;
        handle.notify(CatalogChange::ProductCreated(lamp.clone()));

        tokio::spawn(notifier.run(ProductClient::new(catalog.client())));
        let mut sub = pending.await.unwrap().unwrap();

        match sub.recv().await {
            Some(CatalogEvent::Snapshot(snapshot)) => assert!(snapshot.products.is_empty()),
            other => panic!("expected snapshot, got {other:?}"),
        }
        assert_eq!(sub.recv().await, Some(CatalogEvent::ProductAdded(lamp)));
        match sub.recv().await {
            Some(CatalogEvent::Snapshot(snapshot)) => {
                assert_eq!(snapshot.version, 2);
                assert_eq!(snapshot.products.len(), 1);
            }
            other => panic!("expected snapshot, got {other:?}"),
        }
        catalog.verify();
    }

    #[tokio::test]
    async fn existing_subscriber_converges_while_others_are_joining() {
        let lamp = Product::new(ProductId(1), "Lamp", "L-1", 10.0, 3, "home");
        let (tx, mut catalog) = mpsc::channel::<ResourceRequest<Product>>(8);
        let (notifier, handle) = ChangeNotifier::new(1, 8);
        tokio::spawn(notifier.run(ProductClient::new(ResourceClient::new(tx))));

        let subscribe = |handle: &NotifierHandle| {
            let handle = handle.clone();
            tokio::spawn(async move { handle.subscribe().await })
        };
        let next_list = |request: Option<ResourceRequest<Product>>| match request {
            Some(ResourceRequest::List { respond_to }) => respond_to,
            other => panic!("expected list, got {other:?}"),
        };

        let first = subscribe(&handle);
        let _ = next_list(catalog.recv().await).send(Ok(Vec::new()));
        let mut first = first.await.unwrap().unwrap();
        assert!(matches!(first.recv().await, Some(CatalogEvent::Snapshot(_))));

        // The second subscriber's snapshot is in flight and the third waits in the queue.
        let second = subscribe(&handle);
        let held = next_list(catalog.recv().await);
        let third = subscribe(&handle);
        wait_until_queue_full(&handle).await;

        handle.notify(CatalogChange::StockChanged(vec![ProductId(1)]));
        let _ = held.send(Ok(Vec::new()));
        tokio::spawn(async move {
            while let Some(request) = catalog.recv().await {
                let _ = next_list(Some(request)).send(Ok(vec![lamp.clone()]));
            }
        });

        second.await.unwrap().unwrap();
        third.await.unwrap().unwrap();
        match timeout(Duration::from_secs(1), first.recv()).await {
            Ok(Some(CatalogEvent::Snapshot(snapshot))) => assert_eq!(snapshot.products.len(), 1),
            other => panic!("expected post-change snapshot, got {other:?}"),
        }
    }
}
