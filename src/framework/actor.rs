//! # Generic Actor Server
//!
//! `ResourceActor` owns one store (all products, or all carts) and processes requests one at
//! a time. Because a request is handled entirely inside one turn of the loop, any
//! check-then-write an entity does in a hook is indivisible with respect to other callers.

use crate::framework::client::ResourceClient;
use crate::framework::entity::ActorEntity;
use crate::framework::error::FrameworkError;
use crate::framework::message::ResourceRequest;
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that manages a collection of records.
///
/// This is the "server" half: it owns the `store` and the receiving end of the channel.
/// Many clients may send concurrently; the actor serializes them. No `Mutex` guards the
/// store because nothing else can reach it.
///
/// # Usage Pattern
///
/// 1. **Create**: `ResourceActor::new()` returns the actor and a cloneable client.
/// 2. **Wire**: pass dependencies into `actor.run(context)`.
/// 3. **Run**: spawn the loop on a Tokio task.
///
/// The loop ends when every client has been dropped.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: BTreeMap<T::Id, T>,
    next_id: u32,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the request queue capacity; callers wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: BTreeMap::new(),
            next_id: 1,
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop until the channel closes.
    pub async fn run(mut self, context: T::Context) {
        // "Product" instead of "storefront_sync::model::product::Product"
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = T::Id::from(self.next_id);
                    self.next_id += 1;

                    let mut item = match T::from_create_params(id.clone(), params) {
                        Ok(item) => item,
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                            continue;
                        }
                    };
                    if let Some(e) = self.store.values().find_map(|other| item.conflicts_with(other)) {
                        warn!(entity_type, error = %e, "Create rejected");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    if let Err(e) = item.on_create(&context).await {
                        warn!(entity_type, error = %e, "on_create failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    self.store.insert(id.clone(), item);
                    info!(entity_type, %id, size = self.store.len(), "Created");
                    let _ = respond_to.send(Ok(id));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let found = item.is_some();
                    debug!(entity_type, %id, found, "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { respond_to } => {
                    debug!(entity_type, size = self.store.len(), "List");
                    let _ = respond_to.send(Ok(self.store.values().cloned().collect()));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    if let Some(item) = self.store.get_mut(&id) {
                        // Hooks mutate in place; work on a copy so a rejected update leaves
                        // the stored record untouched.
                        let mut candidate = item.clone();
                        if let Err(e) = candidate.on_update(update, &context).await {
                            warn!(entity_type, %id, error = %e, "Update failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                            continue;
                        }
                        *item = candidate;
                        info!(entity_type, %id, "Updated");
                        let _ = respond_to.send(Ok(item.clone()));
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    if let Some(item) = self.store.get(&id) {
                        if let Err(e) = item.on_delete(&context).await {
                            warn!(entity_type, %id, error = %e, "on_delete failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                            continue;
                        }
                        let removed = self.store.remove(&id);
                        info!(entity_type, %id, size = self.store.len(), "Deleted");
                        let _ = respond_to.send(
                            removed.ok_or_else(|| FrameworkError::NotFound(id.to_string())),
                        );
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    if let Some(item) = self.store.get_mut(&id) {
                        let mut candidate = item.clone();
                        let result = candidate
                            .handle_action(action, &context)
                            .await
                            .map_err(|e| FrameworkError::EntityError(Box::new(e)));
                        match &result {
                            Ok(_) => {
                                *item = candidate;
                                info!(entity_type, %id, "Action ok")
                            }
                            Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                        }
                        let _ = respond_to.send(result);
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Counter {
        id: u32,
        label: String,
        value: u32,
    }

    #[derive(Debug)]
    struct CounterCreate {
        label: String,
    }

    #[derive(Debug)]
    struct CounterUpdate {
        value: u32,
    }

    #[derive(Debug)]
    enum CounterAction {
        Bump,
        BumpThenFail,
    }

    #[derive(Debug, thiserror::Error, PartialEq)]
    enum CounterError {
        #[error("duplicate label {0}")]
        Duplicate(String),
        #[error("too big")]
        TooBig,
        #[error("locked")]
        Locked,
    }

    #[async_trait]
    impl ActorEntity for Counter {
        type Id = u32;
        type Create = CounterCreate;
        type Update = CounterUpdate;
        type Action = CounterAction;
        type ActionResult = u32;
        type Context = ();
        type Error = CounterError;

        fn from_create_params(id: u32, params: CounterCreate) -> Result<Self, Self::Error> {
            Ok(Self {
                id,
                label: params.label,
                value: 0,
            })
        }

        fn conflicts_with(&self, existing: &Self) -> Option<Self::Error> {
            (self.label == existing.label).then(|| CounterError::Duplicate(self.label.clone()))
        }

        async fn on_update(&mut self, update: CounterUpdate, _: &()) -> Result<(), Self::Error> {
            self.value = update.value;
            if self.value > 100 {
                return Err(CounterError::TooBig);
            }
            Ok(())
        }

        async fn on_delete(&self, _: &()) -> Result<(), Self::Error> {
            if self.value > 0 {
                return Err(CounterError::Locked);
            }
            Ok(())
        }

        async fn handle_action(&mut self, action: CounterAction, _: &()) -> Result<u32, Self::Error> {
            self.value += 1;
            match action {
                CounterAction::Bump => Ok(self.value),
                CounterAction::BumpThenFail => Err(CounterError::TooBig),
            }
        }
    }

    #[tokio::test]
    async fn crud_list_and_actions() {
        let (actor, client) = ResourceActor::<Counter>::new(8);
        tokio::spawn(actor.run(()));

        let a = client.create(CounterCreate { label: "a".into() }).await.unwrap();
        let b = client.create(CounterCreate { label: "b".into() }).await.unwrap();
        assert_eq!((a, b), (1, 2));

        let dup = client.create(CounterCreate { label: "a".into() }).await.unwrap_err();
        assert_eq!(
            dup.downcast_entity::<CounterError>().unwrap(),
            CounterError::Duplicate("a".into())
        );

        assert_eq!(client.perform_action(a, CounterAction::Bump).await.unwrap(), 1);

        let listed = client.list().await.unwrap();
        assert_eq!(listed.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 2]);

        let removed = client.delete(b).await.unwrap();
        assert_eq!(removed.label, "b");
        assert!(client.get(b).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_hooks_leave_the_record_untouched() {
        let (actor, client) = ResourceActor::<Counter>::new(8);
        tokio::spawn(actor.run(()));
        let id = client.create(CounterCreate { label: "x".into() }).await.unwrap();

        assert!(client.update(id, CounterUpdate { value: 500 }).await.is_err());
        assert!(client.perform_action(id, CounterAction::BumpThenFail).await.is_err());
        assert_eq!(client.get(id).await.unwrap().unwrap().value, 0);

        client.perform_action(id, CounterAction::Bump).await.unwrap();
        let locked = client.delete(id).await.unwrap_err();
        assert_eq!(locked.downcast_entity::<CounterError>().unwrap(), CounterError::Locked);
        assert!(client.get(id).await.unwrap().is_some());

        assert!(matches!(client.delete(99).await, Err(FrameworkError::NotFound(_))));
    }
}
