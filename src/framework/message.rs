//! # Generic Messages
//!
//! Requests sent from a `ResourceClient` to its `ResourceActor`.

use crate::framework::entity::ActorEntity;
use crate::framework::error::FrameworkError;
use tokio::sync::oneshot;

/// One-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Request processed by a [`ResourceActor`](crate::framework::ResourceActor).
///
/// The variants cover the lifecycle of any stored record (CRUD plus a full listing) and an
/// `Action` variant for record-specific logic such as stock reservation. The payload types
/// come from the [`ActorEntity`] associated types, so a cart payload cannot be sent to the
/// product store.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    /// Every stored record, in id order.
    List {
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    /// Removes the record and hands it back to the caller.
    Delete { id: T::Id, respond_to: Response<T> },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}
