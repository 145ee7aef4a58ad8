//! # Mock Client
//!
//! `MockClient<T>` hands out a real [`ResourceClient<T>`] whose requests are answered from a
//! queue of scripted responses instead of a store. It is how the coordinator's compensation
//! paths are tested: a real store cannot be made to fail on the third call, a mock can.
//!
//! | | MockClient | Real actor |
//! |---|---|---|
//! | State | none, scripted answers | real records |
//! | Failure injection | `return_err(..)` | hard |
//! | Use | logic *around* a client | the store itself, full system |
//!
//! Expectations are consumed in order. A request that does not match the next expectation
//! panics the mock task, which the caller observes as `FrameworkError::ActorDropped`.
//! Action payloads are recorded so tests can assert exactly what was asked of the store.
//!
//! ```rust
//! use storefront_sync::framework::mock::MockClient;
//! use storefront_sync::framework::FrameworkError;
//! use storefront_sync::model::{Product, ProductId};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Product>::new();
//!     mock.expect_get(ProductId(1)).return_err(FrameworkError::ActorClosed);
//!
//!     let result = mock.client().get(ProductId(1)).await;
//!     assert!(matches!(result, Err(FrameworkError::ActorClosed)));
//!     mock.verify();
//! }
//! ```

use crate::framework::client::ResourceClient;
use crate::framework::entity::ActorEntity;
use crate::framework::error::FrameworkError;
use crate::framework::message::ResourceRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// A scripted response waiting for its request.
enum Expectation<T: ActorEntity> {
    Get(Result<Option<T>, FrameworkError>),
    List(Result<Vec<T>, FrameworkError>),
    Create(Result<T::Id, FrameworkError>),
    Update(Result<T, FrameworkError>),
    Delete(Result<T, FrameworkError>),
    Action(Result<T::ActionResult, FrameworkError>),
}

impl<T: ActorEntity> Expectation<T> {
    fn name(&self) -> &'static str {
        match self {
            Expectation::Get(_) => "get",
            Expectation::List(_) => "list",
            Expectation::Create(_) => "create",
            Expectation::Update(_) => "update",
            Expectation::Delete(_) => "delete",
            Expectation::Action(_) => "action",
        }
    }
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A mock store with an expectation queue and an action log.
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    actions: Arc<Mutex<Vec<(T::Id, T::Action)>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a mock with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let actions = Arc::new(Mutex::new(Vec::new()));
        let queue = expectations.clone();
        let log = actions.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let next = queue.lock().unwrap().pop_front();
                match (request, next) {
                    (ResourceRequest::Get { respond_to, .. }, Some(Expectation::Get(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::List { respond_to }, Some(Expectation::List(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Update { respond_to, .. }, Some(Expectation::Update(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Delete { respond_to, .. }, Some(Expectation::Delete(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (
                        ResourceRequest::Action {
                            id,
                            action,
                            respond_to,
                        },
                        Some(Expectation::Action(r)),
                    ) => {
                        log.lock().unwrap().push((id, action));
                        let _ = respond_to.send(r);
                    }
                    (request, expected) => {
                        panic!(
                            "Unexpected request {:?}, expected {}",
                            request,
                            expected.map(|e| e.name()).unwrap_or("nothing")
                        );
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            actions,
            _handle: handle,
        }
    }

    /// Returns a client wired to this mock.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    pub fn expect_get(&mut self, _id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.builder(Expectation::Get)
    }

    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(Expectation::List)
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        self.builder(Expectation::Create)
    }

    pub fn expect_update(&mut self, _id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(Expectation::Update)
    }

    pub fn expect_delete(&mut self, _id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(Expectation::Delete)
    }

    pub fn expect_action(&mut self, _id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        self.builder(Expectation::Action)
    }

    fn builder<R>(
        &self,
        wrap: fn(Result<R, FrameworkError>) -> Expectation<T>,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            wrap,
            expectations: self.expectations.clone(),
        }
    }

    /// Drains the actions received so far, in arrival order.
    pub fn take_actions(&self) -> Vec<(T::Id, T::Action)> {
        std::mem::take(&mut *self.actions.lock().unwrap())
    }

    /// Panics if scripted responses are left over.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            let names: Vec<_> = exps.iter().map(|e| e.name()).collect();
            panic!("Not all expectations were met. Remaining: {:?}", names);
        }
    }
}

/// Builder returned by the `expect_*` methods.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    wrap: fn(Result<R, FrameworkError>) -> Expectation<T>,
    expectations: Queue<T>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    /// Answer the request with `value`.
    pub fn return_ok(self, value: R) {
        self.expectations
            .lock()
            .unwrap()
            .push_back((self.wrap)(Ok(value)));
    }

    /// Answer the request with `error`.
    pub fn return_err(self, error: FrameworkError) {
        self.expectations
            .lock()
            .unwrap()
            .push_back((self.wrap)(Err(error)));
    }
}
