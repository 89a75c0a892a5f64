//! # Mock Framework & Testing Guide
//!
//! `MockClient<T>` hands out a real `ResourceClient<T>` whose requests are answered
//! from a queue of scripted expectations instead of a running actor. Use it to test
//! code that *talks to* an actor (workflows, client wrappers, actors with
//! dependencies) without standing up the dependency.
//!
//! | | MockClient | Real Actor |
//! |---------|------------|------------|
//! | **State** | None, replies are scripted | Real store |
//! | **Error Injection** | `return_err` on any request | Needs contrived state |
//! | **Use Case** | Logic *around* the client | The actor itself, full system |
//!
//! ## Testing Patterns
//!
//! 1. **Pure mock**: a coordinator built from mocked clients only.
//! 2. **Actor + mocked dependencies**: a real actor whose `Context` holds mocked
//!    clients, e.g. the product actor validating categories against a mock.
//! 3. **Full system**: every actor real, see the crate-level `tests/`.
//!
//! ## Simulating failures
//!
//! ```rust
//! use actor_framework::mock::MockClient;
//! use actor_framework::{ActorEntity, FrameworkError};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)] struct Ledger { id: u32 }
//! #[derive(Debug)] struct LedgerCreate;
//! #[derive(Debug)] struct LedgerUpdate;
//! #[derive(Debug)] enum LedgerAction {}
//! #[derive(Debug, thiserror::Error)] #[error("ledger")] struct LedgerError;
//!
//! #[async_trait]
//! impl ActorEntity for Ledger {
//!     type Id = u32; type Create = LedgerCreate; type Update = LedgerUpdate;
//!     type Action = LedgerAction; type ActionResult = (); type Filter = ();
//!     type Context = (); type Error = LedgerError;
//!     fn from_create_params(id: u32, _: LedgerCreate) -> Result<Self, Self::Error> { Ok(Self { id }) }
//!     fn matches(&self, _: &()) -> bool { true }
//!     async fn on_update(&mut self, _: LedgerUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
//!     async fn handle_action(&mut self, _: LedgerAction, _: &()) -> Result<(), Self::Error> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Ledger>::new();
//!     mock.expect_create().return_err(FrameworkError::ActorClosed);
//!
//!     let result = mock.client().create(LedgerCreate).await;
//!     assert!(matches!(result, Err(FrameworkError::ActorClosed)));
//!     mock.verify();
//! }
//! ```
//!
//! Requests that arrive out of script (wrong kind, wrong ID, or nothing queued)
//! are not answered: the caller sees [`FrameworkError::ActorDropped`] and
//! [`MockClient::verify`] panics with a description of each stray request.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// A scripted request and the reply it should receive.
enum Expectation<T: ActorEntity> {
    Create {
        response: Result<T::Id, FrameworkError>,
    },
    Get {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    GetMany {
        response: Result<Vec<T>, FrameworkError>,
    },
    Find {
        response: Result<Vec<T>, FrameworkError>,
    },
    Update {
        id: T::Id,
        response: Result<T, FrameworkError>,
    },
    Delete {
        id: T::Id,
        response: Result<(), FrameworkError>,
    },
    Action {
        id: T::Id,
        response: Result<T::ActionResult, FrameworkError>,
    },
}

impl<T: ActorEntity> Expectation<T> {
    fn describe(&self) -> String {
        match self {
            Expectation::Create { .. } => "Create".to_string(),
            Expectation::Get { id, .. } => format!("Get({id})"),
            Expectation::GetMany { .. } => "GetMany".to_string(),
            Expectation::Find { .. } => "Find".to_string(),
            Expectation::Update { id, .. } => format!("Update({id})"),
            Expectation::Delete { id, .. } => format!("Delete({id})"),
            Expectation::Action { id, .. } => format!("Action({id})"),
        }
    }
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

fn lock<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn reply<R>(respond_to: oneshot::Sender<Result<R, FrameworkError>>, response: Result<R, FrameworkError>) {
    let _ = respond_to.send(response);
}

/// A mock client with expectation tracking for fluent testing.
///
/// Expectations are consumed in the order they were registered.
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    unexpected: Arc<Mutex<Vec<String>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let unexpected = Arc::new(Mutex::new(Vec::new()));
        let queue = expectations.clone();
        let strays = unexpected.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = lock(&queue).pop_front();
                if let Err((stray, request)) = Self::answer(request, expectation) {
                    // Record before the responder is dropped so `verify` sees it.
                    lock(&strays).push(stray);
                    drop(request);
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            unexpected,
            _handle: handle,
        }
    }

    /// Replies to `request` from `expectation`; hands the request back on mismatch.
    fn answer(
        request: ResourceRequest<T>,
        expectation: Option<Expectation<T>>,
    ) -> Result<(), (String, ResourceRequest<T>)> {
        match (request, expectation) {
            (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create { response })) => {
                reply(respond_to, response);
            }
            (ResourceRequest::Get { id, respond_to }, Some(Expectation::Get { id: want, response }))
                if id == want =>
            {
                reply(respond_to, response);
            }
            (ResourceRequest::GetMany { respond_to, .. }, Some(Expectation::GetMany { response })) => {
                reply(respond_to, response);
            }
            (ResourceRequest::Find { respond_to, .. }, Some(Expectation::Find { response })) => {
                reply(respond_to, response);
            }
            (
                ResourceRequest::Update { id, respond_to, .. },
                Some(Expectation::Update { id: want, response }),
            ) if id == want => {
                reply(respond_to, response);
            }
            (ResourceRequest::Delete { id, respond_to }, Some(Expectation::Delete { id: want, response }))
                if id == want =>
            {
                reply(respond_to, response);
            }
            (
                ResourceRequest::Action { id, respond_to, .. },
                Some(Expectation::Action { id: want, response }),
            ) if id == want => {
                reply(respond_to, response);
            }
            (request, expectation) => {
                let expected = expectation
                    .map(|e| e.describe())
                    .unwrap_or_else(|| "nothing".to_string());
                let stray = format!("got {}, expected {expected}", describe_request(&request));
                return Err((stray, request));
            }
        }
        Ok(())
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    fn push(&self, expectation: Expectation<T>) {
        lock(&self.expectations).push_back(expectation);
    }

    /// Expects a `create` operation.
    pub fn expect_create(&mut self) -> ExpectationBuilder<'_, T, T::Id> {
        ExpectationBuilder::new(self, |response| Expectation::Create { response })
    }

    /// Expects a `get` operation for `id`.
    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<'_, T, Option<T>> {
        ExpectationBuilder::new(self, move |response| Expectation::Get { id, response })
    }

    /// Expects a `get_many` operation.
    pub fn expect_get_many(&mut self) -> ExpectationBuilder<'_, T, Vec<T>> {
        ExpectationBuilder::new(self, |response| Expectation::GetMany { response })
    }

    /// Expects a `find` operation.
    pub fn expect_find(&mut self) -> ExpectationBuilder<'_, T, Vec<T>> {
        ExpectationBuilder::new(self, |response| Expectation::Find { response })
    }

    /// Expects an `update` operation for `id`.
    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<'_, T, T> {
        ExpectationBuilder::new(self, move |response| Expectation::Update { id, response })
    }

    /// Expects a `delete` operation for `id`.
    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<'_, T, ()> {
        ExpectationBuilder::new(self, move |response| Expectation::Delete { id, response })
    }

    /// Expects an `action` operation for `id`.
    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<'_, T, T::ActionResult> {
        ExpectationBuilder::new(self, move |response| Expectation::Action { id, response })
    }

    /// Verifies that all expectations were met and no stray request arrived.
    pub fn verify(&self) {
        let strays = lock(&self.unexpected);
        if !strays.is_empty() {
            panic!("Unexpected requests: {}", strays.join("; "));
        }
        let remaining = lock(&self.expectations);
        if !remaining.is_empty() {
            let pending: Vec<String> = remaining.iter().map(Expectation::describe).collect();
            panic!(
                "Not all expectations were met. {} remaining: {}",
                remaining.len(),
                pending.join(", ")
            );
        }
    }
}

fn describe_request<T: ActorEntity>(request: &ResourceRequest<T>) -> String {
    match request {
        ResourceRequest::Create { params, .. } => format!("Create({params:?})"),
        ResourceRequest::Get { id, .. } => format!("Get({id})"),
        ResourceRequest::GetMany { ids, .. } => format!("GetMany({ids:?})"),
        ResourceRequest::Find { filter, .. } => format!("Find({filter:?})"),
        ResourceRequest::Update { id, .. } => format!("Update({id})"),
        ResourceRequest::Delete { id, .. } => format!("Delete({id})"),
        ResourceRequest::Action { id, action, .. } => format!("Action({id}, {action:?})"),
    }
}

/// Finishes an expectation with either a success value or an error.
pub struct ExpectationBuilder<'a, T: ActorEntity, R> {
    mock: &'a MockClient<T>,
    build: Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T> + 'a>,
}

impl<'a, T: ActorEntity, R> ExpectationBuilder<'a, T, R> {
    fn new(
        mock: &'a MockClient<T>,
        build: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T> + 'a,
    ) -> Self {
        Self {
            mock,
            build: Box::new(build),
        }
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        self.mock.push((self.build)(Ok(value)));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        self.mock.push((self.build)(Err(error)));
    }
}

// =============================================================================
// RECEIVER HELPERS
// =============================================================================

/// Creates a client together with the raw receiver its requests land on.
///
/// Use this instead of [`MockClient`] when a test needs to inspect request
/// payloads (for instance the exact `Create` params a workflow persisted).
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Waits for the next request and returns it if it is a `Create`.
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, oneshot::Sender<Result<T::Id, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Waits for the next request and returns it if it is a `Find`.
pub async fn expect_find<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Filter, oneshot::Sender<Result<Vec<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Find { filter, respond_to }) => Some((filter, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Bin {
        id: u32,
        label: String,
    }

    #[derive(Debug)]
    struct BinCreate {
        label: String,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("bin error")]
    struct BinError;

    #[async_trait]
    impl ActorEntity for Bin {
        type Id = u32;
        type Create = BinCreate;
        type Update = ();
        type Action = ();
        type ActionResult = ();
        type Filter = ();
        type Context = ();
        type Error = BinError;

        fn from_create_params(id: u32, params: BinCreate) -> Result<Self, Self::Error> {
            Ok(Self {
                id,
                label: params.label,
            })
        }

        fn matches(&self, _filter: &()) -> bool {
            true
        }

        async fn on_update(&mut self, _update: (), _ctx: &()) -> Result<(), Self::Error> {
            Ok(())
        }

        async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    fn bin(id: u32, label: &str) -> Bin {
        Bin {
            id,
            label: label.to_string(),
        }
    }

    #[tokio::test]
    async fn test_receiver_helper_exposes_create_payload() {
        let (client, mut receiver) = create_mock_client::<Bin>(10);

        let create_task = tokio::spawn(async move {
            client
                .create(BinCreate {
                    label: "spare parts".to_string(),
                })
                .await
        });

        let (payload, responder) = expect_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(payload.label, "spare parts");
        responder.send(Ok(4)).unwrap();

        assert_eq!(create_task.await.unwrap().unwrap(), 4);
    }

    #[tokio::test]
    async fn test_expectations_are_served_in_order() {
        let mut mock = MockClient::<Bin>::new();
        mock.expect_get(1).return_ok(Some(bin(1, "a")));
        mock.expect_get_many().return_ok(vec![bin(1, "a"), bin(1, "a")]);
        mock.expect_find().return_ok(vec![bin(2, "b")]);

        let client = mock.client();
        assert_eq!(client.get(1).await.unwrap(), Some(bin(1, "a")));
        assert_eq!(client.get_many(vec![1, 1]).await.unwrap().len(), 2);
        assert_eq!(client.find(()).await.unwrap(), vec![bin(2, "b")]);

        mock.verify();
    }

    #[tokio::test]
    async fn test_write_expectations() {
        let mut mock = MockClient::<Bin>::new();
        mock.expect_update(3).return_ok(bin(3, "relabelled"));
        mock.expect_action(3).return_ok(());
        mock.expect_delete(3).return_ok(());
        mock.expect_delete(4).return_err(FrameworkError::NotFound("4".to_string()));

        let client = mock.client();
        assert_eq!(client.update(3, ()).await.unwrap(), bin(3, "relabelled"));
        client.perform_action(3, ()).await.unwrap();
        client.delete(3).await.unwrap();
        assert!(matches!(client.delete(4).await, Err(FrameworkError::NotFound(_))));

        mock.verify();
    }

    #[tokio::test]
    async fn test_wrong_id_is_left_unanswered() {
        let mut mock = MockClient::<Bin>::new();
        mock.expect_get(1).return_ok(None);

        let result = mock.client().get(2).await;
        assert!(matches!(result, Err(FrameworkError::ActorDropped)));

        let verdict = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| mock.verify()));
        assert!(verdict.is_err());
    }
}
