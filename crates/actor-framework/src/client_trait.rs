//! # ActorClient Trait
//!
//! Shared read operations for resource-specific client wrappers, built on top of
//! the generic `ResourceClient`.
use crate::{ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit the standard read operations.
///
/// A wrapper supplies its inner `ResourceClient`, a mapping from
/// [`FrameworkError`] into its own error type, and the error to raise when an
/// entity is absent. It then gets `get`, `require`, `get_many` and `find` for free.
///
/// # Example
///
/// ```rust
/// use actor_framework::{ActorClient, ActorEntity, FrameworkError, ResourceClient};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Shelf { id: u32 }
/// #[derive(Debug)] struct ShelfCreate;
/// #[derive(Debug)] struct ShelfUpdate;
/// #[derive(Debug)] enum ShelfAction {}
///
/// #[derive(Debug, thiserror::Error)]
/// enum ShelfError {
///     #[error("shelf not found: {0}")]
///     NotFound(u32),
///     #[error("actor: {0}")]
///     Actor(String),
/// }
///
/// #[async_trait]
/// impl ActorEntity for Shelf {
///     type Id = u32; type Create = ShelfCreate; type Update = ShelfUpdate;
///     type Action = ShelfAction; type ActionResult = (); type Filter = ();
///     type Context = (); type Error = ShelfError;
///     fn from_create_params(id: u32, _: ShelfCreate) -> Result<Self, Self::Error> { Ok(Self { id }) }
///     fn matches(&self, _: &()) -> bool { true }
///     async fn on_update(&mut self, _: ShelfUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
///     async fn handle_action(&mut self, _: ShelfAction, _: &()) -> Result<(), Self::Error> { Ok(()) }
/// }
///
/// struct ShelfClient { inner: ResourceClient<Shelf> }
///
/// #[async_trait]
/// impl ActorClient<Shelf> for ShelfClient {
///     type Error = ShelfError;
///     fn inner(&self) -> &ResourceClient<Shelf> { &self.inner }
///     fn map_error(e: FrameworkError) -> ShelfError { ShelfError::Actor(e.to_string()) }
///     fn not_found(id: &u32) -> ShelfError { ShelfError::NotFound(*id) }
/// }
///
/// async fn usage(client: ShelfClient) {
///     let _ = client.require(7).await; // Err(ShelfError::NotFound(7)) when absent
///     let _ = client.find(()).await;
/// }
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// The error reported when `id` is not stored.
    fn not_found(id: &T::Id) -> Self::Error;

    /// Fetch an entity by ID.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Fetch an entity by ID, treating absence as an error.
    #[tracing::instrument(skip(self))]
    async fn require(&self, id: T::Id) -> Result<T, Self::Error> {
        match self.inner().get(id.clone()).await.map_err(Self::map_error)? {
            Some(item) => Ok(item),
            None => Err(Self::not_found(&id)),
        }
    }

    /// Batch fetch; see [`ResourceClient::get_many`].
    #[tracing::instrument(skip(self))]
    async fn get_many(&self, ids: Vec<T::Id>) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get_many(ids).await.map_err(Self::map_error)
    }

    /// Collection query; see [`ResourceClient::find`].
    #[tracing::instrument(skip(self))]
    async fn find(&self, filter: T::Filter) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().find(filter).await.map_err(Self::map_error)
    }
}
