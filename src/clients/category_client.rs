//! # Category Client
//!
//! High-level API for the `Category` actor. Parent checks happen here, before
//! the request reaches the actor.
use super::entity_error;
use crate::category_actor::CategoryError;
use crate::model::{Category, CategoryCreate, CategoryFilter, CategoryId, CategoryUpdate};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Category actor.
#[derive(Clone)]
pub struct CategoryClient {
    inner: ResourceClient<Category>,
}

impl CategoryClient {
    pub fn new(inner: ResourceClient<Category>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Category> for CategoryClient {
    type Error = CategoryError;

    fn inner(&self) -> &ResourceClient<Category> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match entity_error::<CategoryError>(e) {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => CategoryError::NotFound(id),
            Err(other) => CategoryError::ActorCommunicationError(other.to_string()),
        }
    }

    fn not_found(id: &CategoryId) -> Self::Error {
        CategoryError::NotFound(id.to_string())
    }
}

impl CategoryClient {
    #[instrument(skip(self))]
    pub async fn create_category(&self, params: CategoryCreate) -> Result<CategoryId, CategoryError> {
        if let Some(parent) = params.parent_id {
            self.require_parent(parent).await?;
        }
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, CategoryError> {
        self.find(CategoryFilter::All).await
    }

    /// Direct children only, in id order.
    #[instrument(skip(self))]
    pub async fn children_of(&self, id: CategoryId) -> Result<Vec<Category>, CategoryError> {
        self.find(CategoryFilter::ChildrenOf(id)).await
    }

    #[instrument(skip(self))]
    pub async fn update_category(
        &self,
        id: CategoryId,
        update: CategoryUpdate,
    ) -> Result<Category, CategoryError> {
        if let Some(Some(parent)) = update.parent_id {
            if parent == id {
                return Err(CategoryError::SelfParent(id));
            }
            self.require_parent(parent).await?;
        }
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    async fn require_parent(&self, parent: CategoryId) -> Result<(), CategoryError> {
        match self.require(parent).await {
            Ok(_) => Ok(()),
            Err(CategoryError::NotFound(_)) => Err(CategoryError::ParentNotFound(parent)),
            Err(e) => Err(e),
        }
    }
}
