//! [`ActorEntity`] implementation for [`Category`].
//!
//! Parent existence cannot be checked here: the category actor would have to
//! query itself while handling the create. `CategoryClient` checks it before
//! sending. The entity only enforces what it can see on its own.

use super::CategoryError;
use crate::model::{Category, CategoryCreate, CategoryFilter, CategoryId, CategoryUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;

#[async_trait]
impl ActorEntity for Category {
    type Id = CategoryId;
    type Create = CategoryCreate;
    type Update = CategoryUpdate;
    type Action = ();
    type ActionResult = ();
    type Filter = CategoryFilter;
    type Context = ();
    type Error = CategoryError;

    fn from_create_params(id: CategoryId, params: CategoryCreate) -> Result<Self, Self::Error> {
        let name = params.name.trim();
        if name.is_empty() {
            return Err(CategoryError::EmptyName);
        }
        Ok(Self::new(id, name, params.parent_id))
    }

    fn matches(&self, filter: &CategoryFilter) -> bool {
        match filter {
            CategoryFilter::All => true,
            CategoryFilter::Roots => self.is_root(),
            CategoryFilter::ChildrenOf(parent) => self.parent_id == Some(*parent),
        }
    }

    /// Renames and/or re-parents the category.
    ///
    /// Re-parenting may close a loop in the tree; the resolver tolerates that.
    async fn on_update(&mut self, update: CategoryUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(name) = update.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(CategoryError::EmptyName);
            }
            self.name = name.to_string();
        }
        if let Some(parent_id) = update.parent_id {
            if parent_id == Some(self.id) {
                return Err(CategoryError::SelfParent(self.id));
            }
            self.parent_id = parent_id;
        }
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), Self::Error> {
        Ok(())
    }
}
