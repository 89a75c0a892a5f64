//! # Generic Messages
//!
//! The request envelope exchanged between a `ResourceClient` and its `ResourceActor`.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// Besides the CRUD lifecycle (`Create`, `Get`, `Update`, `Delete`) and the
/// per-entity `Action` escape hatch, two read-only collection queries exist:
///
/// - **Find**: every stored entity for which [`ActorEntity::matches`] holds.
/// - **GetMany**: a batch lookup by ID. One entry is returned per requested ID
///   occurrence, so asking for the same ID twice yields two copies; IDs that
///   are not stored are skipped.
///
/// Every variant carries its own typed responder, so a `Product` payload can
/// never reach a `Category` actor.
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
    GetMany {
        ids: Vec<T::Id>,
        respond_to: Response<Vec<T>>,
    },
    Find {
        filter: T::Filter,
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}
