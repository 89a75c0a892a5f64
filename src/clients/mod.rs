//! Type-safe wrappers around [`ResourceClient`](actor_framework::ResourceClient).

pub mod category_client;
pub mod customer_client;
pub mod order_client;
pub mod product_client;

pub use category_client::*;
pub use customer_client::*;
pub use order_client::*;
pub use product_client::*;

use actor_framework::FrameworkError;

/// Recovers the entity's own error from an `EntityError`, handing anything else back.
pub(crate) fn entity_error<E>(e: FrameworkError) -> Result<E, FrameworkError>
where
    E: std::error::Error + 'static,
{
    match e {
        FrameworkError::EntityError(inner) => match inner.downcast::<E>() {
            Ok(err) => Ok(*err),
            Err(other) => Err(FrameworkError::EntityError(other)),
        },
        other => Err(other),
    }
}
