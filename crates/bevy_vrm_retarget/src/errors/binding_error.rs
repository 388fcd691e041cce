use bevy::ecs::entity::Entity;
use thiserror::Error;

/// Errors raised by [`MeshBinder`] registration calls. These are fatal for
/// the individual call only; other bindings are unaffected.
///
/// [`MeshBinder`]: crate::binding::MeshBinder
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindingError {
    #[error("bone {0:?} does not exist in the skeleton in use")]
    UnknownBone(String),
    #[error("entity {0:?} has no binding to rebind")]
    NotBound(Entity),
}
