use thiserror::Error;

/// Structural errors raised while building a [`Skeleton`] from its serial
/// description. All of these are fatal: a skeleton that fails validation is
/// never partially constructed.
///
/// [`Skeleton`]: crate::skeleton::Skeleton
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SkeletonError {
    #[error("bone {bone:?} references parent {parent:?}, which is not declared")]
    UnknownParent { bone: String, parent: String },
    #[error("bones {first:?} and {second:?} both have no parent, but only one root is allowed")]
    MultipleRoots { first: String, second: String },
    #[error("bone {name:?} is declared more than once")]
    DuplicateBone { name: String },
    #[error("no root bone: every bone declares a parent")]
    MissingRoot,
    #[error("cycle detected in parent chain starting at bone {bone:?}")]
    CycleDetected { bone: String },
    #[error("alias {alias:?} resolves to both {first:?} and {second:?}")]
    DuplicateAlias {
        alias: String,
        first: String,
        second: String,
    },
}
