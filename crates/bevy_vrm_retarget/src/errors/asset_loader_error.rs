use thiserror::Error;

use super::SkeletonError;

/// Possible errors produced by the RON asset loaders.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AssetLoaderError {
    /// An [IO](std::io) error
    #[error("could not read asset: {0}")]
    Io(#[from] std::io::Error),
    /// A [RON](ron) error
    #[error("could not parse RON: {0}")]
    RonSpannedError(#[from] ron::error::SpannedError),
    #[error("skeleton does not satisfy constraints: {0}")]
    MalformedSkeleton(#[from] SkeletonError),
}
