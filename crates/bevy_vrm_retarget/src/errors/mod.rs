mod asset_loader_error;
mod binding_error;
mod skeleton_error;

pub use asset_loader_error::*;
pub use binding_error::*;
pub use skeleton_error::*;
