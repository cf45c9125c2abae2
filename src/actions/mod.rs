//! Filesystem actions applied to duplicate files during resolution.
//!
//! Each action is a single typed operation: one attempt, success or a
//! classified error. Retrying and prompting are the resolver's job, not
//! this module's.

pub mod delete;
pub mod rename;

pub use delete::{delete_file, DeleteError, DeleteResult};
pub use rename::{rename_file, RenameError};
