//! Portfolio content: planets, projects and launch capsules.
//!
//! The builtin catalog is embedded from `assets/catalog.ron` and validated on load.
//! All records are keyed by string id and looked up linearly; the catalog is small.

pub mod capsule;
pub mod catalog;
pub mod color;
pub mod error;
pub mod locale;
pub mod planet;
pub mod project;

pub use capsule::*;
pub use catalog::*;
pub use color::*;
pub use error::*;
pub use locale::*;
pub use planet::*;
pub use project::*;
