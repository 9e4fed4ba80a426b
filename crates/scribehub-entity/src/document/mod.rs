//! Document entity and its permission list.

pub mod model;
pub mod permission;

pub use model::Document;
pub use permission::{AccessLevel, EffectiveAccess, PermissionEntry};
