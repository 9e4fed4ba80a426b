//! # scribehub-core
//!
//! Core crate for ScribeHub. Contains typed identifiers, configuration
//! schemas, notification event types, cross-crate traits, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other ScribeHub crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
