//! Document operations and access resolution.

pub mod access;
pub mod service;

pub use access::AccessResolver;
pub use service::DocumentService;
