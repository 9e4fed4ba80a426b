//! # scribehub-worker
//!
//! Background maintenance for ScribeHub: the invitation expiry sweeper
//! and the cron scheduler that drives it.

pub mod scheduler;
pub mod sweep;

pub use scheduler::Scheduler;
pub use sweep::SweepJob;
