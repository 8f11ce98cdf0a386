//! Core domain types
//!
//! These types are produced by the client and consumed read-only by the
//! exporter. Run and job records are kept close to what the forge returns so
//! they can be persisted without loss.

pub mod jobs;
pub mod repo;
pub mod run;
