//! Data Transfer Objects for the forge API
//!
//! Envelopes that wrap domain records in API responses. They are only used
//! while decoding and never written to disk.

pub mod content;
pub mod runs;
