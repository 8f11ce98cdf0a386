//! Harvest Core
//!
//! Core types shared by the forge client and the exporter.
//!
//! This crate contains:
//! - Domain types: repositories, workflow runs and their job lists
//! - DTOs: envelopes returned by the forge's REST API

pub mod domain;
pub mod dto;
