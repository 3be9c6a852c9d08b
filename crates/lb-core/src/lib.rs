//! # lb-core
//!
//! Core types, ID generation, and error types for Logbook.
//!
//! This crate provides the foundational types shared across all Logbook crates:
//! - Entity structs for all domain objects (task records, snapshots, findings,
//!   suggestions, execution log entries)
//! - Status enums with state machine transitions
//! - Time windows and named period presets
//! - ID prefix constants and formatting helpers
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod window;
