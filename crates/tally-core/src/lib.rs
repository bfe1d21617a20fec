//! # tally-core
//!
//! Core types shared across all Tally crates:
//! - Entity structs for documents, check items and their links
//! - Status and link-state enums
//! - The JSON checklist definition with path generation
//! - The check-item/document link state machine
//! - ID prefix constants and cross-cutting error types
//! - CLI response types

pub mod checklist;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod responses;
pub mod transition;
