//! Core domain types for the verification engine.
//!
//! This module contains pure domain types with no I/O dependencies:
//! - Per-credential verdicts and outcomes
//! - Batch results and their derived counts

pub mod batch;
pub mod outcome;
