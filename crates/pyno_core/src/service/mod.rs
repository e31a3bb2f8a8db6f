//! Core use-case services.
//!
//! # Responsibility
//! - Derive new note content from a predecessor (`synthesizer`).
//! - Decide whether a note added nothing new (`redundancy`).
//! - Orchestrate store calls into the daily lifecycle (`lifecycle`).

pub mod lifecycle;
pub mod redundancy;
pub mod synthesizer;
