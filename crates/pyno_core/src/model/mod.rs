//! Domain model for the daily-note journal.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every note is identified by a calendar `NoteDate`.
//! - Todo items have no identity beyond their `text` and `done` state.

pub mod note;
