//! Core daily-note lifecycle engine for pyno.
//! This crate is the single source of truth for journal invariants.

pub mod config;
pub mod logging;
pub mod markdown;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{Config, ConfigError};
pub use logging::{
    default_log_level, init_logging, init_stderr_logging, logging_status, LogTarget,
};
pub use markdown::{append_text, parse_body, parse_note, render_body, ParseError};
pub use model::note::{Block, Note, NoteBody, NoteDate, ParsedNote, TodoItem};
pub use repo::fs_store::FsNoteStore;
pub use repo::memory_store::MemoryNoteStore;
pub use repo::note_store::{NoteStore, StoreError, StoreResult};
pub use service::lifecycle::{
    CleanupOutcome, CleanupPolicy, DailyNoteService, DailyRunReport, EnsureOutcome, KeepReason,
    LifecycleError, LifecycleResult,
};
pub use service::redundancy::is_redundant;
pub use service::synthesizer::synthesize;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
