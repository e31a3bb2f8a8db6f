//! Daily note lifecycle use-cases.
//!
//! # Responsibility
//! - Materialize today's note from its predecessor (`ensure_today`).
//! - Append intake text to today's note (`append_to_today`).
//! - Retroactively prune a previous note that added nothing (`cleanup_previous`).
//!
//! # Invariants
//! - "Today" is always an explicit parameter; no operation reads the clock.
//! - `ensure_today` never overwrites an existing note.
//! - `cleanup_previous` only ever deletes the note strictly before the
//!   reference date, and never when either note fails to parse.
//! - Store failures abort the current operation and are never retried here.

use crate::markdown::{append_text, parse_body, parse_note, render_body, ParseError};
use crate::model::note::{Note, NoteDate, ParsedNote};
use crate::repo::note_store::{NoteStore, StoreError};
use crate::service::redundancy::is_redundant;
use crate::service::synthesizer::synthesize;
use log::{debug, info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Service error for lifecycle use-cases.
#[derive(Debug)]
pub enum LifecycleError {
    /// Persistence-layer failure.
    Store(StoreError),
    /// Stored or submitted text does not follow the note convention.
    Parse { date: NoteDate, source: ParseError },
}

impl Display for LifecycleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Parse { date, source } => write!(f, "malformed note {date}: {source}"),
        }
    }
}

impl Error for LifecycleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

impl From<StoreError> for LifecycleError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Policy knobs for `cleanup_previous`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupPolicy {
    /// Delete a previous note that has no predecessor of its own when it
    /// carries no content at all.
    pub delete_blank_without_predecessor: bool,
}

impl Default for CleanupPolicy {
    fn default() -> Self {
        Self {
            delete_blank_without_predecessor: true,
        }
    }
}

/// Result of `ensure_today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EnsureOutcome {
    /// A note for the date already existed and was left untouched.
    Existing,
    /// A note was synthesized and written.
    Created {
        predecessor: Option<NoteDate>,
        carried: usize,
    },
}

/// Why `cleanup_previous` left a note in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeepReason {
    /// The note holds content its predecessor lacks.
    NewContent,
    /// No predecessor to compare against and the policy keeps blank orphans,
    /// or the orphan is not blank.
    NoPredecessor,
    /// One of the compared notes failed to parse; redundancy is undecidable.
    Unparseable,
}

/// Result of `cleanup_previous`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CleanupOutcome {
    /// No note exists before the reference date.
    NoPrevious,
    Deleted { date: NoteDate },
    Kept { date: NoteDate, reason: KeepReason },
}

/// Combined result of one scheduled daily run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyRunReport {
    pub ensure: EnsureOutcome,
    pub cleanup: CleanupOutcome,
}

/// Lifecycle controller over a note store implementation.
pub struct DailyNoteService<S: NoteStore> {
    store: S,
    policy: CleanupPolicy,
}

impl<S: NoteStore> DailyNoteService<S> {
    /// Creates a service using the default cleanup policy.
    pub fn new(store: S) -> Self {
        Self::with_policy(store, CleanupPolicy::default())
    }

    pub fn with_policy(store: S, policy: CleanupPolicy) -> Self {
        Self { store, policy }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the most recent note date strictly before `date`.
    pub fn predecessor_of(&self, date: NoteDate) -> LifecycleResult<Option<NoteDate>> {
        let dates = self.store.list_dates()?;
        Ok(latest_before(&dates, date))
    }

    /// Reads the note for `today` when one exists.
    pub fn today_note(&self, today: NoteDate) -> LifecycleResult<Option<Note>> {
        Ok(self
            .store
            .read_optional(today)?
            .map(|body| Note::new(today, body)))
    }

    /// Creates the note for `today` unless it already exists.
    ///
    /// The new note carries the predecessor's pending todo items.
    ///
    /// # Errors
    /// - `Parse` when the predecessor note is malformed; nothing is written.
    /// - `Store` on any persistence failure.
    pub fn ensure_today(&mut self, today: NoteDate) -> LifecycleResult<EnsureOutcome> {
        let started_at = Instant::now();
        if self.store.exists(today)? {
            debug!("event=daily_note_ensure module=service status=skipped date={today} reason=exists");
            return Ok(EnsureOutcome::Existing);
        }

        let predecessor = match self.predecessor_of(today)? {
            Some(date) => Some(Note::new(date, self.store.read(date)?)),
            None => None,
        };
        let body = synthesize(today, predecessor.as_ref()).map_err(|source| {
            warn!(
                "event=daily_note_ensure module=service status=error date={today} error_code=predecessor_unparseable error={source}"
            );
            LifecycleError::Parse {
                date: predecessor.as_ref().map_or(today, |note| note.date),
                source,
            }
        })?;

        self.store.write(today, &render_body(&body))?;
        let carried = body.todos().count();
        let predecessor = predecessor.map(|note| note.date);
        info!(
            "event=daily_note_ensure module=service status=ok date={today} predecessor={} carried={carried} duration_ms={}",
            predecessor.map_or_else(|| "none".to_string(), |date| date.to_string()),
            started_at.elapsed().as_millis()
        );
        Ok(EnsureOutcome::Created {
            predecessor,
            carried,
        })
    }

    /// Appends `text` as a free-text block at the end of today's note.
    ///
    /// Creates today's note first when missing. Blank text is ignored.
    ///
    /// # Errors
    /// - `Parse` when `text` itself contains a malformed todo or title line.
    /// - Any error from `ensure_today`.
    pub fn append_to_today(&mut self, today: NoteDate, text: &str) -> LifecycleResult<()> {
        parse_body(text).map_err(|source| LifecycleError::Parse {
            date: today,
            source,
        })?;
        self.ensure_today(today)?;
        if text.trim().is_empty() {
            debug!("event=daily_note_append module=service status=skipped date={today} reason=blank");
            return Ok(());
        }

        let body = self.store.read(today)?;
        self.store.write(today, &append_text(&body, text))?;
        info!(
            "event=daily_note_append module=service status=ok date={today} bytes={}",
            text.len()
        );
        Ok(())
    }

    /// Deletes the note just before `reference` when it added nothing new.
    ///
    /// The previous note is compared against the note before it. Without such
    /// a note, a blank previous note is deleted only if the policy allows it.
    ///
    /// # Errors
    /// - `Store` on persistence failure. Parse failures keep the note instead.
    pub fn cleanup_previous(&mut self, reference: NoteDate) -> LifecycleResult<CleanupOutcome> {
        let dates = self.store.list_dates()?;
        let Some(previous) = latest_before(&dates, reference) else {
            debug!("event=daily_note_cleanup module=service status=skipped reference={reference} reason=no_previous");
            return Ok(CleanupOutcome::NoPrevious);
        };
        let before_previous = latest_before(&dates, previous);

        let Some(previous_note) = self.load_note(previous)? else {
            return Ok(kept(previous, KeepReason::Unparseable));
        };
        let before_note = match before_previous {
            Some(date) => match self.load_note(date)? {
                Some(note) => Some(note),
                None => return Ok(kept(previous, KeepReason::Unparseable)),
            },
            None => None,
        };

        let reason = match &before_note {
            Some(before) if is_redundant(&previous_note, Some(before)) => None,
            Some(_) => Some(KeepReason::NewContent),
            None if previous_note.is_blank() && self.policy.delete_blank_without_predecessor => {
                None
            }
            None => Some(KeepReason::NoPredecessor),
        };

        if let Some(reason) = reason {
            return Ok(kept(previous, reason));
        }

        self.store.delete(previous)?;
        info!("event=daily_note_cleanup module=service status=deleted date={previous} reference={reference}");
        Ok(CleanupOutcome::Deleted { date: previous })
    }

    /// Ensures today's note, then prunes the previous one.
    pub fn run_daily(&mut self, today: NoteDate) -> LifecycleResult<DailyRunReport> {
        let ensure = self.ensure_today(today)?;
        let cleanup = self.cleanup_previous(today)?;
        Ok(DailyRunReport { ensure, cleanup })
    }

    fn load_note(&self, date: NoteDate) -> LifecycleResult<Option<ParsedNote>> {
        let note = Note::new(date, self.store.read(date)?);
        match parse_note(&note) {
            Ok(parsed) => Ok(Some(parsed)),
            Err(err) => {
                warn!("event=daily_note_cleanup module=service status=error date={date} error_code=note_unparseable error={err}");
                Ok(None)
            }
        }
    }
}

fn kept(date: NoteDate, reason: KeepReason) -> CleanupOutcome {
    info!("event=daily_note_cleanup module=service status=kept date={date} reason={reason:?}");
    CleanupOutcome::Kept { date, reason }
}

/// Greatest date in ascending `dates` strictly before `date`.
fn latest_before(dates: &[NoteDate], date: NoteDate) -> Option<NoteDate> {
    let index = dates.partition_point(|candidate| *candidate < date);
    index.checked_sub(1).and_then(|i| dates.get(i)).copied()
}
