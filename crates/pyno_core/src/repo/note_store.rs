//! Note store contract shared by all persistence backends.
//!
//! # Responsibility
//! - Define the minimal date-keyed store the lifecycle engine depends on.
//! - Map backend failures into semantic (`NotFound`) and transport (`Io`) errors.
//!
//! # Invariants
//! - `list_dates` returns dates in ascending order without duplicates.
//! - `write` replaces the whole note; readers never observe a partial body.

use crate::model::note::NoteDate;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error for note persistence operations.
#[derive(Debug)]
pub enum StoreError {
    /// No note exists for the requested date.
    NotFound(NoteDate),
    /// Underlying persistence failure.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(date) => write!(f, "note not found: {date}"),
            Self::Io { path, source } => {
                write!(f, "note store I/O failure at `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Repository interface for date-keyed notes.
pub trait NoteStore {
    /// Lists dates that have a note, ascending.
    fn list_dates(&self) -> StoreResult<Vec<NoteDate>>;
    /// Reads one note body. Fails with `NotFound` if absent.
    fn read(&self, date: NoteDate) -> StoreResult<String>;
    /// Creates or fully replaces one note body.
    fn write(&mut self, date: NoteDate, body: &str) -> StoreResult<()>;
    /// Deletes one note. Fails with `NotFound` if absent.
    fn delete(&mut self, date: NoteDate) -> StoreResult<()>;

    /// Returns whether a note exists for `date`.
    fn exists(&self, date: NoteDate) -> StoreResult<bool> {
        Ok(self.list_dates()?.binary_search(&date).is_ok())
    }

    /// Reads one note body, mapping `NotFound` to `None`.
    fn read_optional(&self, date: NoteDate) -> StoreResult<Option<String>> {
        match self.read(date) {
            Ok(body) => Ok(Some(body)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

impl<S: NoteStore + ?Sized> NoteStore for &mut S {
    fn list_dates(&self) -> StoreResult<Vec<NoteDate>> {
        (**self).list_dates()
    }

    fn read(&self, date: NoteDate) -> StoreResult<String> {
        (**self).read(date)
    }

    fn write(&mut self, date: NoteDate, body: &str) -> StoreResult<()> {
        (**self).write(date, body)
    }

    fn delete(&mut self, date: NoteDate) -> StoreResult<()> {
        (**self).delete(date)
    }

    fn exists(&self, date: NoteDate) -> StoreResult<bool> {
        (**self).exists(date)
    }
}
