//! In-memory note store.
//!
//! Used by tests and by callers that embed the lifecycle engine without a
//! filesystem. Ordering comes for free from the `BTreeMap` key.

use crate::model::note::NoteDate;
use crate::repo::note_store::{NoteStore, StoreError, StoreResult};
use std::collections::BTreeMap;

/// `BTreeMap`-backed note store.
#[derive(Debug, Clone, Default)]
pub struct MemoryNoteStore {
    notes: BTreeMap<NoteDate, String>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-populated with `(date, body)` pairs.
    pub fn with_notes<I, S>(notes: I) -> Self
    where
        I: IntoIterator<Item = (NoteDate, S)>,
        S: Into<String>,
    {
        Self {
            notes: notes
                .into_iter()
                .map(|(date, body)| (date, body.into()))
                .collect(),
        }
    }
}

impl NoteStore for MemoryNoteStore {
    fn list_dates(&self) -> StoreResult<Vec<NoteDate>> {
        Ok(self.notes.keys().copied().collect())
    }

    fn read(&self, date: NoteDate) -> StoreResult<String> {
        self.notes
            .get(&date)
            .cloned()
            .ok_or(StoreError::NotFound(date))
    }

    fn write(&mut self, date: NoteDate, body: &str) -> StoreResult<()> {
        self.notes.insert(date, body.to_string());
        Ok(())
    }

    fn delete(&mut self, date: NoteDate) -> StoreResult<()> {
        self.notes
            .remove(&date)
            .map(|_| ())
            .ok_or(StoreError::NotFound(date))
    }

    fn exists(&self, date: NoteDate) -> StoreResult<bool> {
        Ok(self.notes.contains_key(&date))
    }
}
