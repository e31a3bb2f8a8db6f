//! Filesystem-backed note store.
//!
//! # Responsibility
//! - Persist notes as `<root>/YYYY/MM/YYYY-MM-DD.md` markdown files.
//! - Discover existing notes by scanning that layout.
//!
//! # Invariants
//! - Files outside the `YYYY/MM/YYYY-MM-DD.md` layout are ignored, never touched.
//! - Writes go to a sibling temp file first and are renamed into place, so a
//!   note is either fully replaced or left unchanged.

use crate::model::note::NoteDate;
use crate::repo::note_store::{NoteStore, StoreError, StoreResult};
use chrono::Datelike;
use log::{debug, error, info};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const NOTE_EXTENSION: &str = "md";

/// Markdown-file note store rooted at one journal directory.
#[derive(Debug, Clone)]
pub struct FsNoteStore {
    root: PathBuf,
}

impl FsNoteStore {
    /// Creates a store over `root`. The directory is created lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Journal root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of the note file for `date`.
    pub fn note_path(&self, date: NoteDate) -> PathBuf {
        self.root
            .join(format!("{:04}", date.year()))
            .join(format!("{:02}", date.month()))
            .join(format!("{}.{NOTE_EXTENSION}", date.format("%Y-%m-%d")))
    }

    fn scan_month_dir(&self, dir: &Path, dates: &mut Vec<NoteDate>) -> StoreResult<()> {
        for entry in read_dir(dir)? {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(date) = note_date_from_path(&path) else {
                continue;
            };
            // A file filed under the wrong year/month is not part of the journal.
            if self.note_path(date) == path {
                dates.push(date);
            }
        }
        Ok(())
    }
}

impl NoteStore for FsNoteStore {
    fn list_dates(&self) -> StoreResult<Vec<NoteDate>> {
        let mut dates = Vec::new();
        if !self.root.is_dir() {
            return Ok(dates);
        }

        for year in read_dir(&self.root)? {
            let year_path = year.path();
            if !year_path.is_dir() || !is_digits(&year_path, 4) {
                continue;
            }
            for month in read_dir(&year_path)? {
                let month_path = month.path();
                if month_path.is_dir() && is_digits(&month_path, 2) {
                    self.scan_month_dir(&month_path, &mut dates)?;
                }
            }
        }

        dates.sort_unstable();
        dates.dedup();
        Ok(dates)
    }

    fn read(&self, date: NoteDate) -> StoreResult<String> {
        let path = self.note_path(date);
        debug!("event=note_store_read module=repo status=start date={date}");
        fs::read_to_string(&path).map_err(|err| map_io(err, date, path))
    }

    fn write(&mut self, date: NoteDate, body: &str) -> StoreResult<()> {
        let path = self.note_path(date);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        match atomic_write(&path, body) {
            Ok(()) => {
                info!(
                    "event=note_store_write module=repo status=ok date={date} bytes={}",
                    body.len()
                );
                Ok(())
            }
            Err(source) => {
                error!(
                    "event=note_store_write module=repo status=error date={date} error={source}"
                );
                Err(StoreError::Io { path, source })
            }
        }
    }

    fn delete(&mut self, date: NoteDate) -> StoreResult<()> {
        let path = self.note_path(date);
        fs::remove_file(&path).map_err(|err| map_io(err, date, path))?;
        info!("event=note_store_delete module=repo status=ok date={date}");
        Ok(())
    }

    fn exists(&self, date: NoteDate) -> StoreResult<bool> {
        Ok(self.note_path(date).is_file())
    }
}

fn atomic_write(path: &Path, body: &str) -> std::io::Result<()> {
    let temp_path = path.with_extension(format!("{NOTE_EXTENSION}.{}.tmp", std::process::id()));
    if let Err(err) = fs::write(&temp_path, body) {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }
    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }
    Ok(())
}

fn read_dir(dir: &Path) -> StoreResult<Vec<fs::DirEntry>> {
    let to_store_error = |source| StoreError::Io {
        path: dir.to_path_buf(),
        source,
    };
    fs::read_dir(dir)
        .map_err(to_store_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_store_error)
}

fn map_io(err: std::io::Error, date: NoteDate, path: PathBuf) -> StoreError {
    if err.kind() == ErrorKind::NotFound {
        StoreError::NotFound(date)
    } else {
        StoreError::Io { path, source: err }
    }
}

fn note_date_from_path(path: &Path) -> Option<NoteDate> {
    if path.extension()?.to_str()? != NOTE_EXTENSION {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    if stem.len() != 10 {
        return None;
    }
    NoteDate::parse_from_str(stem, "%Y-%m-%d").ok()
}

fn is_digits(path: &Path, len: usize) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.len() == len && name.bytes().all(|b| b.is_ascii_digit()))
}
