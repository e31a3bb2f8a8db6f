//! Daily note domain model.
//!
//! # Responsibility
//! - Define the structured shape of a note body (title, todo section, free text).
//! - Define the todo item identity used to match tasks across days.
//!
//! # Invariants
//! - A note is identified by its calendar date; there is at most one per day.
//! - `TodoItem::text` is stored trimmed, so formatting drift never changes identity.
//! - `origin_date` is only ever set once, by carry-forward stamping.
//!
//! # See also
//! - crate::markdown for the textual convention.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Calendar date that identifies one note.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoteDate = NaiveDate;

/// One stored note: its identity date plus the raw body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub date: NoteDate,
    pub body: String,
}

impl Note {
    pub fn new(date: NoteDate, body: impl Into<String>) -> Self {
        Self {
            date,
            body: body.into(),
        }
    }
}

/// One entry of a note's todo list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Task text, trimmed. Identity for matching across notes.
    pub text: String,
    /// Completed items are never carried forward.
    pub done: bool,
    /// Date the item was first recorded. Absent until stamped.
    pub origin_date: Option<NoteDate>,
    /// Leading whitespace of the source line; nests subtasks.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub indent: String,
}

impl TodoItem {
    /// Creates a top-level pending item without an origin date.
    pub fn pending(text: impl Into<String>) -> Self {
        Self {
            text: text.into().trim().to_string(),
            done: false,
            origin_date: None,
            indent: String::new(),
        }
    }

    /// Creates a top-level completed item without an origin date.
    pub fn done(text: impl Into<String>) -> Self {
        Self {
            done: true,
            ..Self::pending(text)
        }
    }

    /// Returns a copy with `origin_date` set.
    pub fn with_origin(mut self, date: NoteDate) -> Self {
        self.origin_date = Some(date);
        self
    }

    /// Returns a copy nested under `indent`.
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Stamps `date` as origin unless one is already recorded.
    pub fn stamp_origin(&mut self, date: NoteDate) {
        if self.origin_date.is_none() {
            self.origin_date = Some(date);
        }
    }

    /// Cross-note equality: same text and done state. Origin and indent are ignored.
    pub fn same_task(&self, other: &TodoItem) -> bool {
        self.text == other.text && self.done == other.done
    }
}

/// One line-level block of a note body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Block {
    /// `# YYYY-MM-DD` heading.
    Title(NoteDate),
    /// `## todo` section heading.
    TodoHeader,
    Todo(TodoItem),
    /// Any other line, kept verbatim.
    Text(String),
}

impl Block {
    /// Content equivalence used by the redundancy check.
    pub fn is_equivalent(&self, other: &Block) -> bool {
        match (self, other) {
            (Self::Todo(left), Self::Todo(right)) => left.same_task(right),
            (Self::Text(left), Self::Text(right)) => left == right,
            (Self::Title(left), Self::Title(right)) => left == right,
            (Self::TodoHeader, Self::TodoHeader) => true,
            _ => false,
        }
    }
}

/// Structured note body in original line order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteBody {
    pub blocks: Vec<Block>,
    /// Whether the source text ended with a line break.
    pub trailing_newline: bool,
    /// Whether lines are separated by `\r\n` instead of `\n`.
    #[serde(default)]
    pub crlf: bool,
}

impl NoteBody {
    /// Scaffolding for a fresh note: title, blank line, todo header.
    pub fn daily_template(date: NoteDate) -> Self {
        Self {
            blocks: vec![
                Block::Title(date),
                Block::Text(String::new()),
                Block::TodoHeader,
            ],
            trailing_newline: true,
            crlf: false,
        }
    }

    /// Iterates over todo items in body order.
    pub fn todos(&self) -> impl Iterator<Item = &TodoItem> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Todo(item) => Some(item),
            _ => None,
        })
    }

    /// Iterates over content blocks of the note dated `own_date`.
    ///
    /// Scaffolding is the first title naming `own_date`, the first todo
    /// header and blank lines. Any other title or header is user content.
    pub fn content_blocks(&self, own_date: NoteDate) -> impl Iterator<Item = &Block> + '_ {
        let mut title_seen = false;
        let mut header_seen = false;
        self.blocks.iter().filter(move |block| match block {
            Block::Title(date) if *date == own_date && !title_seen => {
                title_seen = true;
                false
            }
            Block::TodoHeader if !header_seen => {
                header_seen = true;
                false
            }
            Block::Text(line) => !line.trim().is_empty(),
            _ => true,
        })
    }

    /// Returns whether the note dated `own_date` carries no content blocks.
    pub fn is_blank(&self, own_date: NoteDate) -> bool {
        self.content_blocks(own_date).next().is_none()
    }
}

/// A note whose body has been parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedNote {
    pub date: NoteDate,
    pub body: NoteBody,
}

impl ParsedNote {
    pub fn content_blocks(&self) -> impl Iterator<Item = &Block> + '_ {
        self.body.content_blocks(self.date)
    }

    pub fn is_blank(&self) -> bool {
        self.body.is_blank(self.date)
    }
}

#[cfg(test)]
mod tests {
    use super::{Block, NoteBody, TodoItem};
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).expect("valid test date")
    }

    #[test]
    fn stamp_origin_never_overwrites_existing_date() {
        let mut item = TodoItem::pending("call bob").with_origin(date(1));
        item.stamp_origin(date(5));
        assert_eq!(item.origin_date, Some(date(1)));

        let mut fresh = TodoItem::pending("buy milk");
        fresh.stamp_origin(date(5));
        assert_eq!(fresh.origin_date, Some(date(5)));
    }

    #[test]
    fn same_task_ignores_origin_but_not_done_state() {
        let stamped = TodoItem::pending("buy milk").with_origin(date(3));
        assert!(stamped.same_task(&TodoItem::pending("  buy milk ")));
        assert!(!stamped.same_task(&TodoItem::done("buy milk")));
    }

    #[test]
    fn template_is_blank_but_not_empty() {
        let body = NoteBody::daily_template(date(6));
        assert_eq!(body.blocks.len(), 3);
        assert!(body.is_blank(date(6)));
        assert_eq!(body.todos().count(), 0);
    }

    #[test]
    fn blocks_serialize_with_kind_tag() {
        let block = Block::Todo(TodoItem::pending("buy milk").with_origin(date(5)));
        let value = serde_json::to_value(&block).expect("block should serialize");
        assert_eq!(value["kind"], "todo");
        assert_eq!(value["value"]["origin_date"], "2024-01-05");
        assert_eq!(
            serde_json::to_value(Block::TodoHeader).expect("header should serialize")["kind"],
            "todo_header"
        );
    }

    #[test]
    fn blank_text_lines_are_not_content() {
        let body = NoteBody {
            blocks: vec![
                Block::Text("   ".to_string()),
                Block::Text("met alice".to_string()),
            ],
            ..NoteBody::default()
        };
        let content = body.content_blocks(date(6)).collect::<Vec<_>>();
        assert_eq!(content, vec![&Block::Text("met alice".to_string())]);
    }

    #[test]
    fn only_own_title_and_first_header_are_scaffolding() {
        let mut body = NoteBody::daily_template(date(5));
        body.blocks.push(Block::TodoHeader);
        body.blocks.push(Block::Title(date(1)));
        body.blocks.push(Block::Title(date(5)));

        let content = body.content_blocks(date(5)).collect::<Vec<_>>();
        assert_eq!(
            content,
            vec![&Block::TodoHeader, &Block::Title(date(1)), &Block::Title(date(5))]
        );
        assert!(!body.is_blank(date(5)));
        // Read as another day's note, the template title is content too.
        assert!(!NoteBody::daily_template(date(5)).is_blank(date(6)));
    }

    #[test]
    fn same_task_ignores_indent() {
        let nested = TodoItem::pending("child").with_indent("    ");
        assert!(nested.same_task(&TodoItem::pending("child")));
    }
}
