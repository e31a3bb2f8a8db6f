//! Initial content for a newly created daily note.
//!
//! # Invariants
//! - Only pending todo items are carried forward, in their original order.
//! - Items without an origin date get the predecessor's date; stamped items keep theirs.
//! - Free text never leaves the day it was written.

use crate::markdown::{parse_body, ParseResult};
use crate::model::note::{Block, Note, NoteBody, NoteDate};

/// Builds the initial body of the note for `today`.
///
/// With no predecessor the result is the bare template (title and an empty
/// todo section).
///
/// # Errors
/// - Returns `ParseError` when the predecessor body is malformed. The caller
///   decides whether to fall back to an empty note or abort.
pub fn synthesize(today: NoteDate, predecessor: Option<&Note>) -> ParseResult<NoteBody> {
    let mut body = NoteBody::daily_template(today);
    let Some(predecessor) = predecessor else {
        return Ok(body);
    };

    let previous = parse_body(&predecessor.body)?;
    let carried = previous.todos().filter(|item| !item.done).map(|item| {
        let mut item = item.clone();
        item.stamp_origin(predecessor.date);
        Block::Todo(item)
    });
    body.blocks.extend(carried);
    Ok(body)
}
