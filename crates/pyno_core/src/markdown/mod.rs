//! Note body parser and formatter.
//!
//! # Responsibility
//! - Convert raw note text into a structured `NoteBody` and back.
//! - Recognize todo lines, the date title and the `## todo` section header.
//!
//! # Invariants
//! - Parsing is lossless for every line that is not a todo entry.
//! - `render_body(&parse_body(text)?) == text` for any text produced by `render_body`.
//! - Malformed date stamps are reported, never dropped.
//! - A body whose every line break is `\r\n` is read and written back as CRLF.

use crate::model::note::{Block, Note, NoteBody, NoteDate, ParsedNote, TodoItem};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Section heading under which todo items live.
pub const TODO_HEADER: &str = "## todo";
const DATE_FORMAT: &str = "%Y-%m-%d";

static TODO_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<indent>[ \t]*)-\s*\[(?P<mark>\s*|[xX])\]\s*(?:(?P<date>\d{4}-\d{2}-\d{2}):\s*)?(?P<text>.*)$",
    )
    .expect("valid todo line regex")
});
static TITLE_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^# (\d{4}-\d{2}-\d{2})$").expect("valid title regex"));

/// Body text does not follow the note convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based line number.
    pub line_number: usize,
    pub line: String,
    pub reason: &'static str,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}: {} (`{}`)",
            self.line_number, self.reason, self.line
        )
    }
}

impl Error for ParseError {}

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses raw note text into structured blocks.
///
/// # Errors
/// - Returns `ParseError` when a todo stamp or title carries an impossible date.
pub fn parse_body(text: &str) -> ParseResult<NoteBody> {
    let crlf = uses_crlf(text);
    let newline = line_break(crlf);
    let (content, trailing_newline) = match text.strip_suffix(newline) {
        Some(content) => (content, true),
        None => (text, false),
    };

    if content.is_empty() && !trailing_newline {
        return Ok(NoteBody::default());
    }

    let blocks = content
        .split(newline)
        .enumerate()
        .map(|(index, line)| parse_line(index + 1, line))
        .collect::<ParseResult<Vec<_>>>()?;

    Ok(NoteBody {
        blocks,
        trailing_newline,
        crlf,
    })
}

/// Parses a stored note, keeping its date for scaffolding decisions.
pub fn parse_note(note: &Note) -> ParseResult<ParsedNote> {
    Ok(ParsedNote {
        date: note.date,
        body: parse_body(&note.body)?,
    })
}

/// Renders structured blocks back into note text.
pub fn render_body(body: &NoteBody) -> String {
    let newline = line_break(body.crlf);
    let mut out = body
        .blocks
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join(newline);
    if body.trailing_newline {
        out.push_str(newline);
    }
    out
}

/// Renders one todo item using the canonical marker convention.
pub fn render_todo(item: &TodoItem) -> String {
    let marker = if item.done { "- [x]" } else { "- [ ]" };
    let indent = &item.indent;
    match (item.origin_date, item.text.is_empty()) {
        (Some(date), true) => format!("{indent}{marker} {}:", date.format(DATE_FORMAT)),
        (Some(date), false) => {
            format!("{indent}{marker} {}: {}", date.format(DATE_FORMAT), item.text)
        }
        (None, true) => format!("{indent}{marker}"),
        (None, false) => format!("{indent}{marker} {}", item.text),
    }
}

/// Appends `text` as a free-text block at the end of raw note text.
///
/// Existing lines are kept byte-for-byte; only a missing final line break is
/// added before the new block. A CRLF body gets CRLF breaks.
pub fn append_text(body: &str, text: &str) -> String {
    let newline = line_break(uses_crlf(body));
    let mut out = String::with_capacity(body.len() + text.len() + 4);
    out.push_str(body);
    if !out.is_empty() && !out.ends_with('\n') {
        out.push_str(newline);
    }
    out.push_str(text);
    if !text.ends_with('\n') {
        out.push_str(newline);
    }
    out
}

/// True when the text has line breaks and all of them are `\r\n`.
fn uses_crlf(text: &str) -> bool {
    let breaks = text.matches('\n').count();
    breaks > 0 && text.matches("\r\n").count() == breaks
}

fn line_break(crlf: bool) -> &'static str {
    if crlf {
        "\r\n"
    } else {
        "\n"
    }
}

fn parse_line(line_number: usize, raw_line: &str) -> ParseResult<Block> {
    // A stray carriage return must not hide a title, header or todo.
    let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);

    if let Some(caps) = TODO_LINE_RE.captures(line) {
        let done = caps
            .name("mark")
            .is_some_and(|mark| mark.as_str().eq_ignore_ascii_case("x"));
        let origin_date = match caps.name("date") {
            Some(stamp) => Some(parse_date(line_number, line, stamp.as_str())?),
            None => None,
        };
        let text = caps.name("text").map_or("", |m| m.as_str()).trim();
        let indent = caps.name("indent").map_or("", |m| m.as_str());
        return Ok(Block::Todo(TodoItem {
            text: text.to_string(),
            done,
            origin_date,
            indent: indent.to_string(),
        }));
    }

    if let Some(caps) = TITLE_LINE_RE.captures(line) {
        let date = parse_date(line_number, line, &caps[1])?;
        return Ok(Block::Title(date));
    }

    if line == TODO_HEADER {
        return Ok(Block::TodoHeader);
    }

    Ok(Block::Text(raw_line.to_string()))
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Title(date) => format!("# {}", date.format(DATE_FORMAT)),
        Block::TodoHeader => TODO_HEADER.to_string(),
        Block::Todo(item) => render_todo(item),
        Block::Text(line) => line.clone(),
    }
}

fn parse_date(line_number: usize, line: &str, raw: &str) -> ParseResult<NoteDate> {
    NoteDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| ParseError {
        line_number,
        line: line.to_string(),
        reason: "invalid calendar date",
    })
}

#[cfg(test)]
mod tests {
    use super::{append_text, parse_body, render_body, render_todo};
    use crate::model::note::{Block, NoteBody, TodoItem};
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).expect("valid test date")
    }

    #[test]
    fn parses_pending_done_and_stamped_items() {
        let body = parse_body("- [ ] buy milk\n- [x] call bob\n-  [  ] 2024-01-03: pay rent\n")
            .expect("body should parse");
        let todos = body.todos().cloned().collect::<Vec<_>>();
        assert_eq!(
            todos,
            vec![
                TodoItem::pending("buy milk"),
                TodoItem::done("call bob"),
                TodoItem::pending("pay rent").with_origin(date(3)),
            ]
        );
    }

    #[test]
    fn free_text_passes_through_verbatim_and_in_order() {
        let source = "# 2024-01-05\n\n## todo\n- [ ] a\n  indented prose\n## Todo\n# not a date\n";
        let body = parse_body(source).expect("body should parse");
        assert_eq!(body.blocks[0], Block::Title(date(5)));
        assert_eq!(body.blocks[2], Block::TodoHeader);
        assert_eq!(body.blocks[4], Block::Text("  indented prose".to_string()));
        assert_eq!(body.blocks[5], Block::Text("## Todo".to_string()));
        assert_eq!(render_body(&body), source);
    }

    #[test]
    fn rendered_bodies_round_trip() {
        let mut body = NoteBody::daily_template(date(6));
        body.blocks
            .push(Block::Todo(TodoItem::pending("buy milk").with_origin(date(5))));
        body.blocks.push(Block::Todo(TodoItem::done("")));
        body.blocks.push(Block::Todo(TodoItem::pending("").with_origin(date(4))));
        body.blocks.push(Block::Text("met alice".to_string()));

        let rendered = render_body(&body);
        let reparsed = parse_body(&rendered).expect("rendered body should parse");
        assert_eq!(reparsed, body);
        assert_eq!(render_body(&reparsed), rendered);
    }

    #[test]
    fn empty_and_newline_only_bodies_are_preserved() {
        assert_eq!(render_body(&parse_body("").expect("empty parses")), "");
        assert_eq!(render_body(&parse_body("\n").expect("newline parses")), "\n");
        assert_eq!(render_body(&parse_body("a\n\n").expect("parses")), "a\n\n");
        assert!(parse_body("").expect("empty parses").blocks.is_empty());
    }

    #[test]
    fn impossible_dates_are_reported_with_line_numbers() {
        let error = parse_body("# 2024-01-05\n- [ ] 2024-13-40: broken\n")
            .expect_err("invalid stamp must fail");
        assert_eq!(error.line_number, 2);
        assert!(error.to_string().contains("invalid calendar date"));

        let error = parse_body("# 2024-02-30\n").expect_err("invalid title must fail");
        assert_eq!(error.line_number, 1);
    }

    #[test]
    fn render_todo_uses_canonical_markers() {
        assert_eq!(render_todo(&TodoItem::pending("a")), "- [ ] a");
        assert_eq!(render_todo(&TodoItem::done("a")), "- [x] a");
        assert_eq!(
            render_todo(&TodoItem::pending("a").with_origin(date(5))),
            "- [ ] 2024-01-05: a"
        );
    }

    #[test]
    fn append_text_adds_missing_line_break_only() {
        assert_eq!(append_text("", "note A"), "note A\n");
        assert_eq!(append_text("x", "note A"), "x\nnote A\n");
        assert_eq!(append_text("x\n", "note A\n"), "x\nnote A\n");
        assert_eq!(append_text("x\r\n", "note A"), "x\r\nnote A\r\n");
    }

    #[test]
    fn crlf_bodies_classify_lines_and_keep_their_breaks() {
        let source = "# 2024-01-05\r\n\r\n## todo\r\n- [ ] buy milk\r\nmet alice\r\n";
        let body = parse_body(source).expect("crlf body should parse");
        assert!(body.crlf);
        assert_eq!(body.blocks[0], Block::Title(date(5)));
        assert_eq!(body.blocks[2], Block::TodoHeader);
        assert_eq!(body.blocks[3], Block::Todo(TodoItem::pending("buy milk")));
        assert_eq!(body.blocks[4], Block::Text("met alice".to_string()));
        assert_eq!(render_body(&body), source);
    }

    #[test]
    fn stray_carriage_return_does_not_hide_structure() {
        let body = parse_body("## todo\r\n- [ ] a\nplain\r\n").expect("mixed body should parse");
        assert!(!body.crlf);
        assert_eq!(body.blocks[0], Block::TodoHeader);
        assert_eq!(body.blocks[1], Block::Todo(TodoItem::pending("a")));
        assert_eq!(body.blocks[2], Block::Text("plain\r".to_string()));
    }

    #[test]
    fn nested_todos_keep_their_indent() {
        let source = "- [ ] parent\n    - [x] child\n\t- [ ] 2024-01-02: tabbed\n";
        let body = parse_body(source).expect("nested body should parse");
        let todos = body.todos().cloned().collect::<Vec<_>>();
        assert_eq!(todos[1], TodoItem::done("child").with_indent("    "));
        assert_eq!(
            todos[2],
            TodoItem::pending("tabbed").with_origin(date(2)).with_indent("\t")
        );
        assert_eq!(render_body(&body), source);
    }
}
