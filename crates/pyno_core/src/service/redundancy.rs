//! Redundancy check between a note and its predecessor.

use crate::model::note::ParsedNote;

/// Returns whether `candidate` holds nothing that `predecessor` lacks.
///
/// Every content block of the candidate must have an equivalent block in the
/// predecessor: todo items match on text and done state, free text on exact
/// line equality. Each note's own scaffolding (its dated title, its first
/// todo header, blank lines) is ignored. The predecessor may hold more than
/// the candidate.
///
/// A candidate without a predecessor is never redundant.
pub fn is_redundant(candidate: &ParsedNote, predecessor: Option<&ParsedNote>) -> bool {
    let Some(predecessor) = predecessor else {
        return false;
    };

    candidate.content_blocks().all(|block| {
        predecessor
            .content_blocks()
            .any(|known| block.is_equivalent(known))
    })
}

#[cfg(test)]
mod tests {
    use super::is_redundant;
    use crate::markdown::parse_note;
    use crate::model::note::{Note, ParsedNote};
    use chrono::NaiveDate;

    fn note(day: u32, text: &str) -> ParsedNote {
        let date = NaiveDate::from_ymd_opt(2024, 1, day).expect("valid test date");
        parse_note(&Note::new(date, text)).expect("test body should parse")
    }

    #[test]
    fn carried_todos_are_redundant_regardless_of_origin() {
        let previous = note(6, "# 2024-01-06\n\n## todo\n- [ ] 2024-01-05: buy milk\n");
        let before = note(5, "# 2024-01-05\n\n## todo\n- [ ] buy milk\n- [ ] call bob\n");
        assert!(is_redundant(&previous, Some(&before)));
    }

    #[test]
    fn new_free_text_is_not_redundant() {
        let previous = note(6, "# 2024-01-06\n\n## todo\n- [ ] buy milk\nmet alice\n");
        let before = note(5, "# 2024-01-05\n\n## todo\n- [ ] buy milk\n");
        assert!(!is_redundant(&previous, Some(&before)));
    }

    #[test]
    fn repeated_free_text_is_redundant() {
        let previous = note(6, "# 2024-01-06\n\n## todo\nstandup at 9\n");
        let before = note(5, "# 2024-01-05\n\nstandup at 9\n## todo\n- [ ] buy milk\n");
        assert!(is_redundant(&previous, Some(&before)));
    }

    #[test]
    fn foreign_titles_and_extra_headers_are_content() {
        let before = note(5, "# 2024-01-05\n\n## todo\n- [ ] a\n");
        let extra_header = note(6, "# 2024-01-06\n\n## todo\n- [ ] a\n## todo\n");
        let foreign_title = note(6, "# 2024-01-06\n\n## todo\n- [ ] a\n# 2024-01-01\n");
        assert!(!is_redundant(&extra_header, Some(&before)));
        assert!(!is_redundant(&foreign_title, Some(&before)));
    }

    #[test]
    fn completing_a_todo_is_new_information() {
        let previous = note(6, "## todo\n- [x] buy milk\n");
        let before = note(5, "## todo\n- [ ] buy milk\n");
        assert!(!is_redundant(&previous, Some(&before)));
    }

    #[test]
    fn missing_predecessor_is_never_redundant() {
        assert!(!is_redundant(&note(6, ""), None));
    }
}
