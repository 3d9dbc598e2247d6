//! Release-note extraction
//!
//! Turns a raw text blob into an ordered sequence of statements:
//!
//! 1. Blank lines are dropped
//! 2. Each line is trimmed
//! 3. Leading bullet/numbering markers (`-`, `*`, digits, `.`, spaces) are
//!    stripped from the front only
//! 4. Lines that then start with `#` are headings and are dropped
//!
//! Source order and duplicates are preserved. Extraction never fails.

use std::fmt;

use serde::Serialize;

/// Characters stripped from the front of a line.
const MARKER_CHARS: &[char] = &['-', '*', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '.', ' '];

/// A single extracted line of release-note prose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Statement(String);

impl Statement {
    /// Create a statement from already-cleaned text
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The statement text
    pub fn text(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract candidate statements from release-note text.
pub fn extract(text: &str) -> Vec<Statement> {
    text.lines().filter_map(clean_line).map(Statement).collect()
}

fn clean_line(raw: &str) -> Option<String> {
    let line = raw.trim();
    if line.is_empty() {
        return None;
    }

    let line = line.trim_start_matches(MARKER_CHARS).trim();

    // Marker-only lines such as `---` leave nothing to test
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    Some(line.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        extract(input).into_iter().map(|s| s.text().to_string()).collect()
    }

    #[test]
    fn test_bullets_are_stripped() {
        assert_eq!(
            texts("- first item\n* second item\n  -  third item  "),
            vec!["first item", "second item", "third item"]
        );
    }

    #[test]
    fn test_numbering_is_stripped() {
        assert_eq!(
            texts("1. Added login\n12. Fixed cache"),
            vec!["Added login", "Fixed cache"]
        );
    }

    #[test]
    fn test_headings_and_blanks_dropped() {
        let input = "# Release 4.2\n\n## Fixes\n- fixed disenrollment bug\n   \n";
        assert_eq!(texts(input), vec!["fixed disenrollment bug"]);
    }

    #[test]
    fn test_numbered_heading_dropped() {
        // Marker stripping happens before the heading check
        assert!(texts("1. # not a statement").is_empty());
    }

    #[test]
    fn test_markers_only_stripped_from_front() {
        assert_eq!(
            texts("- Version 2.0 supports re-login"),
            vec!["Version 2.0 supports re-login"]
        );
    }

    #[test]
    fn test_order_and_duplicates_preserved() {
        assert_eq!(
            texts("- b\n- a\n- b"),
            vec!["b", "a", "b"]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(extract("").is_empty());
        assert!(extract("\n\n   \n# Heading only\n---\n").is_empty());
    }
}
