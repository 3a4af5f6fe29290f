//! Card name autocomplete for the line under the cursor.
//!
//! The name typed so far is used as a regular expression over the sorted
//! name list, so `Elv` finds "Llanowar Elves" and `^Is` only finds names
//! starting with "Is". Metacharacters typed as part of a name (`.`, `(`,
//! `+`) change the match; see [`MatchMode`].

use crate::dictionary::Dictionary;
use crate::parser::leading_digits;
use regex::RegexBuilder;
use serde::Serialize;
use std::borrow::Cow;

// Caps the compiled size of a user-typed pattern.
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

#[derive(Debug, thiserror::Error)]
pub enum SuggestError {
    #[error("Card dictionary is not loaded yet")]
    NotReady,
    #[error("Invalid name pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// How the typed fragment is matched against card names.
///
/// `Pattern` (the default) treats the fragment as a regular expression;
/// `Literal` matches it as plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    #[default]
    Pattern,
    Literal,
}

impl MatchMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pattern" => Some(Self::Pattern),
            "literal" => Some(Self::Literal),
            _ => None,
        }
    }
}

/// The line under the cursor, split into count prefix and name fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorContext<'a> {
    pub line: &'a str,
    /// Byte range of `line` within the buffer.
    pub start: usize,
    pub end: usize,
    /// Leading digits plus the whitespace after them, or empty.
    pub count_prefix: &'a str,
    pub fragment: &'a str,
}

impl<'a> CursorContext<'a> {
    pub fn from_line(line: &'a str) -> Self {
        let split = count_prefix_len(line);
        Self {
            line,
            start: 0,
            end: line.len(),
            count_prefix: &line[..split],
            fragment: &line[split..],
        }
    }
}

/// Extract the line containing `cursor` (a byte offset).
///
/// The offset is clamped to the buffer and moved back to a char boundary.
pub fn extract_cursor_line(buffer: &str, cursor: usize) -> CursorContext<'_> {
    let cursor = clamp_cursor(buffer, cursor);
    let start = buffer[..cursor].rfind('\n').map_or(0, |i| i + 1);
    let mut end = buffer[cursor..].find('\n').map_or(buffer.len(), |i| cursor + i);
    if end > start && buffer.as_bytes()[end - 1] == b'\r' {
        end -= 1;
    }

    CursorContext {
        start,
        end,
        ..CursorContext::from_line(&buffer[start..end])
    }
}

fn clamp_cursor(buffer: &str, cursor: usize) -> usize {
    let mut cursor = cursor.min(buffer.len());
    while !buffer.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}

fn count_prefix_len(line: &str) -> usize {
    let digits = leading_digits(line).len();
    if digits == 0 {
        return 0;
    }
    let rest = &line[digits..];
    let spaces = rest.len() - rest.trim_start().len();
    if spaces == 0 { 0 } else { digits + spaces }
}

/// Candidate names for a fragment, in lexicographic order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Suggestions<'d> {
    pub fragment: String,
    pub matches: Vec<&'d str>,
}

impl Suggestions<'_> {
    /// The fragment already is the only matching name.
    pub fn is_complete(&self) -> bool {
        matches!(self.matches.as_slice(), [only] if *only == self.fragment)
    }

    pub fn should_display(&self) -> bool {
        !self.matches.is_empty() && !self.is_complete()
    }

    pub fn best(&self) -> Option<&str> {
        self.matches.first().copied()
    }
}

/// Result of a completion: the buffer (borrowed when untouched) and the
/// cursor offset to restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion<'b> {
    pub text: Cow<'b, str>,
    pub cursor: usize,
}

impl Completion<'_> {
    pub fn is_changed(&self) -> bool {
        matches!(self.text, Cow::Owned(_))
    }
}

pub struct Suggester<'d> {
    names: &'d [String],
    mode: MatchMode,
}

impl<'d> Suggester<'d> {
    pub fn new(dictionary: &'d Dictionary) -> Self {
        Self {
            names: dictionary.names(),
            mode: MatchMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Suggest names for a cursor line such as `4 Llan`.
    pub fn suggest(&self, line: &str) -> Result<Suggestions<'d>, SuggestError> {
        let fragment = CursorContext::from_line(line).fragment;
        if fragment.is_empty() {
            return Ok(Suggestions::default());
        }

        let pattern = match self.mode {
            MatchMode::Pattern => Cow::Borrowed(fragment),
            MatchMode::Literal => Cow::Owned(regex::escape(fragment)),
        };
        let re = RegexBuilder::new(&pattern)
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()?;

        let matches = self
            .names
            .iter()
            .filter(|name| re.is_match(name))
            .map(String::as_str)
            .collect();

        Ok(Suggestions {
            fragment: fragment.to_string(),
            matches,
        })
    }

    /// Replace the cursor line with its count prefix and the best match.
    ///
    /// Lines without a count prefix, and fragments with no match, leave the
    /// buffer untouched.
    pub fn complete<'b>(&self, buffer: &'b str, cursor: usize) -> Result<Completion<'b>, SuggestError> {
        let ctx = extract_cursor_line(buffer, cursor);
        let unchanged = Completion {
            text: Cow::Borrowed(buffer),
            cursor: clamp_cursor(buffer, cursor),
        };
        if ctx.count_prefix.is_empty() {
            return Ok(unchanged);
        }

        let suggestions = self.suggest(ctx.line)?;
        let Some(best) = suggestions.best() else {
            return Ok(unchanged);
        };
        // Already complete: nothing for the caller to apply.
        if ctx.fragment == best {
            return Ok(unchanged);
        }

        let mut text = String::with_capacity(buffer.len() + best.len());
        text.push_str(&buffer[..ctx.start]);
        text.push_str(ctx.count_prefix);
        text.push_str(best);
        let cursor = text.len();
        text.push_str(&buffer[ctx.end..]);

        Ok(Completion {
            text: Cow::Owned(text),
            cursor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardRecord;
    use pretty_assertions::assert_eq;

    fn dictionary() -> Dictionary {
        [
            "Island",
            "Llanowar Elves",
            "Elvish Mystic",
            "Shaman of the Pack",
            "Jace, Vryn's Prodigy",
            "Jace, Unraveler of Secrets",
        ]
        .into_iter()
        .map(CardRecord::new)
        .collect()
    }

    #[test]
    fn test_extract_cursor_line() {
        let buffer = "4 Island\n2 Llan\n1 Shaman";
        let ctx = extract_cursor_line(buffer, 13);

        assert_eq!(ctx.line, "2 Llan");
        assert_eq!((ctx.start, ctx.end), (9, 15));
        assert_eq!(ctx.count_prefix, "2 ");
        assert_eq!(ctx.fragment, "Llan");
    }

    #[test]
    fn test_extract_cursor_line_edges() {
        let buffer = "4 Island\n\n1 Sha\r\n";
        assert_eq!(extract_cursor_line(buffer, 0).line, "4 Island");
        assert_eq!(extract_cursor_line(buffer, 8).line, "4 Island");
        assert_eq!(extract_cursor_line(buffer, 9).line, "");
        assert_eq!(extract_cursor_line(buffer, 12).line, "1 Sha");
        assert_eq!(extract_cursor_line(buffer, 500).line, "");
        assert_eq!(extract_cursor_line("", 3).line, "");

        // Offset inside a multi-byte character moves back to its start.
        let ctx = extract_cursor_line("2 エルフ", 4);
        assert_eq!(ctx.line, "2 エルフ");
    }

    #[test]
    fn test_count_prefix_requires_whitespace() {
        assert_eq!(CursorContext::from_line("4Isl").fragment, "4Isl");
        assert_eq!(CursorContext::from_line("4 \tIsl").count_prefix, "4 \t");
        assert_eq!(CursorContext::from_line("Isl").count_prefix, "");
    }

    #[test]
    fn test_suggest_pattern() {
        let dict = dictionary();
        let suggester = Suggester::new(&dict);

        let s = suggester.suggest("4 Myst").unwrap();
        assert_eq!(s.matches, vec!["Elvish Mystic"]);

        let s = suggester.suggest("4 lv").unwrap();
        assert_eq!(s.matches, vec!["Elvish Mystic", "Llanowar Elves"]);
        assert!(s.should_display());

        let s = suggester.suggest("^Jace").unwrap();
        assert_eq!(s.matches, vec!["Jace, Unraveler of Secrets", "Jace, Vryn's Prodigy"]);
    }

    #[test]
    fn test_suggest_empty_fragment() {
        let dict = dictionary();
        let s = Suggester::new(&dict).suggest("4 ").unwrap();
        assert!(s.matches.is_empty());
        assert!(!s.should_display());
    }

    #[test]
    fn test_suggest_is_case_sensitive() {
        let dict = dictionary();
        let s = Suggester::new(&dict).suggest("2 island").unwrap();
        assert!(s.matches.is_empty());
    }

    #[test]
    fn test_suggest_complete_signal() {
        let dict = dictionary();
        let s = Suggester::new(&dict).suggest("4 Island").unwrap();
        assert!(s.is_complete());
        assert!(!s.should_display());
    }

    #[test]
    fn test_metacharacters() {
        let dict = dictionary();

        let s = Suggester::new(&dict).suggest("1 Jace, V.").unwrap();
        assert_eq!(s.matches, vec!["Jace, Vryn's Prodigy"]);

        let err = Suggester::new(&dict).suggest("1 Jace, [").unwrap_err();
        assert!(matches!(err, SuggestError::InvalidPattern(_)));

        let literal = Suggester::new(&dict).with_mode(MatchMode::Literal);
        assert!(literal.suggest("1 Jace, [").unwrap().matches.is_empty());
        assert!(literal.suggest("1 Jace, V.").unwrap().matches.is_empty());
        assert_eq!(literal.suggest("1 Jace, V").unwrap().matches.len(), 1);
    }

    #[test]
    fn test_complete_replaces_cursor_line() {
        let dict = dictionary();
        let buffer = "4 Island\n3 Llan\n1 Shaman of the Pack";
        let completion = Suggester::new(&dict).complete(buffer, 15).unwrap();

        assert!(completion.is_changed());
        assert_eq!(completion.text, "4 Island\n3 Llanowar Elves\n1 Shaman of the Pack");
        assert_eq!(completion.cursor, "4 Island\n3 Llanowar Elves".len());
    }

    #[test]
    fn test_complete_takes_first_match() {
        let dict = dictionary();
        let completion = Suggester::new(&dict).complete("2 Jace", 6).unwrap();
        assert_eq!(completion.text, "2 Jace, Unraveler of Secrets");
    }

    #[test]
    fn test_complete_keeps_crlf() {
        let dict = dictionary();
        let completion = Suggester::new(&dict).complete("2 Isl\r\n1 Shaman", 3).unwrap();
        assert_eq!(completion.text, "2 Island\r\n1 Shaman");
    }

    #[test]
    fn test_complete_unchanged() {
        let dict = dictionary();
        let suggester = Suggester::new(&dict);

        // No count prefix.
        let completion = suggester.complete("Llan", 4).unwrap();
        assert!(!completion.is_changed());
        assert_eq!(completion.text, "Llan");

        // No match.
        let completion = suggester.complete("4 Forest", 8).unwrap();
        assert!(!completion.is_changed());
        assert_eq!(completion.cursor, 8);
    }

    #[test]
    fn test_complete_on_complete_line_is_unchanged() {
        let dict = dictionary();
        let completion = Suggester::new(&dict).complete("4 Island\n1 Shaman", 8).unwrap();

        assert!(!completion.is_changed());
        assert_eq!(completion.text, "4 Island\n1 Shaman");
        assert_eq!(completion.cursor, 8);
    }

    #[test]
    fn test_complete_is_idempotent() {
        let dict = dictionary();
        let suggester = Suggester::new(&dict);
        let once = suggester.complete("4 Isl", 5).unwrap();
        let twice = suggester.complete(&once.text, once.cursor).unwrap();

        assert_eq!(once.text, twice.text);
        assert!(suggester.suggest(extract_cursor_line(&twice.text, twice.cursor).line).unwrap().is_complete());
    }
}
