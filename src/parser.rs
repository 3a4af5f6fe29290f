//! Deck list parser.
//!
//! A deck list is free text. Only lines starting with a count are entries:
//!
//! ```text
//! // Creatures
//! 4 Llanowar Elves
//! 20 Forest
//! ```
//!
//! Everything else (headers, comments, blank lines) is skipped without error.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckEntry {
    pub count: u32,
    pub name: String,
}

impl DeckEntry {
    pub fn new(count: u32, name: impl Into<String>) -> Self {
        Self {
            count,
            name: name.into(),
        }
    }
}

/// Parse a whole deck list, keeping entry order.
pub fn parse(text: &str) -> Vec<DeckEntry> {
    text.split('\n').filter_map(parse_line).collect()
}

/// Parse a single line, or `None` if it is not an entry.
///
/// The name is whatever follows the first whitespace run, with trailing
/// whitespace removed. `4Island` therefore has a count but an empty name.
pub fn parse_line(line: &str) -> Option<DeckEntry> {
    let digits = leading_digits(line);
    if digits.is_empty() {
        return None;
    }

    // Counts above u32::MAX saturate rather than fail.
    let count = digits.bytes().fold(0u32, |acc, b| {
        acc.saturating_mul(10).saturating_add(u32::from(b - b'0'))
    });
    if count == 0 {
        return None;
    }

    let name = match line.find(char::is_whitespace) {
        Some(start) => line[start..].trim(),
        None => "",
    };

    Some(DeckEntry::new(count, name))
}

pub(crate) fn leading_digits(line: &str) -> &str {
    let end = line
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(line.len());
    &line[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_parse_basic() {
        let entries = parse("2 Island\nfoo\n1 Plains");
        assert_eq!(
            entries,
            vec![DeckEntry::new(2, "Island"), DeckEntry::new(1, "Plains")]
        );
    }

    #[test]
    fn test_parse_skips_non_entries() {
        let input = "Deck\n\n// Lands\n  4 Forest\nSideboard: 2 Negate\n";
        assert!(parse(input).is_empty());
    }

    #[test]
    fn test_parse_name_whitespace() {
        let entries = parse("4   Llanowar  Elves  \r\n3\tWar Behemoth");
        assert_eq!(
            entries,
            vec![
                DeckEntry::new(4, "Llanowar  Elves"),
                DeckEntry::new(3, "War Behemoth"),
            ]
        );
    }

    #[test]
    fn test_parse_count_edge_cases() {
        assert_eq!(parse_line("007 Spy"), Some(DeckEntry::new(7, "Spy")));
        assert_eq!(parse_line("0 Island"), None);
        assert_eq!(parse_line("4"), Some(DeckEntry::new(4, "")));
        assert_eq!(parse_line("4Island"), Some(DeckEntry::new(4, "")));
        assert_eq!(parse_line("4Island Sanctum"), Some(DeckEntry::new(4, "Sanctum")));
        assert_eq!(
            parse_line("99999999999 Relentless Rats"),
            Some(DeckEntry::new(u32::MAX, "Relentless Rats"))
        );
    }

    #[test]
    fn test_parse_unicode_name() {
        let entries = parse("2 ラノワールのエルフ");
        assert_eq!(entries, vec![DeckEntry::new(2, "ラノワールのエルフ")]);
    }

    proptest! {
        #[test]
        fn prop_counts_positive(text in "([0-9]{0,3}[ a-zA-Z]{0,8}\n){0,8}") {
            for entry in parse(&text) {
                prop_assert!(entry.count > 0);
            }
        }

        #[test]
        fn prop_only_digit_lines_produce_entries(lines in prop::collection::vec("[0-9a-z ]{0,10}", 0..10)) {
            let text = lines.join("\n");
            let expected = lines
                .iter()
                .filter(|l| !leading_digits(l).is_empty() && leading_digits(l).bytes().any(|b| b != b'0'))
                .count();
            prop_assert_eq!(parse(&text).len(), expected);
        }
    }
}
