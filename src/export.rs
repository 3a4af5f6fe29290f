//! Export of an annotated deck list back to `count name` text.

use crate::annotate::AnnotatedEntry;
use crate::stats::sort_for_display;

/// Serialize entries in display order, one `count name` line each.
///
/// Unmatched lines were already dropped by annotation, so the export is a
/// cleaned-up deck list that parses back to the same entries.
pub fn export(entries: &[AnnotatedEntry<'_>]) -> String {
    let mut sorted = entries.to_vec();
    sort_for_display(&mut sorted);

    let mut output = String::new();
    for (i, entry) in sorted.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        output.push_str(&entry.count.to_string());
        output.push(' ');
        output.push_str(&entry.name);
    }
    output
}
