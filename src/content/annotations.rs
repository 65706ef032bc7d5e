// file: src/content/annotations.rs
//
// Events carry a generated body followed by whatever people typed underneath it.
// The boundary is found by searching for the sentinel sentences the composer emits,
// so editing or translating those sentences in a stored event loses the boundary and
// the next sync rewrites the description from scratch.

use crate::content::description::{CLOSING_MARKER, WARNING_MARKER};
use log::debug;

pub const MANUAL_NOTES_LABEL: &str = "--- Manual Notes ---";

/// End-of-generated-content anchors, in the order they are tried.
const END_MARKERS: [&str; 2] = [WARNING_MARKER, CLOSING_MARKER];

fn manual_notes_separator() -> String {
    format!("\n\n{}\n", MANUAL_NOTES_LABEL)
}

/// Byte offset just past the first anchor found in `description`.
fn generated_end(description: &str) -> Option<usize> {
    END_MARKERS
        .iter()
        .find_map(|marker| description.find(marker).map(|index| index + marker.len()))
}

/// Drops leading whitespace up to and including its last newline, keeping any
/// indentation on the first line of real content.
fn strip_leading_blank_lines(text: &str) -> &str {
    let content_start = text.len() - text.trim_start().len();
    match text[..content_start].rfind('\n') {
        Some(newline) => &text[newline + 1..],
        None => text,
    }
}

/// Text people appended below the generated block of `previous`, already prefixed with
/// the manual-notes separator. `None` when there is nothing worth keeping.
pub fn manual_additions(previous: &str) -> Option<String> {
    let end = generated_end(previous)?;
    let tail = &previous[end..];
    if tail.is_empty() {
        return None;
    }

    let body = strip_leading_blank_lines(tail);
    let body = body
        .strip_prefix(MANUAL_NOTES_LABEL)
        .map(|rest| rest.strip_prefix('\n').unwrap_or(rest))
        .unwrap_or(body);

    let additions = format!("{}{}", manual_notes_separator(), body);
    if additions.trim().chars().count() > MANUAL_NOTES_LABEL.chars().count() {
        Some(additions)
    } else {
        None
    }
}

/// Description to store: the fresh generated body plus any manual additions carried
/// over from the previous description.
pub fn merge_descriptions(previous: Option<&str>, generated: &str) -> String {
    let previous = match previous {
        Some(previous) if !previous.is_empty() => previous,
        _ => return generated.to_string(),
    };

    match manual_additions(previous) {
        Some(additions) => {
            debug!(
                "Preserving manual additions: {}",
                additions.trim().chars().take(100).collect::<String>()
            );
            format!("{}{}", generated, additions)
        }
        None => generated.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generated(manual_warning: bool) -> String {
        let mut body = format!("Item: Lease\nStatus: Active\n\n{}", CLOSING_MARKER);
        if manual_warning {
            body.push_str(&format!("\n\n{}", WARNING_MARKER));
        }
        body
    }

    #[test]
    fn test_no_previous_returns_generated() {
        assert_eq!(merge_descriptions(None, "fresh"), "fresh");
        assert_eq!(merge_descriptions(Some(""), "fresh"), "fresh");
    }

    #[test]
    fn test_merge_with_itself_is_identity() {
        for warning in [false, true] {
            let body = generated(warning);
            assert_eq!(merge_descriptions(Some(&body), &body), body);
        }
    }

    #[test]
    fn test_appended_note_survives_verbatim() {
        let previous = format!("{}\n\nRemember to call John", generated(false));
        let fresh = generated(false).replace("Active", "Expiring Soon");
        let merged = merge_descriptions(Some(&previous), &fresh);

        assert!(merged.starts_with(&fresh));
        assert!(merged.contains("\nRemember to call John"));
        assert_eq!(
            merged,
            format!("{}\n\n--- Manual Notes ---\nRemember to call John", fresh)
        );
    }

    #[test]
    fn test_separator_is_not_duplicated_across_runs() {
        let first = merge_descriptions(
            Some(&format!("{}\n\nRemember to call John", generated(false))),
            &generated(false),
        );
        let second = merge_descriptions(Some(&first), &generated(false));
        let third = merge_descriptions(Some(&second), &generated(false));

        assert_eq!(first, second);
        assert_eq!(second, third);
        assert_eq!(third.matches(MANUAL_NOTES_LABEL).count(), 1);
    }

    #[test]
    fn test_warning_marker_anchors_first() {
        let previous = format!("{}\nescalate to legal", generated(true));
        let merged = merge_descriptions(Some(&previous), &generated(true));
        assert!(merged.ends_with("--- Manual Notes ---\nescalate to legal"));
        assert_eq!(merged.matches(WARNING_MARKER).count(), 1);
    }

    #[test]
    fn test_warning_dropped_when_flags_change() {
        // Previously manual-only; the item now auto-renews, so the fresh body has no warning.
        let previous = format!("{}\n\nnote", generated(true));
        let merged = merge_descriptions(Some(&previous), &generated(false));
        assert_eq!(merged, format!("{}\n\n--- Manual Notes ---\nnote", generated(false)));
    }

    #[test]
    fn test_blank_or_separator_only_tail_is_dropped() {
        let previous = format!("{}\n\n   \n", generated(false));
        assert_eq!(merge_descriptions(Some(&previous), "fresh"), "fresh");

        let previous = format!("{}\n\n--- Manual Notes ---\n", generated(false));
        assert_eq!(merge_descriptions(Some(&previous), "fresh"), "fresh");
    }

    #[test]
    fn test_missing_anchor_returns_generated() {
        assert_eq!(merge_descriptions(Some("someone rewrote this"), "fresh"), "fresh");
    }

    #[test]
    fn test_indentation_of_first_note_line_is_kept() {
        let previous = format!("{}\n\n    - renew PO #4411", generated(false));
        let merged = merge_descriptions(Some(&previous), "fresh");
        assert_eq!(merged, "fresh\n\n--- Manual Notes ---\n    - renew PO #4411");
    }
}
