//! Greedy, word-level, character-count line wrapping.
//!
//! The budget is measured in Unicode scalar values, not pixels; pixel-true
//! wrapping is deliberately out of scope because the card format counts
//! characters (`max_characters_per_line`).

/// Break `text` into lines of at most `max_chars` characters.
///
/// Words are the result of splitting on single literal spaces, so
/// consecutive spaces produce empty words that still contribute a trailing
/// space to the running line length. Lines are committed with surrounding
/// whitespace trimmed, and a final (possibly empty) line is always emitted.
///
/// Known, deliberate behavior: the overflow check is skipped for the very
/// first word, so a single word longer than `max_chars` is emitted
/// over-length rather than split. Callers that need hard guarantees must
/// budget for it.
pub fn break_text_into_lines(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for (i, word) in text.split(' ').enumerate() {
        let candidate = format!("{line}{word} ");
        if candidate.chars().count() > max_chars && i > 0 {
            lines.push(line.trim().to_string());
            line = format!("{word} ");
        } else {
            line = candidate;
        }
    }

    lines.push(line.trim().to_string());
    lines
}
