use crate::TextStatistics;

// ── Text statistics ──────────────────────────────────────────────────────────

/// Compute word, character, and paragraph counts for extracted text.
///
/// Pure and deterministic: the same text always yields the same counts.
///
/// - **Words** are maximal runs of non-whitespace characters.
/// - **Characters** are Unicode scalar values, whitespace included.
/// - **Paragraphs** are maximal runs of non-blank lines, where a blank line
///   is empty or whitespace-only. Leading and trailing blank runs do not
///   create paragraphs.
///
/// ```
/// # use docanalyzer::analyze_text;
/// let stats = analyze_text("Hello world. This is a test.");
/// assert_eq!(stats.word_count, 6);
/// assert_eq!(stats.char_count, 28);
/// assert_eq!(stats.paragraph_count, 1);
/// ```
pub fn analyze_text(text: &str) -> TextStatistics {
    TextStatistics {
        word_count: text.split_whitespace().count(),
        char_count: text.chars().count(),
        paragraph_count: paragraph_count(text),
    }
}

/// Count blocks of text separated by one or more blank lines.
fn paragraph_count(text: &str) -> usize {
    let mut paragraphs = 0;
    let mut in_paragraph = false;

    for line in text.lines() {
        if line.trim().is_empty() {
            in_paragraph = false;
        } else if !in_paragraph {
            paragraphs += 1;
            in_paragraph = true;
        }
    }

    paragraphs
}
