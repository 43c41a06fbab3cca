//! Output normalization for tips shown in the UI.

/// Default sentence cap.
pub const DEFAULT_MAX_SENTENCES: usize = 2;

/// Trim `tip` and cap it at `max_sentences` sentences.
///
/// Sentences are the non-empty fragments between periods. When there are
/// more than the cap, the first `max_sentences` are joined with `". "` and a
/// trailing period is added; otherwise the trimmed text is returned as is.
/// A cap of 0 is treated as 1. Idempotent.
pub fn clean_tip(tip: &str, max_sentences: usize) -> String {
    let tip = tip.trim();
    if tip.is_empty() {
        return String::new();
    }

    let max_sentences = max_sentences.max(1);
    let sentences: Vec<&str> = tip
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if sentences.len() > max_sentences {
        format!("{}.", sentences[..max_sentences].join(". "))
    } else {
        tip.to_string()
    }
}
