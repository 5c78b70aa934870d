//! Case-insensitive match scoring. Lower scores rank first.

/// Score for a label equal to the search text.
pub const EXACT_MATCH_SCORE: i64 = -1000;
/// Base score for subsequence-only matches, above any substring index.
pub const SUBSEQUENCE_BASE_SCORE: i64 = 1000;
const GAP_WEIGHT: i64 = 10;

/// Whether every character of `pattern` appears in `label` in order.
pub fn fuzzy_matches(label: &str, pattern: &str) -> bool {
    let pattern = pattern.to_lowercase();
    let mut remaining = pattern.chars().peekable();
    for ch in label.to_lowercase().chars() {
        if remaining.peek() == Some(&ch) {
            remaining.next();
        }
    }
    remaining.peek().is_none()
}

/// Ranks `label` against `pattern`; `None` when it does not match at all.
///
/// - exact match: [`EXACT_MATCH_SCORE`]
/// - substring: character index of the first occurrence
/// - subsequence: [`SUBSEQUENCE_BASE_SCORE`] plus ten per skipped character
///   between consecutive matched characters
pub fn match_score(label: &str, pattern: &str) -> Option<i64> {
    let label = label.to_lowercase();
    let pattern = pattern.to_lowercase();

    if label == pattern {
        return Some(EXACT_MATCH_SCORE);
    }
    if let Some(byte_index) = label.find(pattern.as_str()) {
        return Some(label[..byte_index].chars().count() as i64);
    }

    let pattern = pattern.chars().collect::<Vec<_>>();
    let mut matched = 0usize;
    let mut last: Option<usize> = None;
    let mut score = SUBSEQUENCE_BASE_SCORE;
    for (index, ch) in label.chars().enumerate() {
        if matched == pattern.len() {
            break;
        }
        if ch != pattern[matched] {
            continue;
        }
        if let Some(previous) = last {
            score += (index - previous - 1) as i64 * GAP_WEIGHT;
        }
        last = Some(index);
        matched += 1;
    }

    (matched == pattern.len()).then_some(score)
}
