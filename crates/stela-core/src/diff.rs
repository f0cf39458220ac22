//! Minimal text edits against a single leaf.
//!
//! A [`StringDiff`] is the unit an input surface reports: "replace this
//! span of the leaf with that text". Everything in this module works in
//! character offsets so that multi-byte content behaves the same as ASCII.

use serde::{Deserialize, Serialize};

/// Replace the half-open character span `[start, end)` of one leaf's text
/// with `text`.
///
/// Diffs are ephemeral: they describe an edit relative to a specific
/// version of the leaf and are either committed or discarded. Callers keep
/// `start <= end`; the constructors and transforms here never produce an
/// inverted span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringDiff {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl StringDiff {
    pub fn new(start: usize, end: usize, text: impl Into<String>) -> StringDiff {
        StringDiff { start, end, text: text.into() }
    }

    /// The replacement applied to `target`.
    pub fn apply(&self, target: &str) -> String {
        let start = byte_index(target, self.start);
        let end = byte_index(target, self.end.max(self.start));
        let mut out = String::with_capacity(target.len() + self.text.len());
        out.push_str(&target[..start]);
        out.push_str(&self.text);
        out.push_str(&target[end..]);
        out
    }

    /// Shrinks the diff to the minimal edit with the same net effect on
    /// `target`, trimming the longest shared prefix and suffix between the
    /// replaced span and the replacement. Returns `None` when nothing is
    /// left, meaning the diff was a no-op.
    ///
    /// ```
    /// use stela_core::StringDiff;
    ///
    /// let diff = StringDiff::new(0, 11, "hello earth");
    /// assert_eq!(
    ///     diff.normalize("hello world"),
    ///     Some(StringDiff::new(6, 11, "earth")),
    /// );
    /// ```
    pub fn normalize(&self, target: &str) -> Option<StringDiff> {
        let removed = char_slice(target, self.start, self.end);
        let removed_len = removed.chars().count();
        let text_len = self.text.chars().count();

        let prefix = common_prefix_len(removed, &self.text);
        // The suffix must not re-trim characters the prefix already claimed.
        let max_suffix = (removed_len - prefix).min(text_len - prefix);
        let suffix = common_suffix_len(removed, &self.text, max_suffix);

        let normalized = StringDiff {
            start: self.start + prefix,
            end: self.end - suffix,
            text: char_slice(&self.text, prefix, text_len - suffix).to_string(),
        };
        if normalized.start == normalized.end && normalized.text.is_empty() {
            None
        } else {
            Some(normalized)
        }
    }

    /// Combines this diff with `next`, where `next` is expressed against
    /// the text this diff produces, into one normalized diff against the
    /// original `target`. Returns `None` when the two cancel out.
    ///
    /// ```
    /// use stela_core::StringDiff;
    ///
    /// let first = StringDiff::new(1, 1, "X");
    /// let second = StringDiff::new(2, 2, "Y");
    /// let merged = first.merge("abc", &second).unwrap();
    ///
    /// assert_eq!(merged.apply("abc"), "aXYbc");
    /// ```
    pub fn merge(&self, target: &str, next: &StringDiff) -> Option<StringDiff> {
        let inserted = self.text.chars().count();
        let next_inserted = next.text.chars().count();

        let start = self.start.min(next.start);
        // How much of this diff's insertion `next` consumed.
        let overlap = (self.start + inserted).min(next.end).saturating_sub(next.start);
        let applied = next.apply(&self.apply(target));

        let tail = if self.start + inserted > next.end { next_inserted } else { 0 };
        let slice_end = (next.start + next_inserted)
            .max((self.start + inserted + tail).saturating_sub(overlap));
        let text = char_slice(&applied, start, slice_end).to_string();
        let end = self
            .end
            .max((next.end + self.end - self.start).saturating_sub(inserted));

        StringDiff { start, end, text }.normalize(target)
    }
}

/// Folds `diffs` over `target` left to right; each diff is expressed in the
/// coordinates produced by the ones before it.
pub fn apply_string_diffs(target: &str, diffs: &[StringDiff]) -> String {
    diffs
        .iter()
        .fold(target.to_string(), |text, diff| diff.apply(&text))
}

/// Byte position of the `char_index`-th character, clamped to the end.
pub(crate) fn byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map_or(s.len(), |(index, _)| index)
}

/// The substring covering the half-open character span `[start, end)`.
pub(crate) fn char_slice(s: &str, start: usize, end: usize) -> &str {
    let from = byte_index(s, start);
    let to = byte_index(s, end);
    if from <= to { &s[from..to] } else { "" }
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .count()
}

fn common_suffix_len(a: &str, b: &str, max: usize) -> usize {
    a.chars()
        .rev()
        .zip(b.chars().rev())
        .take(max)
        .take_while(|(x, y)| x == y)
        .count()
}
