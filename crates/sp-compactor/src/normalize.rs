//! Input normalization: line endings, escaped newlines, blank-line runs.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static RE_MULTI_NEWLINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());
static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Character (code point) length. All size statistics use this measure.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Collapse internal whitespace runs to a single space and trim.
pub fn collapse_whitespace(line: &str) -> String {
    RE_WHITESPACE.replace_all(line.trim(), " ").into_owned()
}

/// Pasted blobs sometimes arrive string-escaped on a single line.
fn unescape_literal_newlines(text: &str) -> Option<String> {
    if text.contains('\n') || !text.contains("\\n") {
        return None;
    }
    // A JSON document legitimately carries `\n` inside its strings.
    if serde_json::from_str::<serde_json::Value>(text.trim()).is_ok() {
        return None;
    }
    Some(text.replace("\\r\\n", "\n").replace("\\n", "\n").replace("\\t", "\t"))
}

/// Normalize raw pasted text. Leading indentation is preserved.
pub fn normalize(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    let mut result = text.replace("\r\n", "\n").replace('\r', "\n");
    if let Some(unescaped) = unescape_literal_newlines(&result) {
        result = unescaped;
    }
    let result = result
        .lines()
        .map(|l| l.trim_end())
        .collect::<Vec<_>>()
        .join("\n");
    RE_MULTI_NEWLINE
        .replace_all(&result, "\n\n")
        .trim()
        .to_string()
}

/// Drop blank lines and lines whose whitespace-collapsed form was already
/// seen. First occurrence wins; order is preserved.
pub fn dedup_lines<'a, I>(lines: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for line in lines {
        let key = collapse_whitespace(line);
        if key.is_empty() || !seen.insert(key) {
            continue;
        }
        out.push(line);
    }
    out
}

/// Last `n` items of a slice (or all of it).
pub(crate) fn tail<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}
