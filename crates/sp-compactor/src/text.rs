//! Prose fallback: optional title plus a capped "Key points" bullet list.

use crate::normalize::{char_len, collapse_whitespace};
use crate::types::{CompactOptions, CompressionResult, CompressionStats, ContentKind, DetectionResult};

/// Fallback detector. Always matches.
pub fn detect(_text: &str) -> DetectionResult {
    DetectionResult::hit("fallback")
}

pub fn compress(text: &str) -> CompressionResult {
    compress_with(text, &CompactOptions::default())
}

pub fn compress_with(text: &str, opts: &CompactOptions) -> CompressionResult {
    let raw = text.trim();
    if raw.is_empty() {
        return CompressionResult::empty();
    }

    let lines: Vec<&str> = raw.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let title = lines
        .first()
        .filter(|l| char_len(l) < opts.text_title_max_chars)
        .copied();
    let body = if title.is_some() { &lines[1..] } else { &lines[..] };

    let mut out: Vec<String> = Vec::new();
    if let Some(t) = title {
        out.push(t.to_string());
    }
    out.push("Key points:".into());
    out.extend(
        body.iter()
            .take(opts.text_max_bullets)
            .map(|l| format!("- {}", collapse_whitespace(l))),
    );

    let compressed = out.join("\n");
    let stats = CompressionStats {
        chars_in: char_len(raw),
        lines_in: Some(raw.lines().count()),
        chars_out: char_len(&compressed),
        lines_out: Some(out.len()),
        ..Default::default()
    };

    CompressionResult { detected_type: ContentKind::Text, compressed, stats, note: None }
}
