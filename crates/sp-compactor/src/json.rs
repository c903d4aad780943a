//! JSON detection and structural summarization.

use serde_json::{Map, Value};
use tracing::debug;

use crate::normalize::char_len;
use crate::types::{CompactOptions, CompressionResult, CompressionStats, ContentKind, DetectionResult};

const ELLIPSIS: &str = "...";

/// Matches only a bracket-wrapped document that parses. No partial-JSON heuristics.
pub fn detect(text: &str) -> DetectionResult {
    let t = text.trim();
    if t.is_empty() {
        return DetectionResult::miss("empty");
    }
    let wrapped = (t.starts_with('{') && t.ends_with('}')) || (t.starts_with('[') && t.ends_with(']'));
    if !wrapped {
        return DetectionResult::miss("missing_wrappers");
    }
    match serde_json::from_str::<Value>(t) {
        Ok(_) => DetectionResult::hit("valid_json_parse"),
        Err(_) => DetectionResult::miss("invalid_json_parse"),
    }
}

/// Distinct sample indices: first, middle, last.
fn sample_indices(n: usize) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }
    let mut idx = vec![0, n / 2, n - 1];
    idx.dedup();
    idx
}

/// Recursively summarize a value. Anything nested past the depth cap,
/// scalar or container, collapses to `"..."`.
pub fn summarize(value: &Value, depth: usize, opts: &CompactOptions) -> Value {
    if depth > opts.json_max_depth {
        return Value::String(ELLIPSIS.into());
    }
    match value {
        Value::Object(map) => {
            let mut out = Map::new();
            for (k, v) in map.iter().take(opts.json_max_keys) {
                out.insert(k.clone(), summarize(v, depth + 1, opts));
            }
            let extra = map.len() - out.len();
            if extra > 0 {
                out.insert("_more_keys".into(), Value::from(extra));
            }
            Value::Object(out)
        }
        Value::Array(items) => {
            let samples: Vec<Value> = sample_indices(items.len())
                .into_iter()
                .map(|i| summarize(&items[i], depth + 1, opts))
                .collect();
            let mut out = Map::new();
            out.insert("_type".into(), Value::from("list"));
            out.insert("count".into(), Value::from(items.len()));
            out.insert("samples".into(), Value::Array(samples));
            Value::Object(out)
        }
        other => other.clone(),
    }
}

pub fn compress(text: &str) -> CompressionResult {
    compress_with(text, &CompactOptions::default())
}

/// Summarize and serialize compactly; the original comes back whenever the
/// summary is not strictly smaller.
pub fn compress_with(text: &str, opts: &CompactOptions) -> CompressionResult {
    let raw = text.trim();
    if raw.is_empty() {
        return CompressionResult::empty();
    }
    let chars_in = char_len(raw);

    let value = match serde_json::from_str::<Value>(raw) {
        Ok(v) => v,
        Err(e) => {
            debug!(error = %e, "json parse failed");
            return CompressionResult::passthrough(ContentKind::Json, raw, "Not compressed (parse failed)");
        }
    };

    let compressed = match serde_json::to_string(&summarize(&value, 0, opts)) {
        Ok(s) => s,
        Err(e) => {
            debug!(error = %e, "json serialize failed");
            return CompressionResult::passthrough(ContentKind::Json, raw, "Not compressed (serialize failed)");
        }
    };

    let chars_out = char_len(&compressed);
    if chars_out >= chars_in {
        return CompressionResult::passthrough(ContentKind::Json, raw, "Not compressed (would increase size)");
    }

    CompressionResult {
        detected_type: ContentKind::Json,
        compressed,
        stats: CompressionStats { chars_in, chars_out, ..Default::default() },
        note: None,
    }
}
