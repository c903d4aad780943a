//! Log detection and traceback-focused reduction.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::normalize::{char_len, dedup_lines, tail};
use crate::types::{CompactOptions, CompressionResult, CompressionStats, ContentKind, DetectionResult};

static RE_TRACEBACK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)traceback \(most recent call last\):?").unwrap()
});
static RE_FILE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*File ".*", line \d+"#).unwrap()
});
static RE_JAVA_STACK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*at\s+[A-Za-z0-9_.$<>]+\(.*:\d+\)\s*$").unwrap()
});
static RE_EXC_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:[A-Za-z_][\w.]*)?(?:Error|Exception)\b").unwrap()
});
static RE_EXC_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:[A-Za-z_][\w.]*)?(?:Error|Exception)(?::|\s*$)").unwrap()
});
static RE_SEVERITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[\s\[|])(INFO|ERROR|WARN|WARNING|DEBUG|CRITICAL)(?:[:\]|]|\s|$)").unwrap()
});
static RE_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{4}-\d{2}-\d{2}[ T]\d{2}:\d{2}:\d{2}|\b\d{2}:\d{2}:\d{2}\b").unwrap()
});

/// Line prefixes that usually carry the cause of a failure.
const CAUSAL_PREFIXES: &[&str] = &["result =", "await", "raise", "import "];
const FRAMEWORK_MARKERS: &[&str] = &["Exception in ASGI application"];

pub const INFO_ONLY_NOTE: &str = "All lines were informational; nothing kept";

/// Stack-trace markers only (shared with the code detector).
pub fn has_stack_trace(text: &str) -> bool {
    RE_TRACEBACK.is_match(text) || RE_FILE_LINE.is_match(text) || RE_JAVA_STACK.is_match(text)
}

fn severity(line: &str) -> Option<&str> {
    RE_SEVERITY.captures(line).and_then(|c| c.get(1)).map(|m| m.as_str())
}

pub fn detect(text: &str) -> DetectionResult {
    let t = text.trim();
    if t.is_empty() {
        return DetectionResult::miss("empty");
    }

    if RE_TRACEBACK.is_match(t) {
        return DetectionResult::hit("TRACEBACK");
    }
    if RE_JAVA_STACK.is_match(t) {
        return DetectionResult::hit("JAVA_STACK");
    }
    if RE_FILE_LINE.is_match(t) && RE_EXC_NAME.is_match(t) {
        return DetectionResult::hit("FILE_LINE+EXCEPTION");
    }

    let level_lines = t.lines().filter(|ln| severity(ln).is_some()).count();
    if level_lines >= 2 {
        return DetectionResult::hit(format!("LOG_LEVEL_LINES:{}", level_lines));
    }
    if level_lines >= 1 && RE_TIMESTAMP.is_match(t) {
        return DetectionResult::hit("TIMESTAMP+LOG_LEVEL");
    }

    DetectionResult::miss("weak_signals")
}

fn starts_error_block(line: &str) -> bool {
    let low = line.to_lowercase();
    low.contains("traceback")
        || low.trim_start().starts_with("error:")
        || low.contains("exception in asgi")
}

fn is_essential(line: &str) -> bool {
    let trimmed = line.trim_start();
    FRAMEWORK_MARKERS.iter().any(|m| line.contains(m))
        || RE_TRACEBACK.is_match(line)
        || RE_FILE_LINE.is_match(line)
        || RE_JAVA_STACK.is_match(line)
        || RE_EXC_LINE.is_match(line)
        || CAUSAL_PREFIXES.iter().any(|p| trimmed.starts_with(p))
}

pub fn compress(text: &str) -> CompressionResult {
    compress_with(text, &CompactOptions::default())
}

/// Window to the first error block, drop INFO lines, keep the essentials
/// plus a trailing context tail, dedup.
pub fn compress_with(text: &str, opts: &CompactOptions) -> CompressionResult {
    let raw = text.trim();
    if raw.is_empty() {
        return CompressionResult::empty();
    }

    let lines: Vec<&str> = raw.lines().collect();
    let start = lines.iter().position(|ln| starts_error_block(ln)).unwrap_or(0);
    let filtered: Vec<&str> = lines[start..]
        .iter()
        .copied()
        .filter(|ln| severity(ln) != Some("INFO"))
        .collect();

    let essentials = filtered.iter().copied().filter(|ln| is_essential(ln));
    let context = tail(&filtered, opts.log_tail_lines).iter().copied();
    let out = dedup_lines(essentials.chain(context));

    let compressed = out.join("\n").trim().to_string();
    let stats = CompressionStats {
        chars_in: char_len(raw),
        lines_in: Some(lines.len()),
        chars_out: char_len(&compressed),
        lines_out: Some(out.len()),
        ..Default::default()
    };
    debug!(window_start = start, lines_in = lines.len(), lines_out = out.len(), "log compressed");

    let info_only = filtered.iter().all(|ln| ln.trim().is_empty());
    let note = (compressed.is_empty() && info_only).then(|| INFO_ONLY_NOTE.to_string());
    CompressionResult { detected_type: ContentKind::Log, compressed, stats, note }
}
