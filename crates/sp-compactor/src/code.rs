//! Source-code detection and skeleton extraction.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use tracing::debug;

use crate::logs::has_stack_trace;
use crate::normalize::{char_len, dedup_lines};
use crate::types::{CompactOptions, CompressionResult, CompressionStats, ContentKind, DetectionResult};

/// Language-family markers strong enough to count on their own.
static STRONG_SIGNALS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b(def|class)\b",
        r"\b(import|from)\b",
        r"\b(return|yield|raise)\b",
        r"\b(async|await|lambda)\b",
        r"\b(function|const|let|var)\b",
        r"#include\s*<",
        r"\b(public|private|protected|static|void|new)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Broader signals, including punctuation density markers.
static WEAK_SIGNALS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b(def|class|import|from|return|async|await|lambda)\b",
        r"[{};]",
        r"==|!=|<=|>=|->|=>",
        r"\b(function|const|let|var)\b|=>",
        r"#include\s*<",
        r"\b(public|private|protected|static|void|new)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static RE_PARA_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][a-z].*[a-z][.!?]$").unwrap()
});
static RE_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:import\s|from\s+\S+\s+import\b|use\s|#include\b|using\s|require\()").unwrap()
});
static RE_DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:export\s+)?(?:pub(?:\([^)]*\))?\s+)?(?:async\s+)?(?:def|class|function|fn|func|struct|enum|trait|impl|interface)\b",
    )
    .unwrap()
});
static RE_EXIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(?:return|raise|throw)\b").unwrap());
static RE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Error|Exception|Traceback|TODO|FIXME").unwrap()
});

const FENCE: &str = "```";
const SYMBOLS: &str = "{}();[]=<>";
const SYMBOL_RATIO_MIN: f64 = 0.02;
const PARAGRAPH_RATIO_MAX: f64 = 0.7;

pub fn detect(text: &str) -> DetectionResult {
    let t = text.trim();
    if t.is_empty() {
        return DetectionResult::miss("empty");
    }

    if t.to_lowercase().contains("traceback") || has_stack_trace(t) {
        return DetectionResult::miss("looks_like_logs");
    }

    if t.contains(FENCE) {
        return DetectionResult::hit("FENCED_BLOCK");
    }

    let lines: Vec<&str> = t.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let para_like = lines.iter().filter(|l| RE_PARA_LINE.is_match(l)).count();
    if para_like as f64 / lines.len() as f64 > PARAGRAPH_RATIO_MAX {
        return DetectionResult::miss("mostly_paragraph_lines");
    }

    let strong = STRONG_SIGNALS.iter().filter(|re| re.is_match(t)).count();
    let weak = WEAK_SIGNALS.iter().filter(|re| re.is_match(t)).count();
    let symbols = t.chars().filter(|c| SYMBOLS.contains(*c)).count();
    let ratio = symbols as f64 / char_len(t).max(1) as f64;

    if strong >= 2 {
        return DetectionResult::hit(format!("STRONG_SIGNALS:{}", strong));
    }
    if strong >= 1 && ratio > SYMBOL_RATIO_MIN && weak >= 2 {
        return DetectionResult::hit(format!("STRONG+SYMBOL_RATIO:{:.3}", ratio));
    }

    DetectionResult::miss("weak_signals")
}

fn is_structural(line: &str) -> bool {
    RE_IMPORT.is_match(line)
        || RE_DEFINITION.is_match(line)
        || RE_EXIT.is_match(line)
        || RE_MARKER.is_match(line)
}

pub fn compress(text: &str) -> CompressionResult {
    compress_with(text, &CompactOptions::default())
}

/// Keep imports, definitions, exits and error markers plus a trailing
/// context tail, in their original order.
pub fn compress_with(text: &str, opts: &CompactOptions) -> CompressionResult {
    let raw = text.trim();
    if raw.is_empty() {
        return CompressionResult::empty();
    }

    let lines: Vec<&str> = raw.lines().collect();
    let non_blank: Vec<usize> = (0..lines.len()).filter(|&i| !lines[i].trim().is_empty()).collect();

    let mut keep: BTreeSet<usize> = non_blank.iter().copied().filter(|&i| is_structural(lines[i])).collect();
    keep.extend(non_blank.iter().rev().take(opts.code_tail_lines).copied());

    let out = dedup_lines(keep.into_iter().map(|i| lines[i]));
    let compressed = out.join("\n").trim().to_string();
    let stats = CompressionStats {
        chars_in: char_len(raw),
        lines_in: Some(lines.len()),
        chars_out: char_len(&compressed),
        lines_out: Some(out.len()),
        ..Default::default()
    };
    debug!(lines_in = lines.len(), lines_out = out.len(), "code compressed");

    CompressionResult { detected_type: ContentKind::Code, compressed, stats, note: None }
}
