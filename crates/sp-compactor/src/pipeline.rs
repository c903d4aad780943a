//! Compaction pipeline: normalize, classify, dispatch, guard.

use tracing::debug;

use crate::classify::{self, Classification};
use crate::normalize::normalize;
use crate::types::{CompactOptions, CompressionResult, ContentKind};
use crate::{code, guard, json, logs, table, text};

/// The main compactor pipeline. Stateless apart from its options, so one
/// instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct CompactorPipeline {
    pub options: CompactOptions,
}

impl CompactorPipeline {
    pub fn new(options: CompactOptions) -> Self {
        Self { options }
    }

    /// Classify and compress raw text.
    pub fn compress(&self, raw: &str) -> CompressionResult {
        let normalized = normalize(raw);
        let kind = classify::classify(&normalized);
        self.run(kind, &normalized)
    }

    /// Compress with a caller-chosen compressor, skipping classification.
    pub fn compress_as(&self, kind: ContentKind, raw: &str) -> CompressionResult {
        let normalized = normalize(raw);
        if normalized.is_empty() {
            return CompressionResult::empty();
        }
        self.run(kind, &normalized)
    }

    /// Like [`compress`](Self::compress), also returning the detector report.
    pub fn compress_with_report(&self, raw: &str) -> (CompressionResult, Classification) {
        let normalized = normalize(raw);
        let report = classify::classify_with_report(&normalized);
        (self.run(report.kind, &normalized), report)
    }

    fn run(&self, kind: ContentKind, normalized: &str) -> CompressionResult {
        let opts = &self.options;
        let result = match kind {
            ContentKind::Empty => return CompressionResult::empty(),
            ContentKind::Json => json::compress_with(normalized, opts),
            ContentKind::Log => logs::compress_with(normalized, opts),
            ContentKind::Code => code::compress_with(normalized, opts),
            ContentKind::Csv => table::compress_with(normalized, opts),
            ContentKind::Text => text::compress_with(normalized, opts),
        };
        let result = guard::enforce(result, normalized);
        debug!(
            kind = %result.detected_type,
            chars_in = result.stats.chars_in,
            chars_out = result.stats.chars_out,
            skipped = result.note.is_some(),
            "compressed"
        );
        result
    }
}
