//! Smart-prompt compactor: content-aware reduction of pasted text.
//!
//! Stages:
//! 1. Normalize (line endings, escaped newlines, blank runs)
//! 2. Classify: JSON > Log > Code > CSV > Text, first match wins
//! 3. Compress with the matching type-specific reducer
//! 4. Guard: output is never larger than the input

pub mod classify;
pub mod code;
pub mod guard;
pub mod json;
pub mod logs;
pub mod normalize;
pub mod pipeline;
pub mod table;
pub mod text;
pub mod types;

pub use classify::{classify, classify_with_report, Classification};
pub use pipeline::CompactorPipeline;
pub use types::{CompactOptions, CompressionResult, CompressionStats, ContentKind, DetectionResult};

/// Classify and compress with default options.
pub fn compress(text: &str) -> CompressionResult {
    CompactorPipeline::default().compress(text)
}
