//! Size-safety guard: compression never returns more characters than it got.

use tracing::debug;

use crate::normalize::char_len;
use crate::types::CompressionResult;

pub const SKIPPED_NOTE: &str = "Not compressed (output would not be smaller than input)";

/// Revert to `original` when the compressed text is not strictly smaller.
/// An empty compressed text is left alone.
pub fn enforce(mut result: CompressionResult, original: &str) -> CompressionResult {
    let original_len = char_len(original);
    let compressed_len = char_len(&result.compressed);

    if result.compressed.is_empty() || compressed_len < original_len {
        result.stats.chars_in = original_len;
        result.stats.chars_out = compressed_len;
        return result;
    }

    debug!(
        kind = %result.detected_type,
        original_len,
        compressed_len,
        "compression skipped, returning original"
    );
    result.compressed = original.to_string();
    result.stats.chars_in = original_len;
    result.stats.chars_out = original_len;
    if result.stats.lines_in.is_some() {
        result.stats.lines_out = result.stats.lines_in;
    }
    if result.note.is_none() {
        result.note = Some(SKIPPED_NOTE.to_string());
    }
    result
}
