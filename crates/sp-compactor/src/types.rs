use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Content category assigned to an input blob. Exactly one per input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Empty,
    Json,
    Log,
    Code,
    Csv,
    Text,
}

impl ContentKind {
    /// Detection precedence, highest first. `Text` is the fallback.
    pub const PRECEDENCE: [ContentKind; 6] = [
        ContentKind::Empty,
        ContentKind::Json,
        ContentKind::Log,
        ContentKind::Code,
        ContentKind::Csv,
        ContentKind::Text,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Json => "json",
            Self::Log => "log",
            Self::Code => "code",
            Self::Csv => "csv",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "empty" => Ok(Self::Empty),
            "json" | "data" => Ok(Self::Json),
            "log" | "logs" => Ok(Self::Log),
            "code" => Ok(Self::Code),
            "csv" => Ok(Self::Csv),
            "text" => Ok(Self::Text),
            _ => Err(format!("Invalid content kind: {}", s)),
        }
    }
}

/// Outcome of a single detector: match flag plus a diagnostic tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub matched: bool,
    pub reason: String,
}

impl DetectionResult {
    pub fn hit(reason: impl Into<String>) -> Self {
        Self { matched: true, reason: reason.into() }
    }

    pub fn miss(reason: impl Into<String>) -> Self {
        Self { matched: false, reason: reason.into() }
    }
}

/// Size statistics. Lengths are in characters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionStats {
    pub chars_in: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines_in: Option<usize>,
    pub chars_out: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines_out: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_count: Option<usize>,
}

/// Compression result with statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionResult {
    pub detected_type: ContentKind,
    pub compressed: String,
    pub stats: CompressionStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CompressionResult {
    /// Result for blank input, shared by every compressor.
    pub fn empty() -> Self {
        Self {
            detected_type: ContentKind::Empty,
            compressed: String::new(),
            stats: CompressionStats::default(),
            note: None,
        }
    }

    /// The input returned as-is, with an explanation.
    pub fn passthrough(kind: ContentKind, raw: &str, note: impl Into<String>) -> Self {
        let chars = crate::normalize::char_len(raw);
        Self {
            detected_type: kind,
            compressed: raw.to_string(),
            stats: CompressionStats { chars_in: chars, chars_out: chars, ..Default::default() },
            note: Some(note.into()),
        }
    }

    pub fn ratio(&self) -> f64 {
        if self.stats.chars_in == 0 { return 1.0; }
        self.stats.chars_out as f64 / self.stats.chars_in as f64
    }

    pub fn reduction_pct(&self) -> f64 {
        if self.stats.chars_in == 0 { return 0.0; }
        (1.0 - self.ratio()) * 100.0
    }
}

/// Tunables for the compressors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompactOptions {
    /// Keys kept per JSON object.
    pub json_max_keys: usize,
    /// Nesting depth kept before values collapse to `"..."`.
    pub json_max_depth: usize,
    pub log_tail_lines: usize,
    pub code_tail_lines: usize,
    /// Data rows kept from each end of a CSV table.
    pub csv_sample_rows: usize,
    pub text_max_bullets: usize,
    pub text_title_max_chars: usize,
}

impl Default for CompactOptions {
    fn default() -> Self {
        Self {
            json_max_keys: 8,
            json_max_depth: 2,
            log_tail_lines: 10,
            code_tail_lines: 10,
            csv_sample_rows: 3,
            text_max_bullets: 12,
            text_title_max_chars: 80,
        }
    }
}
