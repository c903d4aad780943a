//! Content classifier: independent detectors resolved by fixed precedence.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{ContentKind, DetectionResult};
use crate::{code, json, logs, table, text};

/// Classification outcome plus every detector's verdict, in precedence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub kind: ContentKind,
    pub reason: String,
    pub detections: Vec<(ContentKind, DetectionResult)>,
}

fn detector(kind: ContentKind) -> fn(&str) -> DetectionResult {
    match kind {
        ContentKind::Json => json::detect,
        ContentKind::Log => logs::detect,
        ContentKind::Code => code::detect,
        ContentKind::Csv => table::detect,
        ContentKind::Text | ContentKind::Empty => text::detect,
    }
}

/// Detectors after `Empty`, highest precedence first.
fn ordered_detectors() -> impl Iterator<Item = ContentKind> {
    ContentKind::PRECEDENCE.into_iter().filter(|k| *k != ContentKind::Empty)
}

/// First positive detector wins. Never fails; unmatched input is `Text`.
pub fn classify(text: &str) -> ContentKind {
    if text.trim().is_empty() {
        return ContentKind::Empty;
    }
    for kind in ordered_detectors() {
        let result = detector(kind)(text);
        if result.matched {
            debug!(kind = %kind, reason = %result.reason, "classified");
            return kind;
        }
    }
    ContentKind::Text
}

/// Run every detector and report all verdicts alongside the winning kind.
pub fn classify_with_report(text: &str) -> Classification {
    if text.trim().is_empty() {
        return Classification {
            kind: ContentKind::Empty,
            reason: "empty".into(),
            detections: Vec::new(),
        };
    }

    let detections: Vec<(ContentKind, DetectionResult)> = ordered_detectors()
        .map(|kind| (kind, detector(kind)(text)))
        .collect();
    let (kind, reason) = detections
        .iter()
        .find(|(_, d)| d.matched)
        .map(|(k, d)| (*k, d.reason.clone()))
        .unwrap_or((ContentKind::Text, "fallback".into()));

    debug!(kind = %kind, reason = %reason, "classified");
    Classification { kind, reason, detections }
}
