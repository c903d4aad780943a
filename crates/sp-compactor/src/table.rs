//! Delimited-table (CSV/TSV/PSV) detection and head/tail row sampling.

use anyhow::{Context, Result};
use std::collections::HashMap;
use tracing::debug;

use crate::normalize::char_len;
use crate::types::{CompactOptions, CompressionResult, CompressionStats, ContentKind, DetectionResult};

/// Candidate delimiters, in tie-break priority.
pub const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];
const SNIFF_LINES: usize = 20;
const PROSE_LINE_CHARS: usize = 90;
const FALLBACK_HEAD_LINES: usize = 6;

fn count_unquoted(line: &str, delim: char) -> usize {
    let mut in_quotes = false;
    let mut n = 0;
    for c in line.chars() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if c == delim && !in_quotes {
            n += 1;
        }
    }
    n
}

/// Pick the delimiter whose per-line count is most consistent across the
/// sample. `None` when no candidate shows up on at least two lines.
pub fn sniff_delimiter(lines: &[&str]) -> Option<u8> {
    let mut best: Option<(usize, u8)> = None;
    for &d in &DELIMITERS {
        let mut freq: HashMap<usize, usize> = HashMap::new();
        for line in lines {
            let c = count_unquoted(line, d as char);
            if c > 0 {
                *freq.entry(c).or_default() += 1;
            }
        }
        let score = freq.values().copied().max().unwrap_or(0);
        if score >= 2 && best.map_or(true, |(s, _)| score > s) {
            best = Some((score, d));
        }
    }
    best.map(|(_, d)| d)
}

/// Parse delimited text into rows, dropping rows whose cells are all blank.
pub fn parse_rows(text: &str, delimiter: u8) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("malformed delimited record")?;
        let row: Vec<String> = record.iter().map(str::to_string).collect();
        if row.iter().any(|c| !c.trim().is_empty()) {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn write_rows(rows: &[Vec<String>], delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for row in rows {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing delimited output: {}", e.error()))?;
    Ok(String::from_utf8(bytes)?.trim_end().to_string())
}

fn non_blank_lines(raw: &str) -> Vec<&str> {
    raw.lines().filter(|l| !l.trim().is_empty()).collect()
}

pub fn detect(text: &str) -> DetectionResult {
    let raw = text.trim();
    if raw.is_empty() {
        return DetectionResult::miss("empty");
    }

    let lines = non_blank_lines(raw);
    if lines.len() < 3 {
        return DetectionResult::miss("need_at_least_3_lines");
    }

    let sentencey = lines
        .iter()
        .filter(|l| char_len(l) > PROSE_LINE_CHARS && l.contains('.'))
        .count();
    if sentencey >= (lines.len() / 2).max(2) {
        return DetectionResult::miss("looks_like_paragraph_text");
    }

    let sample_lines = &lines[..lines.len().min(SNIFF_LINES)];
    let Some(delimiter) = sniff_delimiter(sample_lines) else {
        return DetectionResult::miss("sniffer_failed");
    };

    let rows = match parse_rows(&sample_lines.join("\n"), delimiter) {
        Ok(rows) => rows,
        Err(_) => return DetectionResult::miss("csv_parse_failed"),
    };
    if rows.len() < 2 {
        return DetectionResult::miss("not_enough_rows");
    }

    let widths: Vec<usize> = rows.iter().map(Vec::len).collect();
    let min = widths.iter().copied().min().unwrap_or(0);
    let max = widths.iter().copied().max().unwrap_or(0);
    if min < 2 {
        return DetectionResult::miss("too_few_columns");
    }
    if max - min > 1 {
        return DetectionResult::miss("inconsistent_columns");
    }

    DetectionResult::hit(format!("dialect_delimiter:{:?}", delimiter as char))
}

/// First line, up to five following lines, and the last line.
fn line_sample(raw: &str, note: &str) -> CompressionResult {
    let lines: Vec<&str> = raw.lines().collect();
    let mut out: Vec<&str> = lines.iter().take(FALLBACK_HEAD_LINES).copied().collect();
    if lines.len() > FALLBACK_HEAD_LINES {
        out.extend(lines.last().copied());
    }
    let compressed = out.join("\n");
    CompressionResult {
        detected_type: ContentKind::Csv,
        stats: CompressionStats {
            chars_in: char_len(raw),
            lines_in: Some(lines.len()),
            chars_out: char_len(&compressed),
            lines_out: Some(out.len()),
            ..Default::default()
        },
        compressed,
        note: Some(note.to_string()),
    }
}

fn sample_table(header: &[String], data: &[Vec<String>], keep: usize) -> Vec<Vec<String>> {
    let mut out = vec![header.to_vec()];
    if data.len() > keep * 2 {
        let omitted = data.len() - keep * 2;
        out.extend_from_slice(&data[..keep]);
        let mut marker = vec![String::new(); header.len().max(1)];
        marker[0] = format!("... ({} rows omitted)", omitted);
        out.push(marker);
        out.extend_from_slice(&data[data.len() - keep..]);
    } else {
        out.extend_from_slice(data);
    }
    out
}

pub fn compress(text: &str) -> CompressionResult {
    compress_with(text, &CompactOptions::default())
}

/// Keep the header plus `csv_sample_rows` rows from each end, re-serialized
/// with the sniffed delimiter so the output still parses.
pub fn compress_with(text: &str, opts: &CompactOptions) -> CompressionResult {
    let raw = text.trim();
    if raw.is_empty() {
        return CompressionResult::empty();
    }

    let lines = non_blank_lines(raw);
    let Some(delimiter) = sniff_delimiter(&lines[..lines.len().min(SNIFF_LINES)]) else {
        debug!("delimiter sniffing failed, sampling lines");
        return line_sample(raw, "Not compressed as table (delimiter not found); line sample kept");
    };

    let rows = match parse_rows(raw, delimiter) {
        Ok(rows) => rows,
        Err(e) => {
            debug!(error = %e, "table parse failed, sampling lines");
            return line_sample(raw, "Not compressed as table (parse failed); line sample kept");
        }
    };
    let (header, data) = match rows.split_first() {
        Some((header, data)) if !data.is_empty() => (header, data),
        _ => return CompressionResult::passthrough(ContentKind::Csv, raw, "Not compressed (too few rows)"),
    };

    let sampled = sample_table(header, data, opts.csv_sample_rows);
    let compressed = match write_rows(&sampled, delimiter) {
        Ok(s) => s,
        Err(e) => {
            debug!(error = %e, "table serialize failed, sampling lines");
            return line_sample(raw, "Not compressed as table (serialize failed); line sample kept");
        }
    };

    let stats = CompressionStats {
        chars_in: char_len(raw),
        lines_in: Some(raw.lines().count()),
        chars_out: char_len(&compressed),
        lines_out: Some(sampled.len()),
        row_count: Some(data.len()),
        column_count: Some(header.len()),
    };
    debug!(rows = data.len(), kept = sampled.len() - 1, delimiter = %(delimiter as char), "table compressed");

    CompressionResult { detected_type: ContentKind::Csv, compressed, stats, note: None }
}
