//! Label sheet parsing.
//!
//! Each video's work list is a CSV with a header row. The `name` column holds
//! the expected label and the `frame` column the nominal absolute frame; any
//! other columns are ignored. The name vocabulary is the sorted set of
//! distinct non-empty names.

use std::collections::BTreeSet;

use crate::contract::Task;
use crate::error::CoreError;
use crate::types::AbsoluteFrame;

/// Tasks and name vocabulary read from a label sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSheet {
    pub tasks: Vec<Task>,
    pub names: Vec<String>,
}

/// Parse a label CSV.
///
/// Frames that do not parse as a number become `0`. Fractional frames are
/// truncated. Blank lines are skipped.
pub fn parse_label_csv(text: &str) -> Result<LabelSheet, CoreError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.lines();

    let header_line = lines
        .next()
        .ok_or_else(|| CoreError::Validation("CSV is empty".into()))?;
    let headers: Vec<String> = parse_csv_line(header_line)
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();

    let name_col = headers.iter().position(|h| h == "name");
    let frame_col = headers.iter().position(|h| h == "frame");

    let mut tasks = Vec::new();
    let mut names = BTreeSet::new();

    for (row, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let values = parse_csv_line(line);
        let field = |col: Option<usize>| {
            col.and_then(|i| values.get(i))
                .map(|v| v.trim())
                .unwrap_or("")
        };

        let name = field(name_col).to_string();
        let raw_frame = field(frame_col);
        let frame = parse_frame(raw_frame).unwrap_or_else(|| {
            tracing::warn!(
                row = row + 2,
                name = %name,
                frame = %raw_frame,
                "Label frame is not a frame number, using 0"
            );
            0
        });

        if !name.is_empty() {
            names.insert(name.clone());
        }
        tasks.push(Task { name, frame });
    }

    Ok(LabelSheet {
        tasks,
        names: names.into_iter().collect(),
    })
}

/// A non-negative frame number. Fractions are truncated. Anything else,
/// negative values included, is `None`.
fn parse_frame(value: &str) -> Option<AbsoluteFrame> {
    if let Ok(frame) = value.parse::<AbsoluteFrame>() {
        return Some(frame);
    }
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 && f < AbsoluteFrame::MAX as f64 => {
            Some(f as AbsoluteFrame)
        }
        _ => None,
    }
}

/// Split one CSV line, honouring double-quoted fields and `""` escapes.
fn parse_csv_line(line: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == ',' {
            result.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    result.push(current);
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
