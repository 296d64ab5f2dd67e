//! Range parsing
//!
//! Splits a comma-separated range specification into ordered tokens. Range
//! syntax itself is not checked here; the extractor rejects what it cannot
//! understand.

use std::collections::HashSet;

use super::types::{SplitError, ARTIFACT_EXTENSION, ARTIFACT_PREFIX};

/// One page-selection expression from the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeToken {
    /// Trimmed range text, passed verbatim to the extractor
    pub text: String,

    /// Filesystem-safe label, unique within one request
    pub label: String,
}

impl RangeToken {
    /// Output file name for this token (`pages_<label>.pdf`)
    pub fn output_file_name(&self) -> String {
        format!("{}{}{}", ARTIFACT_PREFIX, self.label, ARTIFACT_EXTENSION)
    }
}

/// Parse a raw range specification into ordered tokens.
///
/// A missing or blank specification is `MissingRanges`; one whose pieces are
/// all empty (`",,"`) is `NoPagesExtracted`.
pub fn parse_ranges(raw: Option<&str>) -> Result<Vec<RangeToken>, SplitError> {
    let raw = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return Err(SplitError::MissingRanges),
    };

    let mut seen = HashSet::new();
    let tokens: Vec<RangeToken> = raw
        .split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(|piece| {
            let label = unique_label(sanitize_label(piece), &mut seen);
            RangeToken {
                text: piece.to_string(),
                label,
            }
        })
        .collect();

    if tokens.is_empty() {
        return Err(SplitError::NoPagesExtracted);
    }

    Ok(tokens)
}

/// `1-3` -> `1_3`; whitespace dropped, anything else outside `[A-Za-z0-9_]` becomes `_`
pub fn sanitize_label(range: &str) -> String {
    range
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn unique_label(base: String, seen: &mut HashSet<String>) -> String {
    if seen.insert(base.clone()) {
        return base;
    }

    let mut n = 2;
    loop {
        let candidate = format!("{}_{}", base, n);
        if seen.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
