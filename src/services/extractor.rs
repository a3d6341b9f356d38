// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

//! Pulls the commit message out of free-form model output.
//!
//! Marker matching is literal. When the model ignores the requested format
//! the line heuristic is best-effort only.

/// Returned when nothing usable was found. Not a real commit subject.
pub const UPDATE_SENTINEL: &str = "update";

/// Recognised markers, highest priority first. The bold forms must precede the
/// plain one, and the plain one must precede its `Commit Message:` suffix.
pub const MARKERS: &[&str] = &[
    "**Generated Commit Message:**",
    "**Generated Commit Message**:",
    "Generated Commit Message:",
    "Commit Message:",
];

/// Marker text without decoration. A line that is only this is a label, not
/// a subject.
const MARKER_STEMS: &[&str] = &["generated commit message", "commit message"];

const MIN_HEURISTIC_CHARS: usize = 10;
const MAX_HEURISTIC_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    Marker(&'static str),
    Heuristic,
    Sentinel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub message: String,
    pub source: ExtractionSource,
}

impl Extraction {
    pub fn is_sentinel(&self) -> bool {
        self.source == ExtractionSource::Sentinel
    }
}

/// Commit message for `raw`. Never fails; see [`UPDATE_SENTINEL`].
pub fn extract(raw: &str) -> String {
    extract_detailed(raw).message
}

pub fn is_sentinel(message: &str) -> bool {
    message == UPDATE_SENTINEL
}

pub fn extract_detailed(raw: &str) -> Extraction {
    if let Some((marker, message)) = after_marker(raw) {
        return Extraction {
            message,
            source: ExtractionSource::Marker(marker),
        };
    }

    if let Some(line) = plausible_line(raw) {
        return Extraction {
            message: line,
            source: ExtractionSource::Heuristic,
        };
    }

    Extraction {
        message: UPDATE_SENTINEL.to_string(),
        source: ExtractionSource::Sentinel,
    }
}

fn after_marker(raw: &str) -> Option<(&'static str, String)> {
    let marker = MARKERS.iter().copied().find(|m| raw.contains(m))?;
    let pos = raw.find(marker)?;
    let rest = raw[pos + marker.len()..].trim();

    if rest.is_empty() {
        None
    } else {
        Some((marker, rest.to_string()))
    }
}

fn plausible_line(raw: &str) -> Option<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .find(|line| {
            let len = line.chars().count();
            len > MIN_HEURISTIC_CHARS
                && len < MAX_HEURISTIC_CHARS
                && !line.starts_with('#')
                && !line.starts_with("```")
                && !is_marker_label(line)
        })
        .map(str::to_string)
}

fn is_marker_label(line: &str) -> bool {
    let bare = line
        .trim_matches(|c: char| matches!(c, '*' | '_' | ':' | '`') || c.is_whitespace())
        .to_lowercase();
    MARKER_STEMS.contains(&bare.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_marker_wins_over_plain() {
        let raw = "**Generated Commit Message:**\nAdd retry to uploader";
        let extraction = extract_detailed(raw);
        assert_eq!(extraction.message, "Add retry to uploader");
        assert_eq!(
            extraction.source,
            ExtractionSource::Marker("**Generated Commit Message:**")
        );
    }

    #[test]
    fn bold_label_with_trailing_colon_is_a_marker() {
        let raw = "**Generated Commit Message**:\n\nAdd retry to uploader";
        let extraction = extract_detailed(raw);
        assert_eq!(extraction.message, "Add retry to uploader");
        assert_eq!(
            extraction.source,
            ExtractionSource::Marker("**Generated Commit Message**:")
        );
    }

    #[test]
    fn decorated_label_is_never_the_subject() {
        for label in [
            "**Generated Commit Message**",
            "__Generated Commit Message__:",
            "GENERATED COMMIT MESSAGE",
            "**Commit Message**",
        ] {
            let raw = format!("{label}\nAdd retry to uploader");
            assert_eq!(extract(&raw), "Add retry to uploader", "label: {label}");
        }
        assert!(!is_marker_label("Fix commit message parsing"));
    }

    #[test]
    fn empty_marker_tail_falls_through_to_heuristic() {
        let raw = "Refactor the config loader\nGenerated Commit Message:\n\n";
        let extraction = extract_detailed(raw);
        assert_eq!(extraction.message, "Refactor the config loader");
        assert_eq!(extraction.source, ExtractionSource::Heuristic);
    }

    #[test]
    fn length_bounds_are_exclusive() {
        // exactly 10 and exactly 100 characters are both rejected
        let ten = "a".repeat(10);
        let hundred = "b".repeat(100);
        let raw = format!("{ten}\n{hundred}");
        assert!(extract_detailed(&raw).is_sentinel());

        let eleven = "c".repeat(11);
        assert_eq!(extract(&eleven), eleven);
    }
}
