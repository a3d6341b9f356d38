// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use gitcomm::services::extractor::{
    ExtractionSource, UPDATE_SENTINEL, extract, extract_detailed, is_sentinel,
};
use proptest::prelude::*;

// ─── Marker extraction ────────────────────────────────────────────────────────

#[test]
fn marker_on_its_own_line() {
    let raw = "Generated Commit Message:\nFix foo typo";
    insta::assert_snapshot!(extract(raw), @"Fix foo typo");
}

#[test]
fn marker_after_preamble_and_blank_line() {
    let raw = "Sure! I looked at the diff.\n\nGenerated Commit Message:\n\nAdd retry to HTTP client\n\n";
    insta::assert_snapshot!(extract(raw), @"Add retry to HTTP client");
}

#[test]
fn marker_inline_with_message() {
    let raw = "Generated Commit Message: Update README installation steps";
    insta::assert_snapshot!(extract(raw), @"Update README installation steps");
}

#[test]
fn multi_line_body_is_preserved() {
    let raw = "Generated Commit Message:\n\nAdd config loader\n\n- read ~/.gitcomm/config.json\n- merge env vars\n";
    assert_eq!(
        extract(raw),
        "Add config loader\n\n- read ~/.gitcomm/config.json\n- merge env vars"
    );
}

#[test]
fn first_occurrence_wins() {
    let raw = "Generated Commit Message:\nFirst\nGenerated Commit Message:\nSecond";
    assert_eq!(extract(raw), "First\nGenerated Commit Message:\nSecond");
}

#[test]
fn bold_marker_is_not_left_with_asterisks() {
    let raw = "**Generated Commit Message:**\n\nRename flag to --all";
    let extraction = extract_detailed(raw);
    insta::assert_snapshot!(extraction.message, @"Rename flag to --all");
    assert_eq!(
        extraction.source,
        ExtractionSource::Marker("**Generated Commit Message:**")
    );
}

#[test]
fn shorter_marker_is_recognised() {
    let raw = "Commit Message:\nDrop unused imports";
    let extraction = extract_detailed(raw);
    assert_eq!(extraction.message, "Drop unused imports");
    assert_eq!(extraction.source, ExtractionSource::Marker("Commit Message:"));
}

// ─── Heuristic fallback ───────────────────────────────────────────────────────

#[test]
fn no_marker_uses_first_plausible_line() {
    let raw = "## Summary\n```\nok\n```\nImprove error messages for missing keys\nMore text here that also qualifies";
    let extraction = extract_detailed(raw);
    insta::assert_snapshot!(extraction.message, @"Improve error messages for missing keys");
    assert_eq!(extraction.source, ExtractionSource::Heuristic);
}

#[test]
fn heuristic_skips_short_and_long_lines() {
    let long = "x".repeat(120);
    let raw = format!("short\n{long}\n   Trim surrounding whitespace   \n");
    assert_eq!(extract(&raw), "Trim surrounding whitespace");
}

#[test]
fn heuristic_skips_headings_and_fences() {
    let raw = "# Generated output heading\n```rust fenced block line\n";
    assert_eq!(extract(raw), UPDATE_SENTINEL);
}

// ─── Sentinel ─────────────────────────────────────────────────────────────────

#[test]
fn empty_input_returns_sentinel() {
    let extraction = extract_detailed("");
    assert!(extraction.is_sentinel());
    assert_eq!(extraction.message, "update");
}

#[test]
fn whitespace_only_returns_sentinel() {
    assert_eq!(extract("   \n\t  "), "update");
}

#[test]
fn only_short_lines_returns_sentinel() {
    let raw = "ok\nsure\nfix it";
    assert!(is_sentinel(&extract(raw)));
}

#[test]
fn marker_with_nothing_after_and_no_candidates_returns_sentinel() {
    assert_eq!(extract("Commit Message:"), UPDATE_SENTINEL);
}

// ─── UTF-8 safety ─────────────────────────────────────────────────────────────

#[test]
fn heuristic_counts_characters_not_bytes() {
    // 40 CJK characters is 120 bytes but only 40 chars
    let line = "添".repeat(40);
    assert_eq!(extract(&line), line);
}

#[test]
fn emoji_after_marker() {
    let raw = "Generated Commit Message:\n🦀 Port CLI to clap derive";
    assert_eq!(extract(raw), "🦀 Port CLI to clap derive");
}

// ─── Proptest ─────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn extractor_never_panics_and_never_returns_empty(raw in ".*") {
        let message = extract(&raw);
        prop_assert!(!message.is_empty());
    }

    #[test]
    fn extractor_is_pure(raw in "(?s).{0,300}") {
        prop_assert_eq!(extract(&raw), extract(&raw));
    }

    #[test]
    fn marker_body_is_returned_trimmed(
        prefix in "[a-z .!]{0,40}",
        body in "[A-Za-z][A-Za-z0-9 ]{0,60}[A-Za-z0-9]",
    ) {
        let raw = format!("{prefix}Generated Commit Message:\n\n{body}\n");
        prop_assert_eq!(extract(&raw), body.trim().to_string());
    }
}
