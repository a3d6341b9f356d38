// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use gitcomm::services::prompt::{DEFAULT_MARKER, FormatContract, PromptBuilder};

const DIFF: &str = "diff --git a/x b/x\n+foo\n";

#[test]
fn renders_instructions_diff_and_format_example() {
    let prompt = PromptBuilder::build(DIFF, &FormatContract::default());

    let expected = "Analyze the following git diff and provide a single-line commit message based on the changes.
Please ensure that your response strictly follows the specified format below.

Git Diff:
diff --git a/x b/x
+foo

Format your response as follows, including the exact wording:
Generated Commit Message:
[Your generated commit message here]

Example output:
Generated Commit Message:
Fix bug in user login process

Make sure to provide a commit message that accurately reflects the changes made in the git diff.";

    assert_eq!(prompt, expected);
}

#[test]
fn identical_inputs_give_identical_bytes() {
    let contract = FormatContract::default();
    assert_eq!(
        PromptBuilder::build(DIFF, &contract),
        PromptBuilder::build(DIFF, &contract)
    );
}

#[test]
fn diff_is_embedded_verbatim() {
    let diff: String = (0..5_000).map(|i| format!("+line {i}\n")).collect();
    let prompt = PromptBuilder::build(&diff, &FormatContract::default());
    assert!(prompt.contains(&diff), "diff must not be truncated or altered");
}

#[test]
fn diff_without_trailing_newline_still_separates_sections() {
    let prompt = PromptBuilder::build("+foo", &FormatContract::default());
    assert!(prompt.contains("+foo\n\nFormat your response"));
}

#[test]
fn custom_marker_is_named_twice() {
    let contract = FormatContract {
        marker: "Commit Message:".into(),
        example_subject: "Add tests".into(),
    };
    let prompt = PromptBuilder::build(DIFF, &contract);

    assert_eq!(prompt.matches("Commit Message:").count(), 2);
    assert!(!prompt.contains(DEFAULT_MARKER));
    assert!(prompt.contains("Commit Message:\nAdd tests"));
}
