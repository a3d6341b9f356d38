// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

/// Marker line the model is asked to reproduce before the message.
pub const DEFAULT_MARKER: &str = "Generated Commit Message:";

const DEFAULT_EXAMPLE_SUBJECT: &str = "Fix bug in user login process";

const INSTRUCTIONS: &str = "Analyze the following git diff and provide a single-line commit message based on the changes.
Please ensure that your response strictly follows the specified format below.";

const CLOSING: &str = "Make sure to provide a commit message that accurately reflects the changes made in the git diff.";

/// Output format the model must follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatContract {
    pub marker: String,
    pub example_subject: String,
}

impl Default for FormatContract {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.into(),
            example_subject: DEFAULT_EXAMPLE_SUBJECT.into(),
        }
    }
}

pub struct PromptBuilder;

impl PromptBuilder {
    /// Render the prompt for `diff`. Deterministic; the diff is embedded as-is.
    pub fn build(diff: &str, contract: &FormatContract) -> String {
        let mut prompt = String::with_capacity(diff.len() + 512);

        prompt.push_str(INSTRUCTIONS);
        prompt.push_str("\n\nGit Diff:\n");
        prompt.push_str(diff);
        if !diff.ends_with('\n') {
            prompt.push('\n');
        }

        prompt.push_str("\nFormat your response as follows, including the exact wording:\n");
        prompt.push_str(&contract.marker);
        prompt.push_str("\n[Your generated commit message here]\n\nExample output:\n");
        prompt.push_str(&contract.marker);
        prompt.push('\n');
        prompt.push_str(&contract.example_subject);
        prompt.push_str("\n\n");
        prompt.push_str(CLOSING);

        prompt
    }
}
