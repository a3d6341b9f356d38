// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

// miette's Diagnostic derive generates code that triggers this false positive
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

use crate::services::llm::TransportError;

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("No staged changes found")]
    #[diagnostic(
        code(gitcomm::git::no_staged),
        help("Stage files with: git add <files>, or rerun with --all")
    )]
    NoStagedChanges,

    #[error("Not a git repository")]
    #[diagnostic(
        code(gitcomm::git::not_repo),
        help("Run this command inside a git repository")
    )]
    NotAGitRepo,

    #[error("Merge in progress")]
    #[diagnostic(
        code(gitcomm::git::merge),
        help("Complete or abort the merge: git merge --abort")
    )]
    MergeInProgress,

    #[error("Operation cancelled by user")]
    Cancelled,

    #[error("No API key configured for provider '{provider}'")]
    #[diagnostic(
        code(gitcomm::config::missing_credential),
        help("Set {env_var}, or store the key under \"api_keys\".\"{provider}\" in ~/.gitcomm/config.json")
    )]
    MissingCredential { provider: String, env_var: String },

    #[error("All {attempted} model(s) failed; last attempt '{last_model}': {source}")]
    #[diagnostic(
        code(gitcomm::llm::all_models_failed),
        help("Check your API key and network, or configure other models with --model")
    )]
    AllModelsFailed {
        attempted: usize,
        last_model: String,
        #[source]
        source: TransportError,
    },

    #[error("Could not extract a commit message from the model response")]
    #[diagnostic(
        code(gitcomm::commit::no_message),
        help("Rerun without --yes to review the response, or try another model")
    )]
    NoUsableMessage,

    #[error("Configuration error: {0}")]
    #[diagnostic(code(gitcomm::config::error))]
    Config(String),

    #[error("Git error: {0}")]
    #[diagnostic(code(gitcomm::git::error))]
    Git(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("Dialog error: {0}")]
    Dialog(String),
}

impl From<dialoguer::Error> for Error {
    fn from(e: dialoguer::Error) -> Self {
        Error::Dialog(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
