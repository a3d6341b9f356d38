// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use clap::Parser;
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(name = "gitcomm")]
#[command(version)]
#[command(about = "Generate commit messages from staged changes with an LLM", long_about = None)]
pub struct Cli {
    /// LLM provider (openrouter, openai, groq, gemini, ollama)
    #[arg(long, env = "GITCOMM_PROVIDER")]
    pub provider: Option<String>,

    /// Model to try; repeat to set the fallback order
    #[arg(short, long = "model", value_name = "MODEL")]
    pub models: Vec<String>,

    /// Stage all changes (git add .) before generating
    #[arg(short, long)]
    pub all: bool,

    /// Commit without asking for confirmation
    #[arg(short = 'y', long, visible_alias = "auto")]
    pub yes: bool,

    /// Push after committing
    #[arg(short, long)]
    pub push: bool,

    /// Print message only, don't commit
    #[arg(long)]
    pub dry_run: bool,

    /// Show the prompt sent to the LLM
    #[arg(long)]
    pub show_prompt: bool,

    /// Verbose output, including raw model responses
    #[arg(short, long, visible_alias = "debug")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Create ~/.gitcomm/config.json with defaults
    Init,
    /// Show current configuration
    Config,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}
