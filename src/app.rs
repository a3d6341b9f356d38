// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::io::IsTerminal;
use std::sync::Mutex;
use std::time::Duration;

use console::style;
use dialoguer::Confirm;
use indicatif::ProgressBar;
use tracing::{debug, warn};

use crate::cli::{Cli, Commands};
use crate::config::{Config, Provider};
use crate::domain::ProviderProfile;
use crate::error::{Error, Result};
use crate::services::{
    extractor,
    git::GitService,
    llm::{self, FallbackOrchestrator, FallbackReason, LogContext, Progress},
    prompt::{FormatContract, PromptBuilder},
};

pub struct App {
    cli: Cli,
    config: Config,
    log: LogContext,
}

impl App {
    pub fn new(cli: Cli) -> Result<Self> {
        let config = Config::load()?;
        debug!(
            provider = %config.provider,
            models = config.models.len(),
            "config loaded"
        );
        let log = LogContext::new(cli.verbose);
        Ok(Self { cli, config, log })
    }

    pub async fn run(&mut self) -> Result<()> {
        if let Some(ref cmd) = self.cli.command {
            return self.handle_command(cmd);
        }

        self.generate_commit().await
    }

    fn requested_provider(&self) -> Result<Option<Provider>> {
        self.cli
            .provider
            .as_deref()
            .map(str::parse::<Provider>)
            .transpose()
    }

    fn resolve_profile(&self) -> Result<ProviderProfile> {
        self.config
            .resolve(self.requested_provider()?, &self.cli.models)
    }

    async fn generate_commit(&self) -> Result<()> {
        // Resolve credentials before touching git so a missing key fails fast
        let profile = self.resolve_profile()?;

        let git = GitService::discover()?;

        if self.cli.all {
            self.print_status("Staging all changes...");
            git.stage_all().await?;
        }

        self.print_status("Reading staged changes...");
        let diff = git.staged_diff().await?;

        let prompt = PromptBuilder::build(&diff, &FormatContract::default());
        debug!(prompt_chars = prompt.len(), "prompt built");

        if self.cli.show_prompt {
            eprintln!("{}", style("--- PROMPT ---").dim());
            eprintln!("{}", prompt);
            eprintln!("{}", style("--- END PROMPT ---").dim());
        }

        let transport = llm::create_transport(&profile, self.log)?;
        let orchestrator = FallbackOrchestrator::new(
            transport,
            Box::new(ConsoleProgress::new(std::io::stderr().is_terminal())),
            self.log,
        );
        debug!(
            transport = orchestrator.transport_name(),
            models = ?profile.models,
            "starting fallback chain"
        );

        let completion = orchestrator.generate(&profile, &prompt).await?;

        let extraction = extractor::extract_detailed(&completion.content);
        debug!(source = ?extraction.source, model = %completion.model, "message extracted");

        if extraction.is_sentinel() {
            warn!(model = %completion.model, "no commit message found in response");
            self.print_warning(&format!(
                "Could not find a commit message in the response from {}",
                completion.model
            ));
            if self.log.debug {
                eprintln!("{}", style(&completion.content).dim());
            }
        }

        let message = extraction.message.clone();

        if self.cli.dry_run {
            println!("{}", message);
            return Ok(());
        }

        let is_interactive = std::io::stdout().is_terminal() && std::io::stdin().is_terminal();

        if self.cli.yes {
            if extraction.is_sentinel() {
                return Err(Error::NoUsableMessage);
            }
        } else {
            if !is_interactive {
                eprintln!("{}", style("warning:").yellow().bold());
                eprintln!("  Not a terminal. Use --yes to auto-confirm in scripts/hooks.");
                println!("{}", message);
                return Ok(());
            }

            eprintln!("\n{}", style("Generated commit message:").bold());
            eprintln!("{}", style(&message).green());
            eprintln!();

            let confirm = Confirm::new()
                .with_prompt("Create commit with this message?")
                .default(!extraction.is_sentinel())
                .interact()?;

            if !confirm {
                return Err(Error::Cancelled);
            }
        }

        git.commit(&message).await?;
        eprintln!("{} Committed!", style("✓").green().bold());

        if self.cli.push {
            self.print_status("Pushing...");
            git.push().await?;
            eprintln!("{} Pushed!", style("✓").green().bold());
        }

        Ok(())
    }

    fn handle_command(&self, cmd: &Commands) -> Result<()> {
        match cmd {
            Commands::Init => {
                let path = Config::create_default()?;
                println!("Created config: {}", path.display());
                Ok(())
            }
            Commands::Config => self.show_config(),
            Commands::Completions { shell } => {
                let mut cmd = <Cli as clap::CommandFactory>::command();
                clap_complete::generate(*shell, &mut cmd, "gitcomm", &mut std::io::stdout());
                Ok(())
            }
        }
    }

    fn show_config(&self) -> Result<()> {
        let provider = self.requested_provider()?.unwrap_or(self.config.provider);

        if let Some(ref path) = Config::config_path() {
            let status = if path.exists() { "found" } else { "not found" };
            println!("Config file: {} ({})", path.display(), status);
        }
        println!("Provider: {}", provider);

        match self.resolve_profile() {
            Ok(profile) => {
                println!("Endpoint: {}", profile.base_url);
                println!("Models: {}", profile.models.join(" -> "));
                println!("Max tokens: {}", profile.max_tokens);
                println!("Temperature: {}", profile.temperature);
                println!("Timeout: {}s", profile.timeout.as_secs());
                let key = if profile.has_api_key() {
                    "configured"
                } else {
                    "not required"
                };
                println!("API key: {}", key);
            }
            Err(Error::MissingCredential { env_var, .. }) => {
                println!("API key: MISSING (set {})", env_var);
            }
            Err(e) => return Err(e),
        }

        Ok(())
    }

    // ─── Output Helpers ───

    fn print_status(&self, msg: &str) {
        eprintln!("{} {}", style("→").cyan(), msg);
    }

    fn print_warning(&self, msg: &str) {
        eprintln!("{} {}", style("warning:").yellow().bold(), msg);
    }
}

/// Spinner on a terminal, plain status lines otherwise.
struct ConsoleProgress {
    interactive: bool,
    spinner: Mutex<Option<ProgressBar>>,
}

impl ConsoleProgress {
    fn new(interactive: bool) -> Self {
        Self {
            interactive,
            spinner: Mutex::new(None),
        }
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.spinner.lock()
            && let Some(spinner) = slot.take()
        {
            spinner.finish_and_clear();
        }
    }
}

impl Progress for ConsoleProgress {
    fn attempting(&self, model: &str, index: usize, total: usize) {
        let msg = if total > 1 {
            format!("Contacting {} ({}/{})...", model, index + 1, total)
        } else {
            format!("Contacting {}...", model)
        };

        if !self.interactive {
            eprintln!("{} {}", style("→").cyan(), msg);
            return;
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_message(msg);
        spinner.enable_steady_tick(Duration::from_millis(80));
        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(spinner);
        }
    }

    fn fell_back(&self, model: &str, reason: &FallbackReason) {
        self.clear();
        match reason {
            FallbackReason::Empty => eprintln!(
                "{} {} returned an empty response",
                style("warning:").yellow().bold(),
                model
            ),
            FallbackReason::Failed(e) => eprintln!(
                "{} {} failed: {}",
                style("warning:").yellow().bold(),
                model,
                e
            ),
        }
    }

    fn succeeded(&self, model: &str) {
        self.clear();
        eprintln!("{} Response from {}", style("✓").green().bold(), model);
    }
}
