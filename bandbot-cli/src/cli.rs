use std::path::PathBuf;

use anyhow::{Context, anyhow, bail};
use bandbot_core::{CommandRegistry, Config, Dispatcher, PropagationService, render};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::console::ConsoleChannel;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "bandbot", version, about = "Solar and band propagation report bot")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Answer commands read from stdin, one per line (e.g. `!bands`).
    Run {
        /// Reply with the HTML body instead of plain text.
        #[arg(long)]
        html: bool,
    },

    /// Run a single command and print the reply.
    Report {
        /// Command word without the prefix, e.g. "bands", "vhf", "solar" or "help".
        command: String,

        #[arg(long)]
        html: bool,
    },

    /// Print the extracted feed data as JSON.
    Dump,

    /// Interactively edit the configuration file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = self.load_config()?;

        match self.command {
            Command::Run { html } => {
                let dispatcher = build_dispatcher(&config)?;
                let mut channel = ConsoleChannel::new(html);
                let mut lines = BufReader::new(tokio::io::stdin()).lines();

                info!(prefix = %dispatcher.prefix(), "bandbot listening on stdin");
                while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
                    dispatcher.handle_line(&line, &mut channel).await?;
                }
            }
            Command::Report { command, html } => {
                let dispatcher = build_dispatcher(&config)?;
                let mut channel = ConsoleChannel::new(html);
                let line = format!("{}{}", dispatcher.prefix(), command);

                if !dispatcher.handle_line(&line, &mut channel).await? {
                    bail!("Unknown command '{command}'.\nHint: run `bandbot report help` for a list.");
                }
            }
            Command::Dump => {
                let service = PropagationService::from_config(&config)?;
                let info = service.band_info().await?;
                println!("{}", render::render_json(&info)?);
            }
            Command::Configure => {
                let updated = prompt_config(config)?;
                match &self.config {
                    Some(path) => updated.save_to(path)?,
                    None => updated.save()?,
                }
                println!("Configuration saved.");
            }
        }

        Ok(())
    }

    fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }
}

fn build_dispatcher(config: &Config) -> anyhow::Result<Dispatcher> {
    config.validate()?;
    let prefix = config
        .command_prefix
        .chars()
        .next()
        .ok_or_else(|| anyhow!("command_prefix must not be empty"))?;
    let service = PropagationService::from_config(config)?;

    Ok(Dispatcher::new(prefix, CommandRegistry::with_builtins(), service))
}

fn prompt_config(current: Config) -> anyhow::Result<Config> {
    let feed_url = Text::new("Feed URL:").with_default(&current.feed_url).prompt()?;
    let cache_ttl_secs = CustomType::<u64>::new("Cache lifetime (seconds):")
        .with_default(current.cache_ttl_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()?;
    let request_timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(current.request_timeout_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()?;
    let command_prefix =
        Text::new("Command prefix:").with_default(&current.command_prefix).prompt()?;

    let cfg = Config { feed_url, cache_ttl_secs, request_timeout_secs, command_prefix };
    cfg.validate()?;
    Ok(cfg)
}
