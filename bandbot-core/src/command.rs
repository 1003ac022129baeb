//! Command registration table and dispatcher.
//!
//! Commands are lines made of a one-character prefix and a command word,
//! e.g. `!bands`. Anything after the word is ignored.

use std::fmt::Debug;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{
    delivery::{Channel, deliver},
    error::Error,
    model::Response,
    service::PropagationService,
};

/// What a handler can see while it runs.
pub struct CommandContext<'a> {
    pub service: &'a PropagationService,
    pub registry: &'a CommandRegistry,
    pub prefix: char,
}

#[async_trait]
pub trait CommandHandler: Send + Sync + Debug {
    async fn handle(&self, ctx: &CommandContext<'_>) -> Result<Response, Error>;
}

#[derive(Debug)]
struct Registration {
    name: String,
    description: String,
    handler: Box<dyn CommandHandler>,
}

/// Command name -> (handler, description), in registration order.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    entries: Vec<Registration>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `help`, `bands`, `vhf` and `solar`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register("help", "List available commands", HelpCommand)
            .register("bands", "HF band conditions for day and night", BandsCommand)
            .register("vhf", "VHF propagation phenomena by location", VhfCommand)
            .register("solar", "Solar flux, sunspots and geomagnetic indices", SolarCommand);
        registry
    }

    /// Add a command; registering an existing name replaces it in place.
    pub fn register(
        &mut self,
        name: &str,
        description: &str,
        handler: impl CommandHandler + 'static,
    ) -> &mut Self {
        let registration = Registration {
            name: name.to_lowercase(),
            description: description.to_string(),
            handler: Box::new(handler),
        };

        match self.entries.iter_mut().find(|e| e.name == registration.name) {
            Some(existing) => *existing = registration,
            None => self.entries.push(registration),
        }
        self
    }

    fn get(&self, name: &str) -> Option<&Registration> {
        self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// (name, description) pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|e| (e.name.as_str(), e.description.as_str()))
    }
}

#[derive(Debug)]
pub struct HelpCommand;

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn handle(&self, ctx: &CommandContext<'_>) -> Result<Response, Error> {
        let mut text = String::from("Available commands:");
        for (name, description) in ctx.registry.iter() {
            text.push_str(&format!("\n{}{name} - {description}", ctx.prefix));
        }
        Ok(Response::plain(text))
    }
}

#[derive(Debug)]
pub struct BandsCommand;

#[async_trait]
impl CommandHandler for BandsCommand {
    async fn handle(&self, ctx: &CommandContext<'_>) -> Result<Response, Error> {
        ctx.service.bands_report().await
    }
}

#[derive(Debug)]
pub struct VhfCommand;

#[async_trait]
impl CommandHandler for VhfCommand {
    async fn handle(&self, ctx: &CommandContext<'_>) -> Result<Response, Error> {
        ctx.service.vhf_report().await
    }
}

#[derive(Debug)]
pub struct SolarCommand;

#[async_trait]
impl CommandHandler for SolarCommand {
    async fn handle(&self, ctx: &CommandContext<'_>) -> Result<Response, Error> {
        ctx.service.solar_report().await
    }
}

/// Routes command lines to registered handlers.
#[derive(Debug)]
pub struct Dispatcher {
    prefix: char,
    registry: CommandRegistry,
    service: PropagationService,
}

impl Dispatcher {
    pub fn new(prefix: char, registry: CommandRegistry, service: PropagationService) -> Self {
        Self { prefix, registry, service }
    }

    pub fn prefix(&self) -> char {
        self.prefix
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// The command word of `line`, if it is a command line at all.
    pub fn parse<'l>(&self, line: &'l str) -> Option<&'l str> {
        let rest = line.trim_start().strip_prefix(self.prefix)?;
        if rest.starts_with(char::is_whitespace) {
            return None;
        }
        rest.split_whitespace().next()
    }

    /// Run the command on `line`.
    ///
    /// Returns `None` for lines that are not commands or name an unknown
    /// command; those belong to whoever else is listening. Failures come back
    /// as a plain-text message for the user.
    pub async fn dispatch(&self, line: &str) -> Option<Response> {
        let word = self.parse(line)?;
        let Some(registration) = self.registry.get(word) else {
            debug!(command = word, "ignoring unknown command");
            return None;
        };

        let ctx =
            CommandContext { service: &self.service, registry: &self.registry, prefix: self.prefix };
        match registration.handler.handle(&ctx).await {
            Ok(response) => Some(response),
            Err(err) => {
                warn!(command = %registration.name, error = %err, "command failed");
                Some(Response::plain(format!(
                    "Sorry, the {} report is unavailable right now: {err}",
                    registration.name
                )))
            }
        }
    }

    /// Dispatch `line` and deliver any response. Returns whether the line was handled.
    pub async fn handle_line(&self, line: &str, channel: &mut dyn Channel) -> anyhow::Result<bool> {
        match self.dispatch(line).await {
            Some(response) => {
                deliver(&response, channel).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
