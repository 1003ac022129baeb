//! Core library for the `bandbot` propagation report bot.
//!
//! This crate defines:
//! - Fetching and caching the solar/propagation XML feed
//! - Extracting band, VHF and solar data from it
//! - Rendering plain-text and HTML reports
//! - A command registration table and dispatcher for chat front ends
//!
//! It is used by `bandbot-cli`, but can also be embedded in other bots.

pub mod cache;
pub mod command;
pub mod config;
pub mod delivery;
pub mod error;
pub mod extract;
pub mod feed;
pub mod model;
pub mod render;
pub mod service;
pub mod xml;

#[cfg(test)]
mod fixtures;

pub use cache::FeedCache;
pub use command::{CommandHandler, CommandRegistry, Dispatcher};
pub use config::Config;
pub use delivery::{Channel, deliver};
pub use error::{Error, FetchError, SchemaError};
pub use extract::extract;
pub use feed::{FeedSource, HttpFeedSource};
pub use model::{BandInfo, Response};
pub use service::PropagationService;
pub use xml::FeedDocument;
