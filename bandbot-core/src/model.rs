use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Day/night condition labels for one band. Labels are passed through as the feed reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayNight {
    pub day: Option<String>,
    pub night: Option<String>,
}

/// Band name -> day/night labels, in feed order.
pub type BandConditions = IndexMap<String, DayNight>;

/// Phenomenon -> location -> status, in feed order.
pub type VhfConditions = IndexMap<String, IndexMap<String, String>>;

/// Top-level scalar feed fields with trimmed values.
pub type FeedInfo = IndexMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandInfo {
    pub bands: BandConditions,
    pub vhf: VhfConditions,
    pub info: FeedInfo,
}

impl BandInfo {
    /// Feed field by tag name, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.info.get(name).map(String::as_str)
    }
}

/// A rendered reply: always a plain-text body, optionally a rich HTML body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub text: String,
    pub html: Option<String>,
}

impl Response {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), html: None }
    }

    pub fn rich(text: impl Into<String>, html: impl Into<String>) -> Self {
        Self { text: text.into(), html: Some(html.into()) }
    }

    /// Pick the body for a channel with or without rich-text support.
    pub fn body_for(&self, supports_rich_text: bool) -> &str {
        match (&self.html, supports_rich_text) {
            (Some(html), true) => html,
            _ => &self.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_for_prefers_html_only_when_supported() {
        let resp = Response::rich("plain", "<b>rich</b>");
        assert_eq!(resp.body_for(true), "<b>rich</b>");
        assert_eq!(resp.body_for(false), "plain");
    }

    #[test]
    fn body_for_falls_back_to_text_without_html() {
        let resp = Response::plain("only text");
        assert_eq!(resp.body_for(true), "only text");
    }
}
