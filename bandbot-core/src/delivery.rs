use async_trait::async_trait;

use crate::model::Response;

/// Where rendered responses go. Implemented by the front end.
#[async_trait]
pub trait Channel: Send {
    /// Whether this channel can display the HTML body.
    fn supports_rich_text(&self) -> bool;

    async fn send(&mut self, body: &str) -> anyhow::Result<()>;
}

/// Send the body the channel can display.
pub async fn deliver(response: &Response, channel: &mut dyn Channel) -> anyhow::Result<()> {
    let body = response.body_for(channel.supports_rich_text());
    channel.send(body).await
}
