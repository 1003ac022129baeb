use async_trait::async_trait;
use bandbot_core::Channel;
use tokio::io::{AsyncWriteExt, Stdout};

/// Writes replies to stdout. Rich text only when asked for.
pub struct ConsoleChannel {
    rich: bool,
    out: Stdout,
}

impl ConsoleChannel {
    pub fn new(rich: bool) -> Self {
        Self { rich, out: tokio::io::stdout() }
    }
}

#[async_trait]
impl Channel for ConsoleChannel {
    fn supports_rich_text(&self) -> bool {
        self.rich
    }

    async fn send(&mut self, body: &str) -> anyhow::Result<()> {
        self.out.write_all(body.as_bytes()).await?;
        if !body.ends_with('\n') {
            self.out.write_all(b"\n").await?;
        }
        self.out.flush().await?;
        Ok(())
    }
}
