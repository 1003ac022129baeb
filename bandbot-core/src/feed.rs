use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, header::CONTENT_TYPE};
use tracing::debug;

use crate::{Config, error::FetchError, xml::FeedDocument};

const USER_AGENT: &str = concat!("bandbot/", env!("CARGO_PKG_VERSION"));

/// Somewhere a feed document can be fetched from.
#[async_trait]
pub trait FeedSource: Send + Sync + Debug {
    async fn fetch(&self) -> Result<FeedDocument, FetchError>;
}

/// Fetches the feed over HTTP from a fixed URL.
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    url: String,
    http: Client,
}

impl HttpFeedSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { url: url.into(), http })
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Self::new(config.feed_url.clone(), config.request_timeout())
    }

    /// GET the URL and parse the body as XML. No retries.
    pub async fn fetch_and_parse(&self) -> Result<FeedDocument, FetchError> {
        debug!(url = %self.url, "fetching feed");

        let res = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|source| FetchError::Request { url: self.url.clone(), source })?;

        let status = res.status();
        let charset = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(charset_param)
            .map(str::to_string);
        let body = res.bytes().await.map_err(FetchError::Body)?;

        if !status.is_success() {
            return Err(FetchError::from_status(status, &String::from_utf8_lossy(&body)));
        }

        // Decoded from bytes so the XML declaration can name the encoding.
        FeedDocument::from_bytes(&body, charset.as_deref())
    }
}

fn charset_param(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim().eq_ignore_ascii_case("charset").then(|| value.trim().trim_matches('"'))
    })
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self) -> Result<FeedDocument, FetchError> {
        self.fetch_and_parse().await
    }
}

#[cfg(test)]
mod tests {
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    use super::*;
    use crate::fixtures::SAMPLE_FEED;

    fn http_response(status_line: &str, content_type: &str, body: &[u8]) -> Vec<u8> {
        let mut out = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: {content_type}\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        )
        .into_bytes();
        out.extend_from_slice(body);
        out
    }

    /// Serve one canned response on a local port and return a source pointed at it.
    async fn serve_once(response: Vec<u8>) -> HttpFeedSource {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");

        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut request = [0u8; 2048];
                let _ = socket.read(&mut request).await;
                let _ = socket.write_all(&response).await;
                let _ = socket.shutdown().await;
            }
        });

        HttpFeedSource::new(format!("http://{addr}/solarxml.php"), Duration::from_secs(5))
            .expect("client builds")
    }

    #[test]
    fn builds_from_default_config() {
        let cfg = Config::default();
        let source = HttpFeedSource::from_config(&cfg).expect("client builds");
        assert_eq!(source.url, "https://www.hamqsl.com/solarxml.php");
    }

    #[test]
    fn charset_param_is_read_from_content_type() {
        assert_eq!(charset_param("text/xml; charset=ISO-8859-1"), Some("ISO-8859-1"));
        assert_eq!(charset_param("text/xml;Charset=\"utf-8\""), Some("utf-8"));
        assert_eq!(charset_param("text/xml"), None);
    }

    #[tokio::test]
    async fn successful_response_is_parsed() {
        let source =
            serve_once(http_response("200 OK", "text/xml", SAMPLE_FEED.as_bytes())).await;

        let doc = source.fetch().await.expect("feed parses");
        assert_eq!(doc.root.name, "solar");
        assert!(doc.root.child("solardata").is_some());
    }

    #[tokio::test]
    async fn non_success_status_is_a_status_error() {
        let source = serve_once(http_response("503 Service Unavailable", "text/plain", b"down")).await;

        match source.fetch().await.unwrap_err() {
            FetchError::Status { status, body } => {
                assert_eq!(status, reqwest::StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(body, "down");
            }
            other => panic!("expected a status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn truncated_document_is_an_xml_error() {
        let source =
            serve_once(http_response("200 OK", "text/xml", b"<solar><solardata><updated>")).await;

        assert!(matches!(source.fetch().await.unwrap_err(), FetchError::Xml(_)));
    }

    #[tokio::test]
    async fn latin1_feed_keeps_non_ascii_text() {
        let body = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><solar><x>\xb0C</x></solar>";
        let source = serve_once(http_response("200 OK", "text/xml", body)).await;

        let doc = source.fetch().await.expect("feed parses");
        assert_eq!(doc.root.child("x").map(|x| x.text_or_empty()), Some("\u{b0}C"));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_request_error() {
        // Bind then drop a listener so the port is known to be closed.
        let addr = TcpListener::bind("127.0.0.1:0")
            .await
            .and_then(|l| l.local_addr())
            .expect("local addr");
        let url = format!("http://{addr}/solarxml.php");
        let source = HttpFeedSource::new(url, Duration::from_secs(2)).expect("client builds");

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Request { .. }));
        assert!(err.to_string().contains(&addr.to_string()));
    }
}
