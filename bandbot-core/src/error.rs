use thiserror::Error;

/// Maximum number of characters of an error response body kept in messages.
const MAX_ERROR_BODY_LENGTH: usize = 200;

/// Failure to obtain a well-formed feed document from upstream.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Failed to send request to {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Feed request failed with status {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },

    #[error("Failed to read feed response body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("Feed body is not valid {0}")]
    Encoding(&'static str),

    #[error("Feed is not well-formed XML: {0}")]
    Xml(#[from] roxmltree::Error),
}

impl FetchError {
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        FetchError::Status { status, body: truncate_body(body) }
    }
}

/// A well-formed feed document that lacks the structure the extractor needs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Feed root <{0}> has no data element")]
    MissingData(String),

    #[error("Feed document is missing the <{0}> section")]
    MissingSection(&'static str),

    #[error("<{element}> entry is missing the '{attribute}' attribute")]
    MissingAttribute { element: &'static str, attribute: &'static str },

    #[error("<band> entry has unknown time '{0}' (expected day or night)")]
    UnknownBandTime(String),
}

/// Any failure of a report invocation.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_LENGTH) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
