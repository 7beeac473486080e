//! The network step of a chat turn.

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::protocol::QueryRequest;

/// Failure of a single chat turn.
#[derive(Error, Debug)]
pub enum ChatError {
    /// The request could not be sent or the response could not be read.
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint URL could not be parsed.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// The response body was not valid JSON of the expected shape.
    #[error("response was not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response JSON carried no `response` field.
    #[error("response has no `response` field")]
    MissingResponse,
}

/// Sends a query and returns the assistant's text.
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send `query` and wait for the answer.
    ///
    /// No timeout is applied; the call settles when the underlying request does.
    async fn query(&self, query: &str) -> Result<String, ChatError>;
}

/// `{ "response": ... }` as read back, with the field left optional so a
/// missing answer is told apart from malformed JSON.
#[derive(Debug, Deserialize)]
struct RawQueryResponse {
    response: Option<String>,
}

/// Posts `{ "query" }` as JSON to a fixed endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: Url,
    http: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport for `endpoint`, e.g. `http://127.0.0.1:3000/`.
    pub fn new(endpoint: impl AsRef<str>) -> Result<Self, ChatError> {
        Self::with_client(endpoint, reqwest::Client::new())
    }

    /// Create a transport with a custom reqwest client.
    pub fn with_client(endpoint: impl AsRef<str>, http: reqwest::Client) -> Result<Self, ChatError> {
        let endpoint = Url::parse(endpoint.as_ref())?;
        Ok(Self { endpoint, http })
    }

    /// The URL every query is posted to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl ChatTransport for HttpTransport {
    async fn query(&self, query: &str) -> Result<String, ChatError> {
        let body = QueryRequest {
            query: query.to_string(),
        };
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let text = response.text().await?;
        let raw: RawQueryResponse = serde_json::from_str(&text)?;
        raw.response.ok_or(ChatError::MissingResponse)
    }
}
