//! Client for the Art. Lebedev Typograf SOAP web service.
//!
//! [`FormattingConfig`] holds the per-session formatting options,
//! [`TypografClient`] performs the `ProcessText` round trip, and
//! [`TextFormatter`] is the seam the session router depends on.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use tracing::debug;

pub mod envelope;

/// Production endpoint of the Typograf web service.
pub const ENDPOINT: &str = "http://typograf.artlebedev.ru/webservices/typograf.asmx";

/// `SOAPAction` header value for the `ProcessText` operation.
pub const SOAP_ACTION: &str = "http://typograf.artlebedev.ru/webservices/ProcessText";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned by configuration parsing and text conversion.
#[derive(Debug, thiserror::Error)]
pub enum TypografError {
    /// The entity type is not one of the supported names or codes.
    #[error("invalid entity type {0:?}: expected one of LETTER, NUMBER, SYMBOL")]
    InvalidConfig(String),
    /// Network failure or timeout while talking to the service.
    #[error("typograf request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The service answered with something other than 200 OK.
    #[error("typograf returned status {status} ({reason}): {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase.
        reason: String,
        /// Collapsed and truncated response body.
        body: String,
    },
    /// The response body is not XML or lacks the result element.
    #[error("malformed typograf response: {reason}; body: {snippet}")]
    MalformedResponse {
        /// What was wrong with the body.
        reason: String,
        /// Collapsed and truncated response body.
        snippet: String,
    },
    /// The service parsed the request but refused to process it.
    #[error("typograf rejected the request: {0}")]
    ServiceRejected(String),
}

impl TypografError {
    /// Whether the failure happened at the transport level (network,
    /// timeout or unexpected HTTP status).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Request(_) | Self::HttpStatus { .. })
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// How the service encodes the characters it substitutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntityType {
    /// Named HTML entities such as `&laquo;`.
    Letter,
    /// Numeric character references such as `&#171;`.
    Number,
    /// Literal Unicode characters.
    #[default]
    Symbol,
}

impl EntityType {
    /// Every entity type, in wire-code order.
    pub const ALL: [EntityType; 3] = [Self::Letter, Self::Number, Self::Symbol];

    /// Name used in commands and keyboards.
    pub fn name(self) -> &'static str {
        match self {
            Self::Letter => "LETTER",
            Self::Number => "NUMBER",
            Self::Symbol => "SYMBOL",
        }
    }

    /// Integer code sent in the `entityType` element.
    pub fn code(self) -> u8 {
        match self {
            Self::Letter => 1,
            Self::Number => 2,
            Self::Symbol => 3,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Names are matched exactly; `letter` is rejected.
impl FromStr for EntityType {
    type Err = TypografError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| TypografError::InvalidConfig(s.to_owned()))
    }
}

impl TryFrom<u8> for EntityType {
    type Error = TypografError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or_else(|| TypografError::InvalidConfig(code.to_string()))
    }
}

/// Formatting options sent with every conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormattingConfig {
    /// Encoding of substituted characters.
    pub entity_type: EntityType,
    /// Emit `<br />` tags instead of raw newlines.
    pub use_break: bool,
    /// Wrap paragraphs in `<p>` tags.
    pub use_paragraph: bool,
    /// Longest run the service may glue with non-breaking spaces (0 = service default).
    pub max_no_break_span: u32,
}

impl FormattingConfig {
    /// Build a configuration from an untrusted entity type name.
    ///
    /// # Errors
    ///
    /// Returns [`TypografError::InvalidConfig`] if `entity_type` is not
    /// exactly `LETTER`, `NUMBER` or `SYMBOL`.
    pub fn configure(
        entity_type: &str,
        use_break: bool,
        use_paragraph: bool,
        max_no_break_span: u32,
    ) -> Result<Self, TypografError> {
        Ok(Self {
            entity_type: entity_type.parse()?,
            use_break,
            use_paragraph,
            max_no_break_span,
        })
    }

    /// Configuration with the given entity type and every other option at its default.
    pub fn with_entity_type(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Something that can typographically correct a piece of text.
#[async_trait]
pub trait TextFormatter: Send + Sync {
    /// Convert `text` using `config`.
    ///
    /// # Errors
    ///
    /// Returns [`TypografError`] on transport, parse or service failure.
    async fn convert(&self, text: &str, config: &FormattingConfig)
        -> Result<String, TypografError>;
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the Typograf `ProcessText` operation.
///
/// Holds no formatting state: the configuration is passed in per call, so
/// one client serves every session.
#[derive(Debug, Clone)]
pub struct TypografClient {
    /// Service URL.
    #[doc(hidden)]
    pub endpoint: String,
    client: reqwest::Client,
}

impl TypografClient {
    /// Create a client for the production endpoint with a request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`TypografError::Request`] if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, TypografError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: ENDPOINT.to_owned(),
            client,
        })
    }

    /// Point the client at a different URL (local mock servers in tests).
    #[doc(hidden)]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Run `text` through the service once.
    ///
    /// # Errors
    ///
    /// Returns [`TypografError::Request`] on network failure or timeout,
    /// [`TypografError::HttpStatus`] on any status other than 200,
    /// [`TypografError::MalformedResponse`] or
    /// [`TypografError::ServiceRejected`] when the body is unusable.
    pub async fn process_text(
        &self,
        text: &str,
        config: &FormattingConfig,
    ) -> Result<String, TypografError> {
        let body = envelope::build_envelope(text, config);
        debug!(
            entity_type = %config.entity_type,
            chars = text.chars().count(),
            "sending ProcessText request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/xml")
            .header("SOAPAction", SOAP_ACTION)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let response_body = response.text().await?;
        if status != StatusCode::OK {
            return Err(TypografError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_owned(),
                body: envelope::snippet(&response_body),
            });
        }

        envelope::parse_response(&response_body)
    }
}

#[async_trait]
impl TextFormatter for TypografClient {
    async fn convert(
        &self,
        text: &str,
        config: &FormattingConfig,
    ) -> Result<String, TypografError> {
        self.process_text(text, config).await
    }
}
