//! The seam between the harvester and an OAI-PMH provider.

use thiserror::Error;

use super::types::{Header, ListRequest, Page, Record};
use crate::http::FetchError;

/// Failure reported by an OAI transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The provider did not answer in time.
    #[error("No response from OAI provider: {0}")]
    Timeout(String),

    /// The provider answered with an OAI-PMH `<error>`.
    #[error("OAI-PMH error {code}: {message}")]
    Protocol { code: String, message: String },

    /// HTTP level failure other than a timeout.
    #[error(transparent)]
    Fetch(FetchError),

    /// The response is not a well-formed OAI-PMH document.
    #[error("Invalid OAI-PMH response: {0}")]
    InvalidResponse(String),
}

impl TransportError {
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

impl From<FetchError> for TransportError {
    fn from(error: FetchError) -> Self {
        if error.is_timeout() {
            Self::Timeout(error.to_string())
        } else {
            Self::Fetch(error)
        }
    }
}

/// Operations the harvester needs from an OAI-PMH provider.
///
/// Implementations own request construction, HTTP, retries and response
/// deserialization. Callers never mix filter arguments with a resumption
/// token: see [`ListRequest`].
pub trait OaiTransport {
    /// `ListIdentifiers`: one page of headers.
    fn list_identifiers(&self, request: ListRequest<'_>) -> Result<Page<Header>, TransportError>;

    /// `ListRecords`: one page of records.
    fn list_records(&self, request: ListRequest<'_>) -> Result<Page<Record>, TransportError>;

    /// `GetRecord` for a full OAI identifier.
    fn get_record(&self, identifier: &str, metadata_prefix: &str)
        -> Result<Record, TransportError>;
}
