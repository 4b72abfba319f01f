//! OAI-PMH over blocking HTTP.

use reqwest::blocking::Client;
use reqwest::Url;

use super::parse::{parse_get_record, parse_list_identifiers, parse_list_records};
use super::transport::{OaiTransport, TransportError};
use super::types::{Header, ListRequest, Page, Record, Verb};
use crate::http::{bytes_to_string, download_bytes};

/// OAI-PMH client for a single provider endpoint.
#[derive(Debug, Clone)]
pub struct OaiClient {
    http: Client,
    base_url: String,
}

impl OaiClient {
    /// Create a client for `base_url` (e.g. `https://dor-oaiprovider-prod.stanford.edu/oai`).
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the request URL for a set of query parameters.
    pub fn request_url(&self, params: &[(&str, &str)]) -> Result<Url, TransportError> {
        Url::parse_with_params(&self.base_url, params).map_err(|e| {
            TransportError::InvalidResponse(format!("invalid OAI URL '{}': {e}", self.base_url))
        })
    }

    fn request(&self, params: &[(&str, &str)]) -> Result<String, TransportError> {
        let url = self.request_url(params)?;
        tracing::debug!(url = %url, "OAI request");
        let bytes = download_bytes(&self.http, url.as_str())?;
        Ok(bytes_to_string(&bytes, "OAI-PMH response"))
    }

    fn list(&self, verb: Verb, request: ListRequest<'_>) -> Result<String, TransportError> {
        self.request(&request.query_pairs(verb))
    }
}

impl OaiTransport for OaiClient {
    fn list_identifiers(&self, request: ListRequest<'_>) -> Result<Page<Header>, TransportError> {
        let body = self.list(Verb::ListIdentifiers, request)?;
        parse_list_identifiers(&body)
    }

    fn list_records(&self, request: ListRequest<'_>) -> Result<Page<Record>, TransportError> {
        let body = self.list(Verb::ListRecords, request)?;
        parse_list_records(&body)
    }

    fn get_record(
        &self,
        identifier: &str,
        metadata_prefix: &str,
    ) -> Result<Record, TransportError> {
        let body = self.request(&[
            ("verb", Verb::GetRecord.as_str()),
            ("identifier", identifier),
            ("metadataPrefix", metadata_prefix),
        ])?;
        parse_get_record(&body)
    }
}
