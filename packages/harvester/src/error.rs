//! Error types for the harvester.
//!
//! `HarvesterError` is the error library consumers see. The `Missing*`
//! variants form the recoverable taxonomy for PURL fetches: each one carries
//! the druid or document context that produced it. Transport level failures
//! live in [`TransportError`](crate::oai::TransportError) and
//! [`FetchError`](crate::http::FetchError) and are wrapped here.

use thiserror::Error;

use crate::http::FetchError;
use crate::oai::{TransportError, Verb};

/// Main error type for the harvester library.
#[derive(Debug, Error)]
pub enum HarvesterError {
    /// Invalid OAI date.
    #[error("Invalid date: '{0}'. Expected YYYY-MM-DD or YYYY-MM-DDThh:mm:ssZ (e.g., 2012-11-29)")]
    InvalidDate(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// The PURL server has no page for this druid.
    #[error("No PURL page for {druid}: {source}")]
    MissingPurlPage {
        druid: String,
        #[source]
        source: FetchError,
    },

    /// The PURL page exists but its public XML is empty or unusable.
    #[error("Missing public XML for {druid}: {reason}")]
    MissingPublicXml { druid: String, reason: String },

    /// The MODS (descriptive record) endpoint failed or returned unusable XML.
    #[error("Missing MODS for {druid}: {reason}")]
    MissingMods { druid: String, reason: String },

    /// No contentMetadata in the public XML.
    #[error("Missing contentMetadata for {0}")]
    MissingContentMetadata(String),

    /// No identityMetadata in the public XML.
    #[error("Missing identityMetadata for {0}")]
    MissingIdentityMetadata(String),

    /// No rightsMetadata in the public XML.
    #[error("Missing rightsMetadata for {0}")]
    MissingRightsMetadata(String),

    /// No RDF relationship graph in the public XML.
    #[error("Missing RDF for {0}")]
    MissingRdf(String),

    /// No Dublin Core record in the public XML.
    #[error("Missing Dublin Core for {0}")]
    MissingDc(String),

    /// A paginated OAI harvest ended early.
    #[error("OAI {verb} harvest failed: {source}")]
    Harvest {
        verb: Verb,
        #[source]
        source: TransportError,
    },

    /// A single OAI record request failed.
    #[error("OAI GetRecord failed for {identifier}: {source}")]
    Record {
        identifier: String,
        #[source]
        source: TransportError,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be deserialized.
    #[error("Invalid YAML configuration: {0}")]
    YamlConfig(#[from] serde_yaml_ng::Error),
}

impl HarvesterError {
    /// Whether this error means a PURL document or one of its sections is
    /// missing, as opposed to a harvest or setup failure.
    #[must_use]
    pub fn is_missing_metadata(&self) -> bool {
        matches!(
            self,
            Self::MissingPurlPage { .. }
                | Self::MissingPublicXml { .. }
                | Self::MissingMods { .. }
                | Self::MissingContentMetadata(_)
                | Self::MissingIdentityMetadata(_)
                | Self::MissingRightsMetadata(_)
                | Self::MissingRdf(_)
                | Self::MissingDc(_)
        )
    }
}

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, HarvesterError>;
