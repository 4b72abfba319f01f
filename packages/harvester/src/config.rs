//! Configuration defaults, loading and validation for the harvester.
//!
//! Settings are layered: built-in defaults, then an optional YAML file, then
//! `DOR_HARVESTER_*` environment variables, then explicit builder calls.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::{HarvesterError, Result};
use crate::oai::HarvestArguments;

/// Default PURL server for published object XML.
pub const PURL_DEFAULT: &str = "https://purl.stanford.edu";

/// Default OAI-PMH provider.
pub const OAI_REPOSITORY_URL_DEFAULT: &str = "https://dor-oaiprovider-prod.stanford.edu/oai";

/// Host used to build `oai:<host>/druid:<id>` identifiers for GetRecord.
pub const OAI_IDENTIFIER_HOST_DEFAULT: &str = "searchworks.stanford.edu";

/// Default OAI metadata prefix.
pub const DEFAULT_METADATA_PREFIX: &str = "mods";

/// HTTP timeout in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// HTTP connection open timeout in seconds.
pub const HTTP_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Simple Dublin Core namespace used by `oai_dc:dc`.
pub const OAI_DC_NAMESPACE: &str = "http://www.openarchives.org/OAI/2.0/oai_dc/";

/// RDF namespace used by the relationship graph.
pub const RDF_NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// MODS namespace.
pub const MODS_NAMESPACE: &str = "http://www.loc.gov/mods/v3";

/// Environment variable prefix for overrides.
const ENV_PREFIX: &str = "DOR_HARVESTER_";

/// OAI date pattern: day granularity or seconds granularity in UTC.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}(T\d{2}:\d{2}:\d{2}Z)?$").expect("valid regex")
});

/// HTTP transport settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpOptions {
    /// Read timeout for a whole request (seconds).
    pub timeout_secs: u64,

    /// Connection open timeout (seconds).
    pub connect_timeout_secs: u64,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout_secs: HTTP_TIMEOUT_SECS,
            connect_timeout_secs: HTTP_CONNECT_TIMEOUT_SECS,
        }
    }
}

/// Client configuration. Read-only once a client is built from it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the PURL server.
    pub purl: String,

    /// OAI-PMH provider endpoint.
    pub oai_repository_url: String,

    /// Host part of `oai:<host>/druid:<id>` identifiers.
    pub oai_identifier_host: String,

    /// Metadata prefix used when a call does not override it.
    pub default_metadata_prefix: String,

    /// Lower bound on record datestamps.
    pub default_from_date: Option<String>,

    /// Upper bound on record datestamps.
    pub default_until_date: Option<String>,

    /// OAI set spec to harvest.
    pub default_set: Option<String>,

    pub http: HttpOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            purl: PURL_DEFAULT.to_string(),
            oai_repository_url: OAI_REPOSITORY_URL_DEFAULT.to_string(),
            oai_identifier_host: OAI_IDENTIFIER_HOST_DEFAULT.to_string(),
            default_metadata_prefix: DEFAULT_METADATA_PREFIX.to_string(),
            default_from_date: None,
            default_until_date: None,
            default_set: None,
            http: HttpOptions::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a YAML file. Keys missing from the file keep
    /// their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml_ng::from_str(text)?)
    }

    /// Apply `DOR_HARVESTER_*` environment variables on top of this config.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(format!("{ENV_PREFIX}{key}")).ok())
    }

    /// Apply overrides from a key lookup. An empty value clears an optional
    /// default.
    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup("PURL") {
            self.purl = v;
        }
        if let Some(v) = lookup("OAI_REPOSITORY_URL") {
            self.oai_repository_url = v;
        }
        if let Some(v) = lookup("OAI_IDENTIFIER_HOST") {
            self.oai_identifier_host = v;
        }
        if let Some(v) = lookup("METADATA_PREFIX") {
            self.default_metadata_prefix = v;
        }
        if let Some(v) = lookup("FROM_DATE") {
            self.default_from_date = non_empty(v);
        }
        if let Some(v) = lookup("UNTIL_DATE") {
            self.default_until_date = non_empty(v);
        }
        if let Some(v) = lookup("SET") {
            self.default_set = non_empty(v);
        }
        if let Some(secs) = lookup("HTTP_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.http.timeout_secs = secs;
        }
        if let Some(secs) = lookup("HTTP_CONNECT_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.http.connect_timeout_secs = secs;
        }
        self
    }

    #[must_use]
    pub fn with_purl(mut self, purl: impl Into<String>) -> Self {
        self.purl = purl.into();
        self
    }

    #[must_use]
    pub fn with_oai_repository_url(mut self, url: impl Into<String>) -> Self {
        self.oai_repository_url = url.into();
        self
    }

    #[must_use]
    pub fn with_default_metadata_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.default_metadata_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_default_from_date(mut self, date: Option<String>) -> Self {
        self.default_from_date = date;
        self
    }

    #[must_use]
    pub fn with_default_until_date(mut self, date: Option<String>) -> Self {
        self.default_until_date = date;
        self
    }

    #[must_use]
    pub fn with_default_set(mut self, set: Option<String>) -> Self {
        self.default_set = set;
        self
    }

    #[must_use]
    pub fn with_http_timeout_secs(mut self, secs: u64) -> Self {
        self.http.timeout_secs = secs;
        self
    }

    /// Check that URLs parse and default dates are valid OAI dates.
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("purl", &self.purl),
            ("oai_repository_url", &self.oai_repository_url),
        ] {
            reqwest::Url::parse(url)
                .map_err(|e| HarvesterError::Config(format!("{name} '{url}': {e}")))?;
        }
        if self.oai_identifier_host.trim().is_empty() {
            return Err(HarvesterError::Config(
                "oai_identifier_host must not be empty".to_string(),
            ));
        }
        for date in [&self.default_from_date, &self.default_until_date]
            .into_iter()
            .flatten()
        {
            validate_date(date)?;
        }
        Ok(())
    }

    /// Harvest arguments built from the configured defaults.
    #[must_use]
    pub fn default_harvest_arguments(&self) -> HarvestArguments {
        HarvestArguments {
            metadata_prefix: non_empty(self.default_metadata_prefix.clone()),
            from: self.default_from_date.clone(),
            until: self.default_until_date.clone(),
            set: self.default_set.clone(),
        }
    }

    /// OAI identifier for a druid, e.g. `oai:searchworks.stanford.edu/druid:bb375wb8869`.
    #[must_use]
    pub fn oai_identifier(&self, druid: &str) -> String {
        format!("oai:{}/druid:{druid}", self.oai_identifier_host)
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Validate an OAI-PMH date (`YYYY-MM-DD` or `YYYY-MM-DDThh:mm:ssZ`).
///
/// # Examples
/// ```
/// use dor_harvester::config::validate_date;
///
/// assert!(validate_date("2012-11-29").is_ok());
/// assert!(validate_date("2012-11-29T10:00:00Z").is_ok());
/// assert!(validate_date("2012-13-01").is_err()); // Invalid month
/// assert!(validate_date("29-11-2012").is_err());
/// ```
pub fn validate_date(date_str: &str) -> Result<()> {
    if !DATE_PATTERN.is_match(date_str) {
        return Err(HarvesterError::InvalidDate(date_str.to_string()));
    }

    let valid = if date_str.len() == 10 {
        chrono::NaiveDate::parse_from_str(date_str, "%Y-%m-%d").is_ok()
    } else {
        chrono::NaiveDateTime::parse_from_str(date_str, "%Y-%m-%dT%H:%M:%SZ").is_ok()
    };

    if valid {
        Ok(())
    } else {
        Err(HarvesterError::InvalidDate(date_str.to_string()))
    }
}

/// PURL page URL for a druid.
///
/// # Examples
/// ```
/// use dor_harvester::config::purl_url;
///
/// assert_eq!(
///     purl_url("https://purl.stanford.edu/", "bb375wb8869"),
///     "https://purl.stanford.edu/bb375wb8869"
/// );
/// ```
pub fn purl_url(base: &str, druid: &str) -> String {
    format!("{}/{druid}", base.trim_end_matches('/'))
}

/// Public XML URL: `<base>/<druid>.xml`.
pub fn public_xml_url(base: &str, druid: &str) -> String {
    format!("{}.xml", purl_url(base, druid))
}

/// MODS URL: `<base>/<druid>.mods`.
pub fn mods_url(base: &str, druid: &str) -> String {
    format!("{}.mods", purl_url(base, druid))
}
