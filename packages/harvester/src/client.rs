//! The harvester client: configuration, OAI transport and PURL fetcher in one
//! place.

use std::borrow::Cow;

use crate::config::ClientConfig;
use crate::druid::druid;
use crate::error::{HarvesterError, Result};
use crate::harvest::{harvest_headers, harvest_records, Harvest};
use crate::http::create_client;
use crate::metadata::Section;
use crate::oai::{HarvestArguments, Header, OaiClient, OaiTransport, Record};
use crate::options::{normalize, HarvestOptions};
use crate::purl::{PublicXmlSource, PurlFetcher};
use crate::xml::XmlDocument;

/// Harvester client.
///
/// Holds no mutable state; share it freely between harvests. The transport
/// is generic so tests can substitute a fake provider.
///
/// # Examples
/// ```no_run
/// use dor_harvester::{Client, ClientConfig, HarvestOptions};
///
/// let config = ClientConfig::default()
///     .with_default_set(Some("is_member_of_collection_ab123cd4567".into()));
/// let client = Client::new(config)?;
/// for druid in client.harvest_ids(&HarvestOptions::new().from_date("2014-01-01")) {
///     let druid = druid?;
///     let content = client.content_metadata(&druid)?;
///     println!("{druid}: {}", content.root_attribute("type").unwrap_or_default());
/// }
/// # Ok::<(), dor_harvester::HarvesterError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Client<T: OaiTransport = OaiClient> {
    config: ClientConfig,
    transport: T,
    purl: PurlFetcher,
}

impl Client<OaiClient> {
    /// Build a client talking to the configured OAI provider and PURL server.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = create_client(&config.http)?;
        let transport = OaiClient::new(http.clone(), config.oai_repository_url.as_str());
        let purl = PurlFetcher::new(http, config.purl.as_str());
        Ok(Self {
            config,
            transport,
            purl,
        })
    }
}

impl<T: OaiTransport> Client<T> {
    /// Build a client around a caller-supplied OAI transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self> {
        config.validate()?;
        let http = create_client(&config.http)?;
        let purl = PurlFetcher::new(http, config.purl.as_str());
        Ok(Self {
            config,
            transport,
            purl,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[must_use]
    pub fn purl(&self) -> &PurlFetcher {
        &self.purl
    }

    /// Listing arguments for one harvest: `options` over the configured
    /// defaults, with empty values dropped.
    #[must_use]
    pub fn oai_options(&self, options: &HarvestOptions) -> HarvestArguments {
        normalize(options, &self.config.default_harvest_arguments())
    }

    /// Lazily harvest headers (`ListIdentifiers`).
    pub fn harvest_headers(&self, options: &HarvestOptions) -> Harvest<'_, T, Header> {
        let args = self.oai_options(options);
        tracing::info!(?args, "Harvesting headers");
        harvest_headers(&self.transport, args)
    }

    /// Lazily harvest full records (`ListRecords`).
    pub fn harvest_records(&self, options: &HarvestOptions) -> Harvest<'_, T, Record> {
        let args = self.oai_options(options);
        tracing::info!(?args, "Harvesting records");
        harvest_records(&self.transport, args)
    }

    /// Lazily harvest druids, one per header.
    pub fn harvest_ids(
        &self,
        options: &HarvestOptions,
    ) -> impl Iterator<Item = Result<String>> + '_ {
        self.harvest_headers(options)
            .map(|header| header.map(|h| druid(&h).to_string()))
    }

    /// Fetch one record with `GetRecord`. Falls back to the configured
    /// metadata prefix when `metadata_prefix` is `None` or empty.
    pub fn oai_record(&self, druid: &str, metadata_prefix: Option<&str>) -> Result<Record> {
        let prefix = metadata_prefix
            .filter(|p| !p.is_empty())
            .unwrap_or(self.config.default_metadata_prefix.as_str());
        let identifier = self.config.oai_identifier(druid);

        self.transport.get_record(&identifier, prefix).map_err(|source| {
            tracing::error!(identifier = %identifier, error = %source, "OAI GetRecord failed");
            HarvesterError::Record { identifier, source }
        })
    }

    pub fn public_xml(&self, druid: &str) -> Result<XmlDocument> {
        self.purl.public_xml(druid)
    }

    pub fn pub_xml<'a>(
        &self,
        source: impl Into<PublicXmlSource<'a>>,
    ) -> Result<Cow<'a, XmlDocument>> {
        self.purl.pub_xml(source)
    }

    pub fn metadata<'a>(
        &self,
        source: impl Into<PublicXmlSource<'a>>,
        section: Section,
    ) -> Result<XmlDocument> {
        self.purl.metadata(source, section)
    }

    pub fn content_metadata<'a>(
        &self,
        source: impl Into<PublicXmlSource<'a>>,
    ) -> Result<XmlDocument> {
        self.purl.content_metadata(source)
    }

    pub fn identity_metadata<'a>(
        &self,
        source: impl Into<PublicXmlSource<'a>>,
    ) -> Result<XmlDocument> {
        self.purl.identity_metadata(source)
    }

    pub fn rights_metadata<'a>(
        &self,
        source: impl Into<PublicXmlSource<'a>>,
    ) -> Result<XmlDocument> {
        self.purl.rights_metadata(source)
    }

    pub fn rdf<'a>(&self, source: impl Into<PublicXmlSource<'a>>) -> Result<XmlDocument> {
        self.purl.rdf(source)
    }

    pub fn dc<'a>(&self, source: impl Into<PublicXmlSource<'a>>) -> Result<XmlDocument> {
        self.purl.dc(source)
    }

    pub fn mods(&self, druid: &str) -> Result<XmlDocument> {
        self.purl.mods(druid)
    }
}
