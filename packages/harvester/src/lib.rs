//! DOR Harvester - Harvest object metadata from the Stanford Digital Object
//! Repository.
//!
//! This crate walks an OAI-PMH provider's paginated listings and fetches
//! published object XML from the PURL server, cutting it into its metadata
//! sections.
//!
//! # Example
//!
//! ```
//! use dor_harvester::{druid, config};
//!
//! assert_eq!(druid("oai:searchworks.stanford.edu/druid:bb375wb8869"), "bb375wb8869");
//! assert!(config::validate_date("2012-11-29").is_ok());
//! ```
//!
//! # Architecture
//!
//! The harvester is organized into several modules:
//!
//! - [`config`]: Configuration defaults, loading and validation
//! - [`error`]: Error types and Result alias
//! - [`http`]: Blocking HTTP client with retry
//! - [`xml`]: XML utilities
//! - [`oai`]: OAI-PMH types, response parsing and transport
//! - [`druid`]: Druid extraction from OAI identifiers
//! - [`options`]: Per-call harvest options and their normalization
//! - [`harvest`]: Lazy iteration over paginated listings
//! - [`purl`]: Public XML and MODS fetching
//! - [`metadata`]: Metadata sections of the public XML
//! - [`client`]: The client tying it all together
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod client;
pub mod config;
pub mod druid;
pub mod error;
pub mod harvest;
pub mod http;
pub mod metadata;
pub mod oai;
pub mod options;
pub mod purl;
pub mod xml;

pub use client::Client;
pub use config::{validate_date, ClientConfig};
pub use druid::druid;
pub use error::{HarvesterError, Result};
pub use harvest::Harvest;
pub use metadata::Section;
pub use oai::{Header, Record};
pub use options::HarvestOptions;
pub use purl::{PublicXmlSource, PurlFetcher};
pub use xml::XmlDocument;
