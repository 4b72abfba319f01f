//! OAI-PMH data types.

use std::fmt;

use crate::xml::XmlDocument;

/// OAI-PMH verbs used by the harvester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    ListIdentifiers,
    ListRecords,
    GetRecord,
}

impl Verb {
    /// Protocol spelling of the verb.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListIdentifiers => "ListIdentifiers",
            Self::ListRecords => "ListRecords",
            Self::GetRecord => "GetRecord",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OAI record header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// OAI identifier, e.g. `oai:searchworks.stanford.edu/druid:bb375wb8869`.
    pub identifier: String,

    /// Datestamp of the metadata.
    pub datestamp: String,

    /// Sets the item belongs to.
    pub set_specs: Vec<String>,

    /// `status="deleted"` on the header.
    pub deleted: bool,
}

impl Header {
    #[must_use]
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            datestamp: String::new(),
            set_specs: Vec::new(),
            deleted: false,
        }
    }
}

/// OAI record: header plus the metadata payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub header: Header,

    /// Metadata payload as a standalone document. `None` for deleted records.
    pub metadata: Option<XmlDocument>,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<E> {
    pub entries: Vec<E>,

    /// Resumption token. Absent or empty marks the final page.
    pub resumption_token: Option<String>,
}

impl<E> Page<E> {
    /// Final page with the given entries.
    #[must_use]
    pub fn last(entries: Vec<E>) -> Self {
        Self {
            entries,
            resumption_token: None,
        }
    }

    /// Page followed by another one.
    #[must_use]
    pub fn with_token(entries: Vec<E>, token: impl Into<String>) -> Self {
        Self {
            entries,
            resumption_token: Some(token.into()),
        }
    }

    /// Non-empty resumption token, if any.
    #[must_use]
    pub fn next_token(&self) -> Option<&str> {
        self.resumption_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }
}

/// Normalized listing arguments. Only present keys are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestArguments {
    pub metadata_prefix: Option<String>,
    pub from: Option<String>,
    pub until: Option<String>,
    pub set: Option<String>,
}

impl HarvestArguments {
    /// Query parameters in protocol spelling, skipping absent keys.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("metadataPrefix", &self.metadata_prefix),
            ("from", &self.from),
            ("until", &self.until),
            ("set", &self.set),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
        .collect()
    }
}

/// A listing request: either the first request with filter arguments, or a
/// continuation that carries only the resumption token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListRequest<'a> {
    Arguments(&'a HarvestArguments),
    ResumptionToken(&'a str),
}

impl<'a> ListRequest<'a> {
    /// Query parameters for this request, including the verb.
    #[must_use]
    pub fn query_pairs(&self, verb: Verb) -> Vec<(&'static str, &'a str)> {
        let mut pairs = vec![("verb", verb.as_str())];
        match *self {
            Self::Arguments(args) => pairs.extend(args.query_pairs()),
            Self::ResumptionToken(token) => pairs.push(("resumptionToken", token)),
        }
        pairs
    }
}
