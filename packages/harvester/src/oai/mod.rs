//! OAI-PMH transport: data types, the transport trait, and an HTTP client.

mod client;
mod parse;
mod transport;
mod types;

pub use client::OaiClient;
pub use parse::{parse_get_record, parse_list_identifiers, parse_list_records};
pub use transport::{OaiTransport, TransportError};
pub use types::{HarvestArguments, Header, ListRequest, Page, Record, Verb};
