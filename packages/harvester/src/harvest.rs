//! Lazy walk over a paginated OAI listing.
//!
//! [`Harvest`] issues the first listing request when it is first polled and
//! asks for the next page only after every entry of the current page has been
//! handed out. Dropping the iterator early therefore never fetches later
//! pages. A transport failure is logged, yielded once as
//! [`HarvesterError::Harvest`], and ends the sequence.

use crate::error::{HarvesterError, Result};
use crate::oai::{
    HarvestArguments, Header, ListRequest, OaiTransport, Page, Record, TransportError, Verb,
};

/// An entry type produced by a listing verb.
pub trait ListEntry: Sized {
    /// The verb that lists this entry type.
    const VERB: Verb;

    /// Request one page of entries.
    fn list<T: OaiTransport + ?Sized>(
        transport: &T,
        request: ListRequest<'_>,
    ) -> std::result::Result<Page<Self>, TransportError>;
}

impl ListEntry for Header {
    const VERB: Verb = Verb::ListIdentifiers;

    fn list<T: OaiTransport + ?Sized>(
        transport: &T,
        request: ListRequest<'_>,
    ) -> std::result::Result<Page<Self>, TransportError> {
        transport.list_identifiers(request)
    }
}

impl ListEntry for Record {
    const VERB: Verb = Verb::ListRecords;

    fn list<T: OaiTransport + ?Sized>(
        transport: &T,
        request: ListRequest<'_>,
    ) -> std::result::Result<Page<Self>, TransportError> {
        transport.list_records(request)
    }
}

/// What to request next.
#[derive(Debug)]
enum NextRequest {
    Initial(HarvestArguments),
    Resume(String),
    Done,
}

/// Iterator over every entry of an OAI listing, following resumption tokens.
///
/// Not restartable: once it returns `None` (or an error), it stays finished.
/// Collect into `Result<Vec<_>>` to materialize the whole harvest.
pub struct Harvest<'t, T: OaiTransport + ?Sized, E: ListEntry> {
    transport: &'t T,
    next: NextRequest,
    buffer: std::vec::IntoIter<E>,
    pages: usize,
}

impl<'t, T: OaiTransport + ?Sized, E: ListEntry> Harvest<'t, T, E> {
    /// Prepare a harvest. No request is sent until the first `next()`.
    pub fn new(transport: &'t T, args: HarvestArguments) -> Self {
        Self {
            transport,
            next: NextRequest::Initial(args),
            buffer: Vec::new().into_iter(),
            pages: 0,
        }
    }

    /// Number of pages requested so far.
    #[must_use]
    pub fn pages_requested(&self) -> usize {
        self.pages
    }

    fn fetch_page(&mut self) -> Option<Result<()>> {
        let page = match std::mem::replace(&mut self.next, NextRequest::Done) {
            NextRequest::Done => return None,
            NextRequest::Initial(args) => E::list(self.transport, ListRequest::Arguments(&args)),
            NextRequest::Resume(token) => {
                tracing::debug!(verb = %E::VERB, token = %token, "Requesting next page");
                E::list(self.transport, ListRequest::ResumptionToken(&token))
            }
        };
        self.pages += 1;

        match page {
            Ok(page) => {
                if page.entries.is_empty() {
                    return None;
                }
                if let Some(token) = page.next_token() {
                    self.next = NextRequest::Resume(token.to_string());
                }
                self.buffer = page.entries.into_iter();
                Some(Ok(()))
            }
            Err(source) => {
                log_failure(E::VERB, &source);
                Some(Err(HarvesterError::Harvest {
                    verb: E::VERB,
                    source,
                }))
            }
        }
    }
}

fn log_failure(verb: Verb, error: &TransportError) {
    match error {
        TransportError::Timeout(_) => {
            tracing::error!(%verb, error = %error, "No response from OAI provider");
        }
        TransportError::Protocol { code, .. } => {
            tracing::error!(
                %verb,
                code = %code,
                error = %error,
                "Received unexpected OAI-PMH error"
            );
        }
        _ => {
            tracing::error!(%verb, error = %error, "OAI harvest failed");
        }
    }
}

impl<T: OaiTransport + ?Sized, E: ListEntry> Iterator for Harvest<'_, T, E> {
    type Item = Result<E>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.buffer.next() {
                return Some(Ok(entry));
            }
            match self.fetch_page()? {
                Ok(()) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Harvest headers with `ListIdentifiers`.
pub fn harvest_headers<T: OaiTransport + ?Sized>(
    transport: &T,
    args: HarvestArguments,
) -> Harvest<'_, T, Header> {
    Harvest::new(transport, args)
}

/// Harvest records with `ListRecords`.
pub fn harvest_records<T: OaiTransport + ?Sized>(
    transport: &T,
    args: HarvestArguments,
) -> Harvest<'_, T, Record> {
    Harvest::new(transport, args)
}
