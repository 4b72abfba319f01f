//! OAI-PMH response parsing.
//!
//! Elements are matched by local name, so responses that omit or change the
//! OAI namespace prefix still parse.

use roxmltree::{Document, Node};

use super::transport::TransportError;
use super::types::{Header, Page, Record, Verb};
use crate::xml::{find_child, find_children, get_tag_name, get_text, subtree_xml, XmlDocument};

/// OAI error code for an empty listing.
const NO_RECORDS_MATCH: &str = "noRecordsMatch";

/// Parse a `ListIdentifiers` response.
pub fn parse_list_identifiers(xml: &str) -> Result<Page<Header>, TransportError> {
    let doc = parse_document(xml)?;
    let Some(list) = verb_element(&doc, Verb::ListIdentifiers)? else {
        return Ok(Page::last(Vec::new()));
    };

    let entries = find_children(list, "header")
        .map(parse_header)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Page {
        entries,
        resumption_token: resumption_token(list),
    })
}

/// Parse a `ListRecords` response.
pub fn parse_list_records(xml: &str) -> Result<Page<Record>, TransportError> {
    let doc = parse_document(xml)?;
    let Some(list) = verb_element(&doc, Verb::ListRecords)? else {
        return Ok(Page::last(Vec::new()));
    };

    let entries = find_children(list, "record")
        .map(parse_record)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Page {
        entries,
        resumption_token: resumption_token(list),
    })
}

/// Parse a `GetRecord` response.
pub fn parse_get_record(xml: &str) -> Result<Record, TransportError> {
    let doc = parse_document(xml)?;
    let get_record = verb_element(&doc, Verb::GetRecord)?
        .ok_or_else(|| TransportError::InvalidResponse("empty GetRecord response".to_string()))?;

    let record = find_child(get_record, "record")
        .ok_or_else(|| TransportError::InvalidResponse("missing <record>".to_string()))?;
    parse_record(record)
}

fn parse_document(xml: &str) -> Result<Document<'_>, TransportError> {
    Document::parse(xml).map_err(|e| TransportError::InvalidResponse(e.to_string()))
}

/// Find the verb element, or `None` for a `noRecordsMatch` listing.
fn verb_element<'a, 'input>(
    doc: &'a Document<'input>,
    verb: Verb,
) -> Result<Option<Node<'a, 'input>>, TransportError> {
    let root = doc.root_element();
    if get_tag_name(root) != "OAI-PMH" {
        return Err(TransportError::InvalidResponse(format!(
            "unexpected root element <{}>",
            get_tag_name(root)
        )));
    }

    if let Some(error) = find_child(root, "error") {
        let code = error.attribute("code").unwrap_or("unknown");
        if code == NO_RECORDS_MATCH && verb != Verb::GetRecord {
            tracing::debug!(%verb, "No records match the request");
            return Ok(None);
        }
        return Err(TransportError::Protocol {
            code: code.to_string(),
            message: get_text(error),
        });
    }

    find_child(root, verb.as_str())
        .map(Some)
        .ok_or_else(|| TransportError::InvalidResponse(format!("missing <{verb}> element")))
}

fn parse_header(node: Node<'_, '_>) -> Result<Header, TransportError> {
    let identifier = find_child(node, "identifier")
        .map(get_text)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| TransportError::InvalidResponse("header without identifier".to_string()))?;

    Ok(Header {
        identifier,
        datestamp: find_child(node, "datestamp")
            .map(get_text)
            .unwrap_or_default(),
        set_specs: find_children(node, "setSpec").map(get_text).collect(),
        deleted: node.attribute("status") == Some("deleted"),
    })
}

fn parse_record(node: Node<'_, '_>) -> Result<Record, TransportError> {
    let header = find_child(node, "header")
        .ok_or_else(|| TransportError::InvalidResponse("record without header".to_string()))
        .and_then(parse_header)?;

    let metadata = find_child(node, "metadata")
        .and_then(|m| m.first_element_child())
        .map(|payload| {
            XmlDocument::parse(subtree_xml(payload)).map_err(|e| {
                TransportError::InvalidResponse(format!(
                    "metadata for {}: {e}",
                    header.identifier
                ))
            })
        })
        .transpose()?;

    Ok(Record { header, metadata })
}

fn resumption_token(list: Node<'_, '_>) -> Option<String> {
    find_child(list, "resumptionToken")
        .map(get_text)
        .filter(|token| !token.is_empty())
}
