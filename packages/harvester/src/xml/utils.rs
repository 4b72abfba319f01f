//! XML utility functions for navigating DOM trees and cutting out subtrees.

use std::collections::HashSet;

use roxmltree::Node;

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use dor_harvester::xml::get_tag_name;
///
/// let xml = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"/>"#;
/// let doc = Document::parse(xml).unwrap();
/// assert_eq!(get_tag_name(doc.root_element()), "RDF");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Check if a node is an element with the given local name and namespace.
///
/// `None` as namespace only matches elements in no namespace.
pub fn has_expanded_name(node: Node<'_, '_>, namespace: Option<&str>, name: &str) -> bool {
    node.is_element() && get_tag_name(node) == name && node.tag_name().namespace() == namespace
}

/// Find the first child element with the given local name, in any namespace.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use dor_harvester::xml::find_child;
///
/// let xml = r#"<header><identifier>oai:x/druid:foo</identifier></header>"#;
/// let doc = Document::parse(xml).unwrap();
///
/// assert!(find_child(doc.root_element(), "identifier").is_some());
/// assert!(find_child(doc.root_element(), "datestamp").is_none());
/// ```
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && get_tag_name(*child) == tag)
}

/// Find all child elements with the given local name.
pub fn find_children<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.is_element() && get_tag_name(*child) == tag)
}

/// Get the text content of a node, trimmed.
pub fn get_text(node: Node<'_, '_>) -> String {
    node.text()
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Get all element children of a node.
pub fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

/// Serialize an element as a standalone XML document.
///
/// The element's source text is copied verbatim. Namespaces it inherits
/// from ancestors are declared on its start tag so the result parses on its
/// own with the same expanded names.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use dor_harvester::xml::subtree_xml;
///
/// let xml = r#"<publicObject xmlns:dc="http://purl.org/dc/elements/1.1/"><meta><dc:title>T</dc:title></meta></publicObject>"#;
/// let doc = Document::parse(xml).unwrap();
/// let meta = doc.root_element().first_element_child().unwrap();
///
/// assert_eq!(
///     subtree_xml(meta),
///     r#"<meta xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>T</dc:title></meta>"#
/// );
/// ```
pub fn subtree_xml(node: Node<'_, '_>) -> String {
    let source = &node.document().input_text()[node.range()];
    let name_end = start_tag_name_end(source);
    let declared = declared_prefixes(source, name_end);

    let mut inherited = String::new();
    for ns in node.namespaces() {
        let prefix = ns.name();
        if prefix == Some("xml") || declared.contains(&prefix) {
            continue;
        }
        let uri = escape_attribute(ns.uri());
        match prefix {
            Some(p) => inherited.push_str(&format!(" xmlns:{p}=\"{uri}\"")),
            None => inherited.push_str(&format!(" xmlns=\"{uri}\"")),
        }
    }

    if inherited.is_empty() {
        return source.to_string();
    }

    // Insert right after the qualified name in the start tag
    let mut out = String::with_capacity(source.len() + inherited.len());
    out.push_str(&source[..name_end]);
    out.push_str(&inherited);
    out.push_str(&source[name_end..]);
    out
}

/// Byte offset just past the element name of a start tag.
fn start_tag_name_end(source: &str) -> usize {
    source
        .get(1..)
        .and_then(|rest| rest.find(|c: char| c.is_whitespace() || c == '>' || c == '/'))
        .map_or(source.len(), |i| i + 1)
}

/// Namespace prefixes declared on the start tag (`None` for the default
/// namespace).
///
/// Attribute values are skipped as quoted strings, so `>` or `xmlns` text
/// inside a value is never mistaken for markup.
fn declared_prefixes(source: &str, name_end: usize) -> HashSet<Option<&str>> {
    let bytes = source.as_bytes();
    let mut declared = HashSet::new();
    let mut i = name_end;

    loop {
        while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
            i += 1;
        }
        if matches!(bytes.get(i), None | Some(b'>' | b'/')) {
            break;
        }

        let name_start = i;
        while bytes
            .get(i)
            .is_some_and(|b| *b != b'=' && !b.is_ascii_whitespace())
        {
            i += 1;
        }
        let name = &source[name_start..i];
        while bytes
            .get(i)
            .is_some_and(|b| *b == b'=' || b.is_ascii_whitespace())
        {
            i += 1;
        }

        let quote = match bytes.get(i) {
            Some(q @ (b'"' | b'\'')) => *q,
            _ => break,
        };
        match bytes[i + 1..].iter().position(|b| *b == quote) {
            Some(len) => i += len + 2,
            None => break,
        }

        if name == "xmlns" {
            declared.insert(None);
        } else if let Some(prefix) = name.strip_prefix("xmlns:") {
            declared.insert(Some(prefix));
        }
    }

    declared
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    #[test]
    fn test_get_tag_name_with_namespace() {
        let xml = r#"<ns:root xmlns:ns="http://example.com"><ns:child/></ns:root>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(get_tag_name(doc.root_element()), "root");
    }

    #[test]
    fn test_has_expanded_name() {
        let xml = r#"<root xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"><rdf:RDF/><plain/></root>"#;
        let doc = Document::parse(xml).unwrap();
        let rdf = doc.root_element().first_element_child().unwrap();
        let plain = doc.root_element().last_element_child().unwrap();

        assert!(has_expanded_name(
            rdf,
            Some("http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
            "RDF"
        ));
        assert!(!has_expanded_name(rdf, None, "RDF"));
        assert!(has_expanded_name(plain, None, "plain"));
    }

    #[test]
    fn test_find_children() {
        let xml = r#"<header><setSpec>a</setSpec><identifier/><setSpec>b</setSpec></header>"#;
        let doc = Document::parse(xml).unwrap();
        let specs: Vec<_> = find_children(doc.root_element(), "setSpec")
            .map(get_text)
            .collect();
        assert_eq!(specs, vec!["a", "b"]);
    }

    #[test]
    fn test_get_text() {
        let xml = r#"<root>  trimmed text  </root>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(get_text(doc.root_element()), "trimmed text");
    }

    #[test]
    fn test_element_children() {
        let xml = r#"<root>text<child1/>more<child2/></root>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(element_children(doc.root_element()).count(), 2);
    }

    #[test]
    fn test_subtree_xml_without_inherited_namespaces() {
        let xml = r#"<publicObject id="druid:bb375wb8869"><contentMetadata type='image' objectId='bb375wb8869'>foo</contentMetadata></publicObject>"#;
        let doc = Document::parse(xml).unwrap();
        let cm = doc.root_element().first_element_child().unwrap();
        assert_eq!(
            subtree_xml(cm),
            "<contentMetadata type='image' objectId='bb375wb8869'>foo</contentMetadata>"
        );
    }

    #[test]
    fn test_subtree_xml_keeps_own_declaration() {
        let xml = r#"<publicObject><rdf:RDF xmlns:rdf='http://www.w3.org/1999/02/22-rdf-syntax-ns#'><rdf:Description/></rdf:RDF></publicObject>"#;
        let doc = Document::parse(xml).unwrap();
        let rdf = doc.root_element().first_element_child().unwrap();
        assert_eq!(
            subtree_xml(rdf),
            "<rdf:RDF xmlns:rdf='http://www.w3.org/1999/02/22-rdf-syntax-ns#'><rdf:Description/></rdf:RDF>"
        );
    }

    #[test]
    fn test_subtree_xml_inherits_default_namespace() {
        let xml = r#"<OAI-PMH xmlns="http://www.openarchives.org/OAI/2.0/"><metadata><x/></metadata></OAI-PMH>"#;
        let doc = Document::parse(xml).unwrap();
        let metadata = doc.root_element().first_element_child().unwrap();
        let out = subtree_xml(metadata);
        assert_eq!(
            out,
            r#"<metadata xmlns="http://www.openarchives.org/OAI/2.0/"><x/></metadata>"#
        );

        let reparsed = Document::parse(&out).unwrap();
        assert_eq!(
            reparsed.root_element().tag_name().namespace(),
            Some("http://www.openarchives.org/OAI/2.0/")
        );
    }

    #[test]
    fn test_subtree_xml_self_closing_element() {
        let xml = r#"<a xmlns:p="urn:p"><p:b/></a>"#;
        let doc = Document::parse(xml).unwrap();
        let b = doc.root_element().first_element_child().unwrap();
        assert_eq!(subtree_xml(b), r#"<p:b xmlns:p="urn:p"/>"#);
    }

    #[test]
    fn test_subtree_xml_ignores_markup_inside_attribute_values() {
        let xml = r#"<publicObject xmlns:x="urn:x"><contentMetadata note="a>b" xmlns:x="urn:x"><x:file/></contentMetadata></publicObject>"#;
        let doc = Document::parse(xml).unwrap();
        let cm = doc.root_element().first_element_child().unwrap();
        let out = subtree_xml(cm);

        assert_eq!(
            out,
            r#"<contentMetadata note="a>b" xmlns:x="urn:x"><x:file/></contentMetadata>"#
        );
        assert!(Document::parse(&out).is_ok());
    }

    #[test]
    fn test_subtree_xml_declaration_text_in_value_is_not_a_declaration() {
        let xml = r#"<a xmlns:p="urn:p"><p:b label=' xmlns:p="urn:q"'/></a>"#;
        let doc = Document::parse(xml).unwrap();
        let b = doc.root_element().first_element_child().unwrap();
        let out = subtree_xml(b);

        assert_eq!(out, r#"<p:b xmlns:p="urn:p" label=' xmlns:p="urn:q"'/>"#);
        let reparsed = Document::parse(&out).unwrap();
        assert_eq!(reparsed.root_element().tag_name().namespace(), Some("urn:p"));
    }
}
