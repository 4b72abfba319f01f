//! Public XML and MODS fetching against a mock PURL server.

use std::borrow::Cow;

use pretty_assertions::assert_eq;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dor_harvester::config::{HttpOptions, MODS_NAMESPACE, OAI_DC_NAMESPACE, RDF_NAMESPACE};
use dor_harvester::http::create_client;
use dor_harvester::{Client, ClientConfig, HarvesterError, PurlFetcher, Section, XmlDocument};

const DRUID: &str = "bb375wb8869";
const FAKE_DRUID: &str = "oo000oo0000";

const PUBLIC_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<publicObject id="druid:bb375wb8869" published="2012-11-29T10:00:00-08:00">
  <identityMetadata>
    <objectId>druid:bb375wb8869</objectId>
    <objectLabel>Bureau of Land Management survey</objectLabel>
  </identityMetadata>
  <contentMetadata type="image" objectId="bb375wb8869">
    <resource sequence="1" type="image" id="bb375wb8869_1">
      <file id="bb375wb8869_00_0001.jp2" mimetype="image/jp2" size="3182927"/>
    </resource>
  </contentMetadata>
  <rightsMetadata>
    <access type="discover"><machine><world/></machine></access>
  </rightsMetadata>
  <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
    <rdf:Description rdf:about="info:fedora/druid:bb375wb8869">
      <fedora:isMemberOf xmlns:fedora="info:fedora/fedora-system:def/relations-external#" rdf:resource="info:fedora/druid:yg867hg1375"/>
    </rdf:Description>
  </rdf:RDF>
  <oai_dc:dc xmlns:oai_dc="http://www.openarchives.org/OAI/2.0/oai_dc/" xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:title>Bureau of Land Management survey</dc:title>
  </oai_dc:dc>
</publicObject>"#;

const MODS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<mods xmlns="http://www.loc.gov/mods/v3" version="3.3">
  <titleInfo><title>Bureau of Land Management survey</title></titleInfo>
</mods>"#;

async fn serve(server: &MockServer, url_path: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(url_path))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_public_xml() {
    let mock_server = MockServer::start().await;
    serve(
        &mock_server,
        "/bb375wb8869.xml",
        ResponseTemplate::new(200).set_body_string(PUBLIC_XML),
    )
    .await;

    let uri = mock_server.uri();
    let doc = tokio::task::spawn_blocking(move || {
        let config = ClientConfig::default().with_purl(uri);
        Client::new(config).expect("client creation").public_xml(DRUID)
    })
    .await
    .expect("join")
    .expect("public xml");

    assert_eq!(doc.root_name().as_deref(), Some("publicObject"));
    assert_eq!(doc.root_attribute("id").as_deref(), Some("druid:bb375wb8869"));
}

#[tokio::test]
async fn test_unknown_druid_is_missing_purl_page() {
    let mock_server = MockServer::start().await;
    serve(&mock_server, "/oo000oo0000.xml", ResponseTemplate::new(404)).await;

    let fetcher = fetcher_blocking(&mock_server).await;
    let result = tokio::task::spawn_blocking(move || fetcher.public_xml(FAKE_DRUID))
        .await
        .expect("join");

    match result {
        Err(HarvesterError::MissingPurlPage { druid, source }) => {
            assert_eq!(druid, FAKE_DRUID);
            assert!(source.is_client_error());
        }
        other => panic!("expected MissingPurlPage, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_body_is_missing_public_xml() {
    let mock_server = MockServer::start().await;
    serve(
        &mock_server,
        "/bb375wb8869.xml",
        ResponseTemplate::new(200).set_body_string(""),
    )
    .await;

    let fetcher = fetcher_blocking(&mock_server).await;
    let result = tokio::task::spawn_blocking(move || fetcher.public_xml(DRUID))
        .await
        .expect("join");

    assert!(matches!(
        result,
        Err(HarvesterError::MissingPublicXml { ref druid, .. }) if druid == DRUID
    ));
}

#[tokio::test]
async fn test_html_body_is_missing_public_xml() {
    let mock_server = MockServer::start().await;
    serve(
        &mock_server,
        "/bb375wb8869.xml",
        ResponseTemplate::new(200).set_body_string("<html><body>Not XML<br></body></html>"),
    )
    .await;

    let fetcher = fetcher_blocking(&mock_server).await;
    let result = tokio::task::spawn_blocking(move || fetcher.public_xml(DRUID))
        .await
        .expect("join");

    assert!(matches!(result, Err(HarvesterError::MissingPublicXml { .. })));
}

#[tokio::test]
async fn test_sections_by_druid() {
    let mock_server = MockServer::start().await;
    serve(
        &mock_server,
        "/bb375wb8869.xml",
        ResponseTemplate::new(200).set_body_string(PUBLIC_XML),
    )
    .await;

    let fetcher = fetcher_blocking(&mock_server).await;
    let (content, identity, rights, rdf, dc) = tokio::task::spawn_blocking(move || {
        (
            fetcher.content_metadata(DRUID).expect("contentMetadata"),
            fetcher.identity_metadata(DRUID).expect("identityMetadata"),
            fetcher.rights_metadata(DRUID).expect("rightsMetadata"),
            fetcher.rdf(DRUID).expect("rdf"),
            fetcher.dc(DRUID).expect("dc"),
        )
    })
    .await
    .expect("join");

    assert_eq!(content.root_name().as_deref(), Some("contentMetadata"));
    assert_eq!(content.root_attribute("objectId").as_deref(), Some(DRUID));
    assert_eq!(content.root_attribute("type").as_deref(), Some("image"));
    assert_eq!(identity.root_name().as_deref(), Some("identityMetadata"));
    assert_eq!(rights.root_name().as_deref(), Some("rightsMetadata"));
    assert_eq!(rdf.root_namespace().as_deref(), Some(RDF_NAMESPACE));
    assert!(rdf.as_str().contains("info:fedora/druid:yg867hg1375"));
    assert_eq!(dc.root_namespace().as_deref(), Some(OAI_DC_NAMESPACE));
    assert!(dc.as_str().contains("Bureau of Land Management survey"));
}

#[tokio::test]
async fn test_sections_of_a_fetched_document_make_no_requests() {
    let mock_server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let fetcher = fetcher_blocking(&mock_server).await;
    tokio::task::spawn_blocking(move || {
        let doc = XmlDocument::parse(PUBLIC_XML).expect("fixture parse");

        let same = fetcher.pub_xml(&doc).expect("pub_xml");
        assert!(matches!(same, Cow::Borrowed(d) if std::ptr::eq(d, &doc)));

        for section in Section::ALL {
            assert!(fetcher.metadata(&doc, section).is_ok(), "{section}");
        }
    })
    .await
    .expect("join");
}

#[tokio::test]
async fn test_missing_section_of_fetched_page() {
    let mock_server = MockServer::start().await;
    serve(
        &mock_server,
        "/bb375wb8869.xml",
        ResponseTemplate::new(200).set_body_string(
            "<publicObject id='druid:bb375wb8869'><contentMetadata type='image'/></publicObject>",
        ),
    )
    .await;

    let fetcher = fetcher_blocking(&mock_server).await;
    let (content, identity) = tokio::task::spawn_blocking(move || {
        (fetcher.content_metadata(DRUID), fetcher.identity_metadata(DRUID))
    })
    .await
    .expect("join");

    assert!(matches!(content, Err(HarvesterError::MissingContentMetadata(ref d)) if d == DRUID));
    assert!(matches!(identity, Err(HarvesterError::MissingIdentityMetadata(_))));
}

#[tokio::test]
async fn test_section_of_unknown_druid_is_missing_purl_page() {
    let mock_server = MockServer::start().await;
    serve(&mock_server, "/oo000oo0000.xml", ResponseTemplate::new(404)).await;

    let fetcher = fetcher_blocking(&mock_server).await;
    let result = tokio::task::spawn_blocking(move || fetcher.rights_metadata(FAKE_DRUID))
        .await
        .expect("join");

    assert!(matches!(result, Err(HarvesterError::MissingPurlPage { .. })));
}

#[tokio::test]
async fn test_mods() {
    let mock_server = MockServer::start().await;
    serve(
        &mock_server,
        "/bb375wb8869.mods",
        ResponseTemplate::new(200).set_body_string(MODS),
    )
    .await;
    serve(&mock_server, "/oo000oo0000.mods", ResponseTemplate::new(404)).await;

    let fetcher = fetcher_blocking(&mock_server).await;
    let (found, missing) = tokio::task::spawn_blocking(move || {
        (fetcher.mods(DRUID), fetcher.mods(FAKE_DRUID))
    })
    .await
    .expect("join");

    let mods = found.expect("mods");
    assert_eq!(mods.root_name().as_deref(), Some("mods"));
    assert_eq!(mods.root_namespace().as_deref(), Some(MODS_NAMESPACE));
    assert!(matches!(
        missing,
        Err(HarvesterError::MissingMods { ref druid, .. }) if druid == FAKE_DRUID
    ));
}

/// The blocking client must be built off the async runtime.
async fn fetcher_blocking(server: &MockServer) -> PurlFetcher {
    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        PurlFetcher::new(
            create_client(&HttpOptions::default()).expect("client creation"),
            uri,
        )
    })
    .await
    .expect("join")
}
