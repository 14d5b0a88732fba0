//! Full provider round trips over real HTTP against WireMock.

use std::sync::Once;

use chrono::NaiveDate;
use transit_scraper::domain::{Location, LocationType, Product};
use transit_scraper::provider::{
    BAHN, ConnectionsContext, ConnectionsQuery, ConnectionsStatus, DeparturesStatus, Provider,
    ProviderError, RMV,
};
use transit_scraper::text::Encoding;
use transit_scraper::transport::{HttpTransport, HttpTransportConfig, NetworkError, Transport};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

/// Sends requests meant for a live backend to the mock server instead.
struct Rebased {
    inner: HttpTransport,
    from: &'static str,
    to: String,
}

impl Rebased {
    fn new(from: &'static str, server: &MockServer, prefix: &str) -> Self {
        Self {
            inner: HttpTransport::new(HttpTransportConfig::new().with_timeout(5)).unwrap(),
            from,
            to: format!("{}{}", server.uri(), prefix),
        }
    }
}

impl Transport for Rebased {
    async fn fetch_text(&self, url: &str, encoding: Encoding) -> Result<String, NetworkError> {
        let url = url.replacen(self.from, &self.to, 1);
        self.inner.fetch_text(&url, encoding).await
    }
}

#[tokio::test]
async fn bahn_departures_over_http() {
    init_tracing();
    let server = MockServer::start().await;
    let board = include_bytes!("../data/fixtures/bahn_departures.xml");
    Mock::given(method("GET"))
        .and(path("/bin/mobil/stboard.exe/dn"))
        .and(query_param("input", "8000105"))
        .and(query_param("L", "vs_java3"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(board.to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let provider = Provider::bahn(Rebased::new(BAHN.api_base, &server, "/bin/mobil/"));
    let result = provider.query_departures(8000105, 0, true).await.unwrap();

    assert_eq!(result.status, DeparturesStatus::Ok);
    let main = result.find(8000105).unwrap();
    assert_eq!(main.departures[0].destination, "München Hbf");
    assert_eq!(main.departures[0].line.product, Product::HighSpeedTrain);
}

#[tokio::test]
async fn backend_outage_surfaces_as_network_error() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let provider = Provider::bahn(Rebased::new(BAHN.api_base, &server, "/bin/mobil/"));
    let err = provider
        .autocomplete_stations("Frankfurt")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::Network(NetworkError::Status { status: 502, .. })
    ));
}

#[tokio::test]
async fn rmv_connections_and_later_page() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auskunft/bin/jp/query.exe/dn"))
        .and(query_param("ident", "7k.0385.1"))
        .and(query_param("REQ0HafasScrollDir", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(include_str!("../data/fixtures/rmv_connections_later.xml")),
        )
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auskunft/bin/jp/query.exe/dn"))
        .and(query_param("start", "Suchen"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(include_str!("../data/fixtures/rmv_connections.xml")),
        )
        .mount(&server)
        .await;

    let provider = Provider::rmv(Rebased::new(RMV.api_base, &server, "/auskunft/bin/jp/"));
    let when = NaiveDate::from_ymd_opt(2012, 5, 1)
        .unwrap()
        .and_hms_opt(8, 15, 0)
        .unwrap();
    let query = ConnectionsQuery::new(
        Location::new(LocationType::Station, 3000001, 0, 0, "Hauptwache").unwrap(),
        Location::new(LocationType::Station, 3000912, 0, 0, "Südbahnhof").unwrap(),
        when,
    );

    let first = provider.query_connections(&query).await.unwrap();
    assert_eq!(first.status, ConnectionsStatus::Ok);
    assert!(!first.connections.is_empty());

    // A caller that only kept the token can still page.
    let token = first.context.unwrap().to_token().unwrap();
    let context = ConnectionsContext::from_token(&token).unwrap();
    let later = provider.query_more_connections(&context, true).await.unwrap();

    assert_eq!(later.status, ConnectionsStatus::Ok);
    assert_eq!(later.from, query.from);
    assert_eq!(later.to, query.to);
    assert_eq!(later.connections[0].id, "C1-0");
}
