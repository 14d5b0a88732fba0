//! The provider engine.
//!
//! One generic client drives every backend. The differences between
//! backends live in their [`ProviderConfig`]; the client only picks the
//! request, hands it to the transport and routes the payload to a parser.

use tracing::{debug, instrument};

use super::bahn::BAHN;
use super::config::{Capability, ProviderConfig};
use super::context::ConnectionsContext;
use super::error::ProviderError;
use super::query::{
    ConnectionsQuery, NearbyRequest, autocomplete_url, connections_url, departures_url,
    more_connections_url, nearby_stations_url,
};
use super::result::{
    ConnectionsStatus, NearbyStationsResult, QueryConnectionsResult, QueryDeparturesResult,
};
use super::rmv::RMV;
use crate::domain::{ConfigurationError, Location};
use crate::parse::{board, connections, html, json};
use crate::transport::Transport;

/// A timetable backend reachable through a transport.
///
/// Holds no mutable state; every operation is one round trip.
#[derive(Debug, Clone)]
pub struct Provider<T> {
    config: &'static ProviderConfig,
    transport: T,
}

impl<T: Transport> Provider<T> {
    pub fn new(config: &'static ProviderConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// Deutsche Bahn.
    pub fn bahn(transport: T) -> Self {
        Self::new(&BAHN, transport)
    }

    /// Rhein-Main-Verkehrsverbund.
    pub fn rmv(transport: T) -> Self {
        Self::new(&RMV, transport)
    }

    pub fn config(&self) -> &'static ProviderConfig {
        self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// True if every listed capability is supported.
    pub fn has_capabilities(&self, capabilities: &[Capability]) -> bool {
        self.config.has_capabilities(capabilities)
    }

    fn require(&self, capability: Capability) -> Result<(), ConfigurationError> {
        if self.config.has_capabilities(&[capability]) {
            Ok(())
        } else {
            Err(ConfigurationError::UnsupportedCapability(capability.as_str()))
        }
    }

    async fn fetch(&self, url: &str) -> Result<String, ProviderError> {
        debug!(network = %self.config.network, url, "fetching");
        Ok(self.transport.fetch_text(url, self.config.encoding).await?)
    }

    /// Stations near a location.
    ///
    /// A location with a coordinate is looked up by coordinate, a station
    /// by id. `max_distance` is in metres; `0` for either limit means the
    /// backend default, and `max_stations == 0` returns everything found.
    #[instrument(skip(self), fields(network = %self.config.network))]
    pub async fn query_nearby_stations(
        &self,
        location: &Location,
        max_distance: u32,
        max_stations: usize,
    ) -> Result<NearbyStationsResult, ProviderError> {
        self.require(Capability::NearbyStations)?;

        let request = nearby_stations_url(self.config, location, max_distance, max_stations)?;
        let mut stations = match request {
            NearbyRequest::ByCoordinate(url) => {
                let body = self.fetch(&url).await?;
                match json::nearby_stops(&body)? {
                    json::NearbyStops::Stations(stations) => stations,
                    json::NearbyStops::ServiceDown => {
                        return Ok(NearbyStationsResult::service_down());
                    }
                }
            }
            NearbyRequest::ByStation(url) => {
                let page = self.fetch(&url).await?;
                if page.trim().is_empty() {
                    return Ok(NearbyStationsResult::service_down());
                }
                html::stations_from_links(self.config.nearby_station_link, &page)?
            }
        };

        if max_stations > 0 && stations.len() > max_stations {
            stations.truncate(max_stations);
        }
        debug!(count = stations.len(), "nearby stations");
        Ok(NearbyStationsResult::ok(stations))
    }

    /// Departure boards for a station.
    ///
    /// With `include_equivalents` the backend also returns boards for
    /// stations it considers the same place. `max_departures == 0` keeps
    /// every departure; otherwise each board is cut to that length.
    #[instrument(skip(self), fields(network = %self.config.network))]
    pub async fn query_departures(
        &self,
        station_id: u32,
        max_departures: usize,
        include_equivalents: bool,
    ) -> Result<QueryDeparturesResult, ProviderError> {
        self.require(Capability::Departures)?;
        if station_id == 0 {
            return Err(ConfigurationError::UnsupportedLocation("station id 0".into()).into());
        }

        let url = departures_url(self.config, station_id, include_equivalents);
        let body = self.fetch(&url).await?;
        let mut result = board::departure_board(self.config, &body, station_id)?;

        if max_departures > 0 {
            for station in &mut result.stations {
                station.departures.truncate(max_departures);
            }
        }
        Ok(result)
    }

    /// Search for connections.
    #[instrument(skip(self), fields(network = %self.config.network))]
    pub async fn query_connections(
        &self,
        query: &ConnectionsQuery,
    ) -> Result<QueryConnectionsResult, ProviderError> {
        self.require(Capability::Connections)?;
        let url = connections_url(self.config, query)?;
        self.connections(url, query).await
    }

    /// Earlier or later connections for a previous search.
    ///
    /// The context is not modified; the result carries a new one.
    #[instrument(skip(self, context), fields(network = %self.config.network))]
    pub async fn query_more_connections(
        &self,
        context: &ConnectionsContext,
        later: bool,
    ) -> Result<QueryConnectionsResult, ProviderError> {
        self.require(Capability::Connections)?;
        if context.network() != self.config.network {
            return Err(ConfigurationError::ForeignContext {
                context: context.network().as_str(),
                provider: self.config.network.as_str(),
            }
            .into());
        }

        let cursor = context.cursor();
        let url = more_connections_url(
            self.config,
            context.query(),
            &cursor.ident,
            &cursor.seqnr,
            later,
        )?;
        self.connections(url, context.query()).await
    }

    async fn connections(
        &self,
        url: String,
        query: &ConnectionsQuery,
    ) -> Result<QueryConnectionsResult, ProviderError> {
        let body = self.fetch(&url).await?;
        let page = connections::connection_page(self.config, &body)?;

        if page.status != ConnectionsStatus::Ok {
            debug!(status = ?page.status, "no connections returned");
        }

        let context = page
            .cursor
            .map(|cursor| ConnectionsContext::new(self.config.network, query.clone(), cursor));

        Ok(QueryConnectionsResult {
            status: page.status,
            from: query.from.clone(),
            via: query.via.clone(),
            to: query.to.clone(),
            context,
            connections: page.connections,
        })
    }

    /// Stations, addresses and places matching free text.
    #[instrument(skip(self), fields(network = %self.config.network))]
    pub async fn autocomplete_stations(&self, text: &str) -> Result<Vec<Location>, ProviderError> {
        self.require(Capability::Autocomplete)?;
        let url = autocomplete_url(self.config, text);
        let body = self.fetch(&url).await?;
        Ok(json::suggestions(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LocationType, Product};
    use crate::provider::{DeparturesStatus, Endpoints, NearbyStatus, NetworkId, ProductTable};
    use crate::text::Encoding;
    use crate::transport::{MockTransport, NetworkError};
    use chrono::NaiveDate;
    use regex::Regex;
    use std::sync::LazyLock;

    const BAHN_BOARD: &str = include_str!("../../data/fixtures/bahn_departures.xml");
    const BAHN_NEARBY_JSON: &str = include_str!("../../data/fixtures/bahn_nearby.json");
    const BAHN_NEARBY_HTML: &str = include_str!("../../data/fixtures/bahn_nearby.html");
    const BAHN_AUTOCOMPLETE: &str = include_str!("../../data/fixtures/bahn_autocomplete.js");
    const RMV_CONNECTIONS: &str = include_str!("../../data/fixtures/rmv_connections.xml");
    const RMV_CONNECTIONS_LATER: &str =
        include_str!("../../data/fixtures/rmv_connections_later.xml");

    const BAHN_BASE: &str = "http://mobile.bahn.de/bin/mobil/";
    const RMV_BASE: &str = "http://www.rmv.de/auskunft/bin/jp/";

    fn rmv_query() -> ConnectionsQuery {
        let when = NaiveDate::from_ymd_opt(2012, 5, 1)
            .unwrap()
            .and_hms_opt(8, 15, 0)
            .unwrap();
        ConnectionsQuery::new(
            Location::station_named(3000001, "Hauptwache"),
            Location::station_named(3000912, "Südbahnhof"),
            when,
        )
    }

    #[tokio::test]
    async fn nearby_by_coordinate_truncates() {
        let transport = MockTransport::new()
            .with_route(format!("{BAHN_BASE}query.exe/dny"), BAHN_NEARBY_JSON);
        let provider = Provider::bahn(transport.clone());
        let location = Location::coordinate(50107149, 8663785);

        let all = provider.query_nearby_stations(&location, 0, 0).await.unwrap();
        assert_eq!(all.status, NearbyStatus::Ok);
        assert_eq!(all.stations.len(), 3);

        let first = provider.query_nearby_stations(&location, 0, 2).await.unwrap();
        assert_eq!(first.stations.len(), 2);
        assert_eq!(first.stations[..], all.stations[..2]);

        let url = transport.last_request().await.unwrap();
        assert!(url.contains("look_maxno=2&"));
    }

    #[tokio::test]
    async fn nearby_by_station_truncates() {
        let transport = MockTransport::new()
            .with_route(format!("{BAHN_BASE}bhftafel.exe/dn"), BAHN_NEARBY_HTML);
        let provider = Provider::bahn(transport);
        let station = Location::station(8000105);

        let all = provider.query_nearby_stations(&station, 0, 0).await.unwrap();
        assert_eq!(all.stations.len(), 3);
        assert_eq!(all.stations[0].id(), 8000105);

        let first = provider.query_nearby_stations(&station, 3000, 1).await.unwrap();
        assert_eq!(first.stations.len(), 1);
        assert_eq!(first.stations[0], all.stations[0]);
    }

    #[tokio::test]
    async fn nearby_service_down() {
        let transport = MockTransport::new().with_route(BAHN_BASE, r#"{"error":"2"}"#);
        let provider = Provider::bahn(transport);
        let result = provider
            .query_nearby_stations(&Location::coordinate(1, 1), 0, 0)
            .await
            .unwrap();
        assert_eq!(result.status, NearbyStatus::ServiceDown);
    }

    #[tokio::test]
    async fn departures_truncated_per_board() {
        let transport =
            MockTransport::new().with_route(format!("{BAHN_BASE}stboard.exe/dn"), BAHN_BOARD);
        let provider = Provider::bahn(transport.clone());

        let result = provider.query_departures(8000105, 2, true).await.unwrap();
        assert_eq!(result.status, DeparturesStatus::Ok);
        assert_eq!(result.find(8000105).unwrap().departures.len(), 2);
        assert_eq!(result.find(8098105).unwrap().departures.len(), 1);

        let url = transport.last_request().await.unwrap();
        assert!(!url.contains("disableEquivs"));
        assert!(url.ends_with("&input=8000105"));
    }

    #[tokio::test]
    async fn departures_reject_station_zero() {
        let transport = MockTransport::new();
        let provider = Provider::bahn(transport.clone());
        let err = provider.query_departures(0, 0, false).await.unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
        assert!(transport.requests().await.is_empty());
    }

    #[tokio::test]
    async fn network_errors_pass_through() {
        let provider = Provider::bahn(MockTransport::new());
        let err = provider.query_departures(8000105, 0, false).await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Network(NetworkError::Status { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn connections_then_more() {
        let transport = MockTransport::new()
            .with_route(format!("{RMV_BASE}query.exe/dn?start=Suchen&REQ0JourneyStopsS0ID=A%3D1%40L%3D3000001&REQ0JourneyStopsZ0ID=A%3D1%40L%3D3000912&REQ0HafasSearchForw=1&REQ0JourneyDate=01.05.12&REQ0JourneyTime=08:15&REQ0JourneyProduct_prod_list_1=1111111111000000&L=vs_java3&ident="), RMV_CONNECTIONS_LATER)
            .with_route(format!("{RMV_BASE}query.exe/dn"), RMV_CONNECTIONS);
        let provider = Provider::rmv(transport.clone());
        let query = rmv_query();

        let first = provider.query_connections(&query).await.unwrap();
        assert_eq!(first.status, ConnectionsStatus::Ok);
        assert_eq!(first.connections.len(), 2);
        assert_eq!(first.from.name(), "Hauptwache");
        let context = first.context.clone().unwrap();

        let later = provider.query_more_connections(&context, true).await.unwrap();
        assert_eq!(later.status, ConnectionsStatus::Ok);
        assert_eq!(later.from, first.from);
        assert_eq!(later.to, first.to);
        assert_eq!(later.connections.len(), 1);
        assert_eq!(later.connections[0].id, "C1-0");

        let next = later.context.unwrap();
        assert_ne!(next, context);
        assert_eq!(first.context.as_ref(), Some(&context));

        let url = transport.last_request().await.unwrap();
        assert!(url.ends_with("&ident=7k.0385.1&seqnr=1&REQ0HafasScrollDir=1"));
    }

    #[tokio::test]
    async fn more_connections_from_token() {
        let transport = MockTransport::new().with_route(RMV_BASE, RMV_CONNECTIONS);
        let provider = Provider::rmv(transport.clone());
        let first = provider.query_connections(&rmv_query()).await.unwrap();
        let token = first.context.unwrap().to_token().unwrap();

        let restored = ConnectionsContext::from_token(&token).unwrap();
        provider.query_more_connections(&restored, false).await.unwrap();
        let url = transport.last_request().await.unwrap();
        assert!(url.ends_with("&REQ0HafasScrollDir=2"));
    }

    #[tokio::test]
    async fn foreign_context_rejected() {
        let transport = MockTransport::new().with_route(RMV_BASE, RMV_CONNECTIONS);
        let rmv = Provider::rmv(transport.clone());
        let context = rmv
            .query_connections(&rmv_query())
            .await
            .unwrap()
            .context
            .unwrap();

        let bahn = Provider::bahn(transport);
        let err = bahn.query_more_connections(&context, true).await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Configuration(ConfigurationError::ForeignContext {
                context: "RMV",
                provider: "DB"
            })
        ));
    }

    #[tokio::test]
    async fn connections_reject_bad_products_before_fetching() {
        let transport = MockTransport::new();
        let provider = Provider::rmv(transport.clone());
        let err = provider
            .query_connections(&rmv_query().with_products("IRZ"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Configuration(ConfigurationError::UnknownProductLetter('Z'))
        ));
        assert!(transport.requests().await.is_empty());
    }

    #[tokio::test]
    async fn autocomplete() {
        let transport = MockTransport::new()
            .with_route(format!("{BAHN_BASE}ajax-getstop.exe/dn"), BAHN_AUTOCOMPLETE);
        let provider = Provider::bahn(transport.clone());

        let locations = provider.autocomplete_stations("Frankfurt").await.unwrap();
        assert_eq!(locations.len(), 3);
        assert_eq!(locations[0].location_type(), LocationType::Station);
        assert_eq!(locations[0].id(), 8000105);
        assert_eq!(locations[1].location_type(), LocationType::Address);
        assert_eq!(locations[2].location_type(), LocationType::Poi);
    }

    static NO_LINKS: LazyLock<Regex> = LazyLock::new(|| Regex::new("^$").unwrap());

    static DEPARTURES_ONLY: ProviderConfig = ProviderConfig {
        network: NetworkId::Db,
        api_base: "http://localhost/",
        endpoints: Endpoints {
            nearby_by_coordinate: "nearby",
            nearby_by_station: "nearby",
            departures: "board",
            autocomplete: "suggest",
            connections: "search",
        },
        nearby_station_link: &NO_LINKS,
        encoding: Encoding::Utf8,
        products: ProductTable {
            width: 2,
            entries: &[(Product::RegionalTrain, &[0]), (Product::Bus, &[1])],
        },
        type_overrides: &[],
        type_fallbacks: &[],
        line_rules: &[],
        line_colors: &[],
        capabilities: &[Capability::Departures],
        connection_params: &[],
    };

    #[tokio::test]
    async fn missing_capability_rejected() {
        let transport = MockTransport::new();
        let provider = Provider::new(&DEPARTURES_ONLY, transport.clone());
        assert!(provider.has_capabilities(&[Capability::Departures]));
        assert!(!provider.has_capabilities(&[Capability::Departures, Capability::Autocomplete]));

        let err = provider.autocomplete_stations("x").await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Configuration(ConfigurationError::UnsupportedCapability("autocomplete"))
        ));
        assert!(transport.requests().await.is_empty());
    }

    #[test]
    fn shorthands_pick_config() {
        assert_eq!(Provider::bahn(MockTransport::new()).config().network, BAHN.network);
        assert_eq!(Provider::rmv(MockTransport::new()).config().products.width, 16);
    }
}
