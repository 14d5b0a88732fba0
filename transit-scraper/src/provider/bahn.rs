//! Deutsche Bahn mobile endpoints.

use std::sync::LazyLock;

use regex::Regex;

use super::bitmask::ProductTable;
use super::config::{
    Capability, Endpoints, ExtraParam, LineRule, NetworkId, ProviderConfig, TypeRule,
};
use crate::domain::Product;
use crate::text::Encoding;

static NEARBY_STATION_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<a href="http://mobile\.bahn\.de/bin/mobil/bhftafel\.exe/dn[^"]*?evaId=(\d*)&[^"]*?">([^<]*)</a>"#,
    )
    .expect("nearby station regex is valid")
});

/// Russian long-distance train numbers: three digits and a region suffix.
static LINE_RUSSIA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\d{3}(?:AJ|BJ|CJ|DJ|EJ|FJ|GJ|IJ|KJ|LJ|NJ|MJ|OJ|RJ|SJ|TJ|VJ|ZJ|CH|KH|ZH|EI|JA|JI|MZ|SH|SZ|PC|Y|YJ)$",
    )
    .expect("russian line regex is valid")
});

static LINE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2,5}$").expect("line number regex is valid"));

pub static BAHN: ProviderConfig = ProviderConfig {
    network: NetworkId::Db,
    api_base: "http://mobile.bahn.de/bin/mobil/",
    endpoints: Endpoints {
        nearby_by_coordinate: "query.exe/dny",
        nearby_by_station: "bhftafel.exe/dn",
        departures: "stboard.exe/dn",
        autocomplete: "ajax-getstop.exe/dn",
        connections: "query.exe/dn",
    },
    nearby_station_link: &NEARBY_STATION_LINK,
    encoding: Encoding::Latin1,
    products: ProductTable {
        width: 14,
        entries: &[
            (Product::HighSpeedTrain, &[0, 1]),
            (Product::RegionalTrain, &[2, 3]),
            (Product::SuburbanTrain, &[4]),
            (Product::Bus, &[5]),
            (Product::Ferry, &[6]),
            (Product::Subway, &[7]),
            (Product::Tram, &[8]),
            (Product::OnDemand, &[9]),
            (Product::Cablecar, &[]),
        ],
    },
    type_overrides: &[
        // Dampfzug
        TypeRule::Exact("DZ", Product::RegionalTrain),
        TypeRule::Exact("LTT", Product::Bus),
        // Rufbus
        TypeRule::Prefix("RFB", Product::OnDemand),
    ],
    type_fallbacks: &[TypeRule::Exact("E", Product::Unknown)],
    line_rules: &[
        // Wuppertal Schwebebahn counts as a tram
        LineRule::Exact("Schw-B", Product::Tram),
        LineRule::Pattern(&LINE_RUSSIA, Product::RegionalTrain),
        LineRule::Pattern(&LINE_NUMBER, Product::Unknown),
        LineRule::Exact("---", Product::Unknown),
    ],
    line_colors: &[],
    capabilities: &[
        Capability::NearbyStations,
        Capability::Departures,
        Capability::Autocomplete,
        Capability::Connections,
    ],
    connection_params: &[
        ExtraParam::with_bike("REQ0JourneyProduct_opt3", "1"),
        ExtraParam::always("REQ0HafasOptimize1", "0:1"),
        ExtraParam::always("REQ0Tariff_Class", "2"),
        ExtraParam::always("REQ0Tariff_TravellerAge.1", "35"),
        ExtraParam::always("REQ0Tariff_TravellerReductionClass.1", "0"),
        ExtraParam::always("existOptimizePrice", "1"),
        ExtraParam::always("existProductNahverkehr", "yes"),
    ],
};
