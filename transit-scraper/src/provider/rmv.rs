//! Rhein-Main-Verkehrsverbund.

use std::sync::LazyLock;

use regex::Regex;

use super::bitmask::ProductTable;
use super::config::{Capability, Endpoints, LineRule, NetworkId, ProviderConfig, TypeRule};
use crate::domain::{LineColor, Product};
use crate::text::Encoding;

const WHITE: u32 = 0xffffff;
const BLACK: u32 = 0x000000;

static NEARBY_STATION_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<a href="http://www\.rmv\.de/auskunft/bin/jp/stboard\.exe/dn\?[^"]*?input=(\d*)[^"]*?">([^<]*)</a>"#,
    )
    .expect("nearby station regex is valid")
});

static LINE_NIGHT_BUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^N\d{1,2}$").expect("night bus regex is valid"));

pub static RMV: ProviderConfig = ProviderConfig {
    network: NetworkId::Rmv,
    api_base: "http://www.rmv.de/auskunft/bin/jp/",
    endpoints: Endpoints {
        nearby_by_coordinate: "query.exe/dny",
        nearby_by_station: "stboard.exe/dn",
        departures: "stboard.exe/dn",
        autocomplete: "ajax-getstop.exe/dn",
        connections: "query.exe/dn",
    },
    nearby_station_link: &NEARBY_STATION_LINK,
    encoding: Encoding::Utf8,
    products: ProductTable {
        width: 16,
        entries: &[
            (Product::HighSpeedTrain, &[0, 1]),
            (Product::RegionalTrain, &[2]),
            (Product::SuburbanTrain, &[3]),
            (Product::Subway, &[4]),
            (Product::Tram, &[5]),
            (Product::Bus, &[6, 7]),
            (Product::Ferry, &[8]),
            (Product::OnDemand, &[9]),
            (Product::Cablecar, &[]),
        ],
    },
    type_overrides: &[
        // Anruf-Sammeltaxi, Anruf-Linien-Taxi
        TypeRule::Exact("AT", Product::OnDemand),
        TypeRule::Exact("ALT", Product::OnDemand),
        TypeRule::Exact("EBBELWEI", Product::Tram),
    ],
    type_fallbacks: &[],
    line_rules: &[
        LineRule::Pattern(&LINE_NIGHT_BUS, Product::Bus),
        LineRule::Exact("Ebbelwei-Expr.", Product::Tram),
    ],
    line_colors: &[
        ("SS1", LineColor::new(0x0088c8, WHITE)),
        ("SS2", LineColor::new(0xe2001a, WHITE)),
        ("SS3", LineColor::new(0x00a092, WHITE)),
        ("SS4", LineColor::new(0xffcc00, BLACK)),
        ("SS5", LineColor::new(0x8d5b2d, WHITE)),
        ("SS6", LineColor::new(0xf39200, BLACK)),
        ("SS7", LineColor::new(0x1d5f3a, WHITE)),
        ("SS8", LineColor::new(0x8cc63e, BLACK)),
        ("SS9", LineColor::new(0x7c3b8f, WHITE)),
    ],
    capabilities: &[
        Capability::NearbyStations,
        Capability::Departures,
        Capability::Autocomplete,
        Capability::Connections,
    ],
    connection_params: &[],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_bits_match_backend_layout() {
        let cases = [
            ('I', "1100000000000000"),
            ('R', "0010000000000000"),
            ('S', "0001000000000000"),
            ('U', "0000100000000000"),
            ('T', "0000010000000000"),
            ('B', "0000001100000000"),
            ('F', "0000000010000000"),
            ('P', "0000000001000000"),
            ('C', "0000000000000000"),
        ];
        for (letter, expected) in cases {
            let mut mask = RMV.products.empty();
            mask.set(letter).unwrap();
            assert_eq!(mask.to_string(), expected, "letter {letter}");
        }
    }

    #[test]
    fn suburban_colours() {
        let color = RMV.line_color(Product::SuburbanTrain, "S8").unwrap();
        assert_eq!(color.foreground, BLACK);
        assert!(RMV.line_color(Product::RegionalTrain, "S8").is_none());
        assert!(RMV.line_color(Product::SuburbanTrain, "S10").is_none());
    }

    #[test]
    fn nearby_link_pattern() {
        let page = r#"<a href="http://www.rmv.de/auskunft/bin/jp/stboard.exe/dn?L=vs_rmv&amp;input=3000001&amp;boardType=dep">Frankfurt (Main) Hauptwache</a>"#;
        let caps = NEARBY_STATION_LINK.captures(page).unwrap();
        assert_eq!(&caps[1], "3000001");
        assert_eq!(&caps[2], "Frankfurt (Main) Hauptwache");
    }
}
