//! Line and type classification.
//!
//! Raw labels arrive as "RE 4200", "S8", "Schw-B" or a bare train number.
//! Classification is layered: provider rules first, then the shared
//! defaults, then (for type codes) provider fallbacks. Anything left over
//! becomes [`Product::Unknown`] with its label kept verbatim.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::config::{ProviderConfig, TypeRule};
use crate::domain::{Line, Product};
use crate::parse::ParseError;

/// Letters, optional separators, then the rest: "RE 4200", "STR-12".
static TYPE_AND_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-zÄÖÜäöüß]+)[\s-]*(.*)$").expect("line regex is valid")
});

/// Bare train or route numbers: no type code to classify.
static NUMBER_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("number regex is valid"));

/// Type codes shared across operators.
static DEFAULT_TYPES: &[TypeRule] = &[
    // intercity
    TypeRule::Exact("ICE", Product::HighSpeedTrain),
    TypeRule::Exact("IC", Product::HighSpeedTrain),
    TypeRule::Exact("EC", Product::HighSpeedTrain),
    TypeRule::Exact("EN", Product::HighSpeedTrain),
    TypeRule::Exact("CNL", Product::HighSpeedTrain),
    TypeRule::Exact("ICN", Product::HighSpeedTrain),
    TypeRule::Exact("TGV", Product::HighSpeedTrain),
    TypeRule::Exact("THA", Product::HighSpeedTrain),
    TypeRule::Exact("RJ", Product::HighSpeedTrain),
    TypeRule::Exact("OEC", Product::HighSpeedTrain),
    TypeRule::Exact("OIC", Product::HighSpeedTrain),
    TypeRule::Exact("X", Product::HighSpeedTrain),
    // regional
    TypeRule::Exact("R", Product::RegionalTrain),
    TypeRule::Exact("RE", Product::RegionalTrain),
    TypeRule::Exact("RB", Product::RegionalTrain),
    TypeRule::Exact("IR", Product::RegionalTrain),
    TypeRule::Exact("IRE", Product::RegionalTrain),
    TypeRule::Exact("D", Product::RegionalTrain),
    TypeRule::Exact("HLB", Product::RegionalTrain),
    TypeRule::Exact("VIA", Product::RegionalTrain),
    TypeRule::Exact("ALX", Product::RegionalTrain),
    TypeRule::Exact("ERB", Product::RegionalTrain),
    // suburban
    TypeRule::Exact("S", Product::SuburbanTrain),
    TypeRule::Exact("SBAHN", Product::SuburbanTrain),
    // underground
    TypeRule::Exact("U", Product::Subway),
    TypeRule::Exact("UBAHN", Product::Subway),
    // tram
    TypeRule::Exact("STR", Product::Tram),
    TypeRule::Exact("TRAM", Product::Tram),
    // bus
    TypeRule::Exact("BUS", Product::Bus),
    TypeRule::Exact("B", Product::Bus),
    // ferry
    TypeRule::Exact("SCHIFF", Product::Ferry),
    TypeRule::Exact("FÄHRE", Product::Ferry),
    TypeRule::Exact("FAEHRE", Product::Ferry),
    TypeRule::Exact("KAT", Product::Ferry),
    // cable car
    TypeRule::Exact("SEILBAHN", Product::Cablecar),
    TypeRule::Exact("ZAHNRADBAHN", Product::Cablecar),
    // on demand
    TypeRule::Exact("AST", Product::OnDemand),
];

fn classify(rules: &[TypeRule], upper: &str) -> Option<Product> {
    rules.iter().find_map(|rule| rule.classify(upper))
}

/// Classify a raw type code.
///
/// Returns `None` when no rule matches; that is "unclassified", not an
/// error.
pub fn normalize_type(config: &ProviderConfig, raw: &str) -> Option<Product> {
    let upper = raw.trim().to_uppercase();
    classify(config.type_overrides, &upper)
        .or_else(|| classify(DEFAULT_TYPES, &upper))
        .or_else(|| classify(config.type_fallbacks, &upper))
}

/// Classify a raw label that has no separate type field.
///
/// Provider line rules are tried first. A label of digits only is
/// [`Product::Unknown`], kept verbatim. Otherwise the label is split into
/// a leading type code and the rest, and the type code is classified.
/// Anything else that does not start with a letter fails with
/// [`ParseError::UnclassifiedLine`].
pub fn parse_line_without_type(config: &ProviderConfig, raw: &str) -> Result<Line, ParseError> {
    let label = raw.trim();

    if let Some(product) = config.line_rules.iter().find_map(|rule| rule.classify(label)) {
        return Ok(new_line(config, product, label.to_string()));
    }

    if NUMBER_ONLY.is_match(label) {
        debug!(line = label, "bare line number");
        return Ok(new_line(config, Product::Unknown, label.to_string()));
    }

    let caps = TYPE_AND_NUMBER
        .captures(label)
        .ok_or_else(|| ParseError::UnclassifiedLine(label.to_string()))?;
    let type_code = &caps[1];
    let number = &caps[2];

    let product = normalize_type(config, type_code).unwrap_or_else(|| {
        debug!(line = label, type_code, "unclassified line type");
        Product::Unknown
    });

    Ok(new_line(config, product, format!("{type_code}{number}")))
}

/// Classify a label whose type code arrives in a separate field.
///
/// An empty type code falls back to [`parse_line_without_type`].
pub fn parse_line_and_type(
    config: &ProviderConfig,
    raw: &str,
    type_code: &str,
) -> Result<Line, ParseError> {
    let type_code = type_code.trim();
    if type_code.is_empty() {
        return parse_line_without_type(config, raw);
    }

    let product = normalize_type(config, type_code).unwrap_or_else(|| {
        debug!(line = raw, type_code, "unclassified line type");
        Product::Unknown
    });

    let raw = raw.trim();
    let label = if raw.is_empty() {
        type_code.to_string()
    } else if product == Product::SuburbanTrain {
        raw.split_whitespace().collect()
    } else {
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    };

    Ok(new_line(config, product, label))
}

fn new_line(config: &ProviderConfig, product: Product, label: String) -> Line {
    let color = config.line_color(product, &label);
    Line::new(product, label).with_color(color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{BAHN, RMV};

    fn line(product: Product, label: &str) -> Line {
        Line::new(product, label)
    }

    #[test]
    fn bahn_type_overrides_win() {
        assert_eq!(normalize_type(&BAHN, "DZ"), Some(Product::RegionalTrain));
        assert_eq!(normalize_type(&BAHN, "ltt"), Some(Product::Bus));
        assert_eq!(normalize_type(&BAHN, "RFB1"), Some(Product::OnDemand));
    }

    #[test]
    fn shared_defaults() {
        assert_eq!(normalize_type(&BAHN, "ICE"), Some(Product::HighSpeedTrain));
        assert_eq!(normalize_type(&BAHN, "re"), Some(Product::RegionalTrain));
        assert_eq!(normalize_type(&RMV, "STR"), Some(Product::Tram));
    }

    #[test]
    fn bahn_fallback_after_defaults() {
        assert_eq!(normalize_type(&BAHN, "E"), Some(Product::Unknown));
        assert_eq!(normalize_type(&RMV, "E"), None);
    }

    #[test]
    fn unknown_type_is_unclassified_not_error() {
        assert_eq!(normalize_type(&BAHN, "XYZ"), None);
    }

    #[test]
    fn rmv_type_overrides() {
        assert_eq!(normalize_type(&RMV, "AT"), Some(Product::OnDemand));
        assert_eq!(normalize_type(&RMV, "ALT"), Some(Product::OnDemand));
        assert_eq!(normalize_type(&RMV, "Ebbelwei"), Some(Product::Tram));
    }

    #[test]
    fn bahn_documented_labels() {
        assert_eq!(
            parse_line_without_type(&BAHN, "Schw-B").unwrap(),
            line(Product::Tram, "Schw-B")
        );
        assert_eq!(
            parse_line_without_type(&BAHN, "4200").unwrap(),
            line(Product::Unknown, "4200")
        );
        assert_eq!(
            parse_line_without_type(&BAHN, "---").unwrap(),
            line(Product::Unknown, "---")
        );
        assert_eq!(
            parse_line_without_type(&BAHN, "018SZ").unwrap(),
            line(Product::RegionalTrain, "018SZ")
        );
    }

    #[test]
    fn default_split_joins_type_and_number() {
        assert_eq!(
            parse_line_without_type(&BAHN, "RE 4200").unwrap(),
            line(Product::RegionalTrain, "RE4200")
        );
        assert_eq!(
            parse_line_without_type(&BAHN, "ICE  699").unwrap(),
            line(Product::HighSpeedTrain, "ICE699")
        );
        assert_eq!(
            parse_line_without_type(&BAHN, "Bus 42").unwrap(),
            line(Product::Bus, "Bus42")
        );
    }

    #[test]
    fn unknown_type_prefix_becomes_wildcard() {
        assert_eq!(
            parse_line_without_type(&BAHN, "Qux 7").unwrap(),
            line(Product::Unknown, "Qux7")
        );
    }

    #[test]
    fn bare_numbers_are_wildcards_on_every_provider() {
        for config in [&BAHN, &RMV] {
            for label in ["4200", "7"] {
                assert_eq!(
                    parse_line_without_type(config, label).unwrap(),
                    line(Product::Unknown, label),
                    "{} {label}",
                    config.network
                );
            }
        }
        assert_eq!(
            parse_line_and_type(&RMV, "4200", "").unwrap(),
            line(Product::Unknown, "4200")
        );
    }

    #[test]
    fn label_without_letters_or_digits_is_rejected() {
        let err = parse_line_without_type(&RMV, "(7)").unwrap_err();
        assert!(matches!(err, ParseError::UnclassifiedLine(ref l) if l == "(7)"));
    }

    #[test]
    fn rmv_line_rules() {
        assert_eq!(
            parse_line_without_type(&RMV, "N12").unwrap(),
            line(Product::Bus, "N12")
        );
        assert_eq!(
            parse_line_without_type(&RMV, "Ebbelwei-Expr.").unwrap(),
            line(Product::Tram, "Ebbelwei-Expr.")
        );
    }

    #[test]
    fn rmv_suburban_lines_are_coloured() {
        let parsed = parse_line_and_type(&RMV, "S 8", "S").unwrap();
        assert_eq!(parsed.product, Product::SuburbanTrain);
        assert_eq!(parsed.label, "S8");
        assert!(parsed.color.is_some());

        let parsed = parse_line_without_type(&RMV, "S8").unwrap();
        assert!(parsed.color.is_some());
    }

    #[test]
    fn line_and_type_uses_separate_type() {
        assert_eq!(
            parse_line_and_type(&BAHN, "ICE  699", "ICE").unwrap(),
            line(Product::HighSpeedTrain, "ICE 699")
        );
        assert_eq!(
            parse_line_and_type(&BAHN, "RE 4200", "").unwrap(),
            line(Product::RegionalTrain, "RE4200")
        );
        assert_eq!(
            parse_line_and_type(&BAHN, "", "STR").unwrap(),
            line(Product::Tram, "STR")
        );
        assert_eq!(
            parse_line_and_type(&BAHN, "Foo 1", "FOO").unwrap(),
            line(Product::Unknown, "Foo 1")
        );
    }
}
