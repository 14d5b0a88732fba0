//! Transport mode (product) type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Filter string selecting every product.
pub const ALL_PRODUCTS: &str = "IRSUTBFCP";

/// A transport mode, identified by a single canonical letter.
///
/// `Unknown` (`?`) is the wildcard for lines that could not be classified.
/// It is a valid line mode but never part of a provider's product filter.
///
/// # Examples
///
/// ```
/// use transit_scraper::domain::Product;
///
/// assert_eq!(Product::from_code('S'), Some(Product::SuburbanTrain));
/// assert_eq!(Product::Tram.code(), 'T');
/// assert_eq!(Product::from_code('X'), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Product {
    /// `I`: intercity and high-speed rail.
    HighSpeedTrain,
    /// `R`: regional rail.
    RegionalTrain,
    /// `S`: suburban rail (S-Bahn).
    SuburbanTrain,
    /// `U`: underground.
    Subway,
    /// `T`: tram.
    Tram,
    /// `B`: bus.
    Bus,
    /// `F`: ferry.
    Ferry,
    /// `C`: cable car, rack railway, funicular.
    Cablecar,
    /// `P`: on-call bus, shared taxi.
    OnDemand,
    /// `?`: unclassified.
    Unknown,
}

impl Product {
    /// Every filterable product, in canonical order.
    pub const ALL: [Product; 9] = [
        Product::HighSpeedTrain,
        Product::RegionalTrain,
        Product::SuburbanTrain,
        Product::Subway,
        Product::Tram,
        Product::Bus,
        Product::Ferry,
        Product::Cablecar,
        Product::OnDemand,
    ];

    /// Returns the canonical letter.
    pub fn code(self) -> char {
        match self {
            Product::HighSpeedTrain => 'I',
            Product::RegionalTrain => 'R',
            Product::SuburbanTrain => 'S',
            Product::Subway => 'U',
            Product::Tram => 'T',
            Product::Bus => 'B',
            Product::Ferry => 'F',
            Product::Cablecar => 'C',
            Product::OnDemand => 'P',
            Product::Unknown => '?',
        }
    }

    /// Look up a product by its canonical letter.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'I' => Some(Product::HighSpeedTrain),
            'R' => Some(Product::RegionalTrain),
            'S' => Some(Product::SuburbanTrain),
            'U' => Some(Product::Subway),
            'T' => Some(Product::Tram),
            'B' => Some(Product::Bus),
            'F' => Some(Product::Ferry),
            'C' => Some(Product::Cablecar),
            'P' => Some(Product::OnDemand),
            '?' => Some(Product::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
