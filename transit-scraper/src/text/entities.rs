//! HTML/XML character entity resolution.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Numeric references (`&#228;`, `&#x3B1;`) and named references (`&amp;`).
static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#([xX][0-9a-fA-F]+|[0-9]+)|([A-Za-z][A-Za-z0-9]*));")
        .expect("entity regex is valid")
});

/// Error returned when an entity reference cannot be resolved.
///
/// A place name with an unresolvable entity is reported rather than passed
/// through: the caller would otherwise display mojibake.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntityError {
    /// Named entity outside the supported set.
    #[error("unknown entity: &{0};")]
    Unknown(String),

    /// Numeric reference that is not a Unicode scalar value.
    #[error("invalid character reference: &#{0};")]
    InvalidCharRef(String),
}

/// Resolve character entities in a string.
///
/// Supports decimal and hexadecimal character references plus the named
/// entities `amp`, `quot`, `apos`, `lt`, `gt` and `nbsp`. Resolution is a
/// single pass, so `&amp;amp;` becomes `&amp;`.
///
/// # Examples
///
/// ```
/// use transit_scraper::text::resolve_entities;
///
/// assert_eq!(resolve_entities("Bahnhof &amp; Markt").unwrap(), "Bahnhof & Markt");
/// assert_eq!(resolve_entities("W&#228;chtersbach").unwrap(), "Wächtersbach");
/// assert!(resolve_entities("&bogus;").is_err());
/// ```
pub fn resolve_entities(s: &str) -> Result<String, EntityError> {
    let mut out = String::with_capacity(s.len());
    let mut last = 0;

    for caps in ENTITY.captures_iter(s) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&s[last..whole.start()]);
        out.push(resolve_one(&caps)?);
        last = whole.end();
    }

    out.push_str(&s[last..]);
    Ok(out)
}

fn resolve_one(caps: &Captures<'_>) -> Result<char, EntityError> {
    if let Some(code) = caps.get(1) {
        let code = code.as_str();
        let value = match code.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        return value
            .and_then(char::from_u32)
            .ok_or_else(|| EntityError::InvalidCharRef(code.to_string()));
    }

    let name = caps.get(2).map_or("", |m| m.as_str());
    match name {
        "amp" => Ok('&'),
        "quot" => Ok('"'),
        "apos" => Ok('\''),
        "lt" => Ok('<'),
        "gt" => Ok('>'),
        "nbsp" => Ok('\u{a0}'),
        other => Err(EntityError::Unknown(other.to_string())),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Text without an ampersand passes through unchanged
        #[test]
        fn no_ampersand_is_identity(s in "[^&]{0,40}") {
            prop_assert_eq!(resolve_entities(&s).unwrap(), s);
        }

        /// Any character written as a decimal reference decodes to itself
        #[test]
        fn decimal_reference_roundtrip(c in any::<char>()) {
            let encoded = format!("&#{};", c as u32);
            prop_assert_eq!(resolve_entities(&encoded).unwrap(), c.to_string());
        }

        /// Any character written as a hex reference decodes to itself
        #[test]
        fn hex_reference_roundtrip(c in any::<char>()) {
            let encoded = format!("&#x{:x};", c as u32);
            prop_assert_eq!(resolve_entities(&encoded).unwrap(), c.to_string());
        }
    }
}
