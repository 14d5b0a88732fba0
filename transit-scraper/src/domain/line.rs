//! Line type.

use std::fmt;

use super::Product;

/// Display colours for a line, as 24-bit RGB values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineColor {
    pub background: u32,
    pub foreground: u32,
}

impl LineColor {
    pub const fn new(background: u32, foreground: u32) -> Self {
        Self {
            background,
            foreground,
        }
    }
}

/// A canonical line: transport mode plus label.
///
/// The label is what riders see ("S8", "ICE699", "4200"). A line whose raw
/// type could not be classified carries [`Product::Unknown`] and keeps its
/// label verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Line {
    pub product: Product,
    pub label: String,
    pub color: Option<LineColor>,
}

impl Line {
    /// Create a line without colour information.
    pub fn new(product: Product, label: impl Into<String>) -> Self {
        Self {
            product,
            label: label.into(),
            color: None,
        }
    }

    /// Attach display colours.
    pub fn with_color(mut self, color: Option<LineColor>) -> Self {
        self.color = color;
        self
    }

    /// Whether the line's mode is known.
    pub fn is_classified(&self) -> bool {
        self.product != Product::Unknown
    }
}

/// Renders as mode letter followed by label, e.g. `SS8`.
impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.product.code(), self.label)
    }
}
