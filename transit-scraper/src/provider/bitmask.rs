//! Product filter bitmasks.
//!
//! Each backend selects transport modes with a fixed-width string of `0`
//! and `1` characters. Which positions a product lights is per-provider
//! data, held in a [`ProductTable`].

use crate::domain::{ConfigurationError, Product};

/// Mapping from product to bit positions for one provider.
///
/// A product listed with no positions (cable cars on most networks) is
/// accepted in a filter but selects nothing.
#[derive(Debug)]
pub struct ProductTable {
    /// Mask width in characters
    pub width: usize,
    /// Positions lit per product
    pub entries: &'static [(Product, &'static [usize])],
}

impl ProductTable {
    /// Positions for a product, or `None` if the provider does not know it.
    pub fn positions(&self, product: Product) -> Option<&'static [usize]> {
        self.entries
            .iter()
            .find(|(p, _)| *p == product)
            .map(|(_, positions)| *positions)
    }

    /// An empty mask of this table's width.
    pub fn empty(&'static self) -> ProductBits {
        ProductBits {
            table: self,
            bits: vec![false; self.width],
        }
    }

    /// A mask with every known product applied.
    pub fn all(&'static self) -> ProductBits {
        let mut mask = self.empty();
        for (_, positions) in self.entries {
            mask.light(positions);
        }
        mask
    }

    /// A mask for a filter string such as `"IRS"`.
    ///
    /// Fails on the first letter the provider cannot handle.
    pub fn from_filter(&'static self, filter: &str) -> Result<ProductBits, ConfigurationError> {
        let mut mask = self.empty();
        for letter in filter.chars() {
            mask.set(letter)?;
        }
        Ok(mask)
    }
}

/// A product bitmask under construction.
///
/// Built fresh for every request; never shared between calls.
#[derive(Debug, Clone)]
pub struct ProductBits {
    table: &'static ProductTable,
    bits: Vec<bool>,
}

impl ProductBits {
    /// Light the positions for one product letter.
    ///
    /// On error the mask is left unchanged.
    pub fn set(&mut self, letter: char) -> Result<(), ConfigurationError> {
        let product =
            Product::from_code(letter).ok_or(ConfigurationError::UnknownProductLetter(letter))?;
        let positions = self
            .table
            .positions(product)
            .ok_or(ConfigurationError::UnsupportedProduct(product))?;
        self.light(positions);
        Ok(())
    }

    fn light(&mut self, positions: &[usize]) {
        for &pos in positions {
            if let Some(bit) = self.bits.get_mut(pos) {
                *bit = true;
            }
        }
    }

    /// Whether a position is lit.
    pub fn is_set(&self, pos: usize) -> bool {
        self.bits.get(pos).copied().unwrap_or(false)
    }

    /// Mask width.
    pub fn width(&self) -> usize {
        self.bits.len()
    }

    /// Sum of `2^position` over lit positions.
    pub fn to_int(&self) -> u64 {
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, lit)| **lit)
            .map(|(pos, _)| 1u64 << pos)
            .sum()
    }
}

/// Renders as the `0`/`1` string sent to the backend.
impl std::fmt::Display for ProductBits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &lit in &self.bits {
            f.write_str(if lit { "1" } else { "0" })?;
        }
        Ok(())
    }
}
