use std::fmt::{Display, Formatter};

use ordered_float::NotNan;

use crate::entities::LengthMultiset;
use crate::entities::length_multiset::length_key;
use crate::util::FPA;
use crate::{CutError, Result};

/// The pieces cut from a single stock bar.
///
/// Every piece is followed by a cut of `kerf_width`, except for the last piece when
/// there is no room left for a trailing cut.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CuttingPattern {
    stock_length: NotNan<f64>,
    kerf_width: NotNan<f64>,
    pieces: LengthMultiset,
}

impl CuttingPattern {
    pub fn new(stock_length: f64, kerf_width: f64, pieces: LengthMultiset) -> Result<Self> {
        let stock_length = length_key(stock_length)
            .map_err(|e| CutError::InputShape(format!("invalid stock length: {e}")))?;
        let kerf_width = length_key(kerf_width)
            .map_err(|e| CutError::InputShape(format!("invalid kerf width: {e}")))?;
        Ok(Self {
            stock_length,
            kerf_width,
            pieces,
        })
    }

    pub fn stock_length(&self) -> f64 {
        self.stock_length.into_inner()
    }

    pub fn kerf_width(&self) -> f64 {
        self.kerf_width.into_inner()
    }

    pub fn pieces(&self) -> &LengthMultiset {
        &self.pieces
    }

    /// Number of cuts made: one per piece, minus the trailing cut of the last piece
    /// when the pieces and a cut after each of them would overrun the bar.
    pub fn cuts(&self) -> usize {
        let n_pieces = self.pieces.cardinality();
        let naive_length = self.pieces.total_length() + n_pieces as f64 * self.kerf_width();
        match naive_length > self.stock_length() {
            true => n_pieces.saturating_sub(1),
            false => n_pieces,
        }
    }

    /// Length of the bar consumed by pieces and cuts
    pub fn used_length(&self) -> f64 {
        self.pieces.total_length() + self.cuts() as f64 * self.kerf_width()
    }

    /// Offcut left at the end of the bar
    pub fn remaining_stock(&self) -> f64 {
        f64::max(0.0, self.stock_length() - self.used_length())
    }

    /// Material lost on this bar: the offcut plus the kerf of every cut
    pub fn waste(&self) -> f64 {
        self.remaining_stock() + self.cuts() as f64 * self.kerf_width()
    }

    /// Whether the pieces and cuts fit on the bar.
    pub fn is_valid(&self) -> bool {
        FPA(self.used_length()) <= FPA(self.stock_length())
    }

    /// Copy with every length mapped through `scale`.
    pub(crate) fn scaled(&self, scale: impl Fn(f64) -> f64) -> CuttingPattern {
        CuttingPattern {
            stock_length: NotNan::new(scale(self.stock_length())).unwrap_or(self.stock_length),
            kerf_width: NotNan::new(scale(self.kerf_width())).unwrap_or(self.kerf_width),
            pieces: self.pieces.scaled(&scale),
        }
    }
}

impl Display for CuttingPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{stock_length: {}, kerf_width: {}, cuts: {}, pieces: {}, remaining_stock: {}, valid: {}}}",
            self.stock_length(),
            self.kerf_width(),
            self.cuts(),
            self.pieces,
            self.remaining_stock(),
            self.is_valid()
        )
    }
}
