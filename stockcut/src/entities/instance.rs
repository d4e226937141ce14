use crate::entities::LengthMultiset;

/// A cutting stock problem instance: the stock bars available and the pieces demanded.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub name: String,
    pub stock: LengthMultiset,
    pub demand: LengthMultiset,
}

impl Instance {
    pub fn new(name: impl Into<String>, stock: LengthMultiset, demand: LengthMultiset) -> Self {
        Self {
            name: name.into(),
            stock,
            demand,
        }
    }

    /// Total length of all demanded pieces
    pub fn demand_length(&self) -> f64 {
        self.demand.total_length()
    }

    /// Total length of all stock bars
    pub fn stock_length(&self) -> f64 {
        self.stock.total_length()
    }
}
