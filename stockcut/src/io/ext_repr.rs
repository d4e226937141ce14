use std::collections::BTreeMap;

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

/// Cutting stock problem instance
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtInstance {
    /// The name of the instance
    pub name: String,
    /// Stock bars available
    pub stock: ExtLengths,
    /// Pieces to be cut
    pub demand: ExtLengths,
}

/// The shapes in which a collection of lengths can be written down
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum ExtLengths {
    /// A single length, e.g. `2400`
    Scalar(f64),
    /// Every length listed separately, e.g. `[2400, 2400, 3600]`
    List(Vec<f64>),
    /// Length to quantity mapping, e.g. `{"2400": 2, "3600": 1}`
    Counts(BTreeMap<String, usize>),
    /// List of single length to quantity mappings, e.g. `[{"2400": 2}, {"3600": 1}]`
    Entries(Vec<BTreeMap<String, usize>>),
    /// Anything else, rejected on import
    #[serde(skip_serializing)]
    Unrecognized(IgnoredAny),
}

/// A length together with its quantity
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtLengthQty {
    pub length: f64,
    pub qty: usize,
}

/// Group of bars to be cut the same way
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtPattern {
    /// Number of bars to cut this way
    pub count: usize,
    pub stock_length: f64,
    pub kerf_width: f64,
    pub cuts: usize,
    /// The pieces cut from a single bar, longest first
    pub pieces: Vec<f64>,
    /// Offcut left on a single bar
    pub remaining_stock: f64,
    /// Offcut plus kerf lost on a single bar
    pub waste: f64,
}

/// Cutting plan. All figures are expressed in the target unit, rounded to the configured precision.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtPlan {
    /// Name of the strategy which produced the plan
    pub method: Option<String>,
    /// Whether all demand has been cut
    pub completed: bool,
    /// Suffix of the unit figures are expressed in
    pub unit_suffix: String,
    pub total_waste: f64,
    pub patterns: Vec<ExtPattern>,
    pub used_stock: Vec<ExtLengthQty>,
    pub remaining_stock: Vec<ExtLengthQty>,
    pub remaining_demand: Vec<ExtLengthQty>,
}
