use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Which packing strategy a [`Cutter`](crate::opt::Cutter) runs
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CutMode {
    /// Runs both the greedy and the experimental packer and keeps the plan with the least waste
    #[default]
    Opt,
    /// Fills one bar at a time
    Greedy,
    /// Keeps several bars open and assigns the best fitting (piece, bar) pair at every step
    Experimental,
}

impl Display for CutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CutMode::Opt => "OPT",
            CutMode::Greedy => "GREEDY",
            CutMode::Experimental => "EXPERIMENTAL",
        };
        f.write_str(name)
    }
}

///Configuration of a [`Cutter`](crate::opt::Cutter), handed over as plain values by a preferences layer.
///Unit names are validated when the cutter is constructed.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CutterConfig {
    ///Material lost per cut
    pub kerf: f64,
    ///Strategy to run
    #[serde(default)]
    pub mode: CutMode,
    ///Number of decimals figures of a plan are rounded to when read
    #[serde(default)]
    pub precision: u32,
    ///Unit the stock and demand lengths are expressed in, e.g. `"MILLIMETERS"`
    #[serde(default = "default_unit")]
    pub source_unit: String,
    ///Unit figures of a plan are reported in
    #[serde(default = "default_unit")]
    pub target_unit: String,
}

fn default_unit() -> String {
    "NONE".to_string()
}

impl Default for CutterConfig {
    fn default() -> Self {
        Self {
            kerf: 0.0,
            mode: CutMode::Opt,
            precision: 0,
            source_unit: default_unit(),
            target_unit: default_unit(),
        }
    }
}

impl CutterConfig {
    pub fn new(kerf: f64, mode: CutMode) -> Self {
        Self {
            kerf,
            mode,
            ..Self::default()
        }
    }

    /// Sets the display precision and units.
    pub fn with_display(mut self, precision: u32, source_unit: &str, target_unit: &str) -> Self {
        self.precision = precision;
        self.source_unit = source_unit.to_string();
        self.target_unit = target_unit.to_string();
        self
    }
}
