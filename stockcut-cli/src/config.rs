use serde::{Deserialize, Serialize};
use stockcut::util::CutterConfig;

/// Configuration of the command line driver
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CliConfig {
    /// Configuration handed to the cutter
    #[serde(flatten)]
    pub cutter: CutterConfig,
    /// Log the progress every this many steps
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
}

fn default_progress_interval() -> usize {
    1000
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            cutter: CutterConfig::default(),
            progress_interval: default_progress_interval(),
        }
    }
}
