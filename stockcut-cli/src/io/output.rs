use serde::{Deserialize, Serialize};
use stockcut::io::ext_repr::{ExtInstance, ExtPlan};

use crate::config::CliConfig;

/// Contents of a solution file
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Output {
    #[serde(flatten)]
    pub instance: ExtInstance,
    pub plan: ExtPlan,
    pub config: CliConfig,
}
