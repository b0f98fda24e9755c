use serde::Deserialize;

/// Local load-shedder configuration.
#[derive(Debug, Deserialize)]
pub struct ShedConfig {
    #[serde(default = "default_max_inflight")]
    pub max_inflight: u32,
}

impl Default for ShedConfig {
    fn default() -> Self {
        Self {
            max_inflight: default_max_inflight(),
        }
    }
}

fn default_max_inflight() -> u32 {
    500
}
