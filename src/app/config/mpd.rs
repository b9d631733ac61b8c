use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct MpdConfig {
    /// MPD address, either `host:port` or a path to a Unix socket
    #[serde(default = "MpdConfig::default_address")]
    pub address: String,
}

impl MpdConfig {
    fn default_address() -> String {
        "localhost:6600".to_string()
    }
}

impl Default for MpdConfig {
    fn default() -> Self {
        Self {
            address: Self::default_address(),
        }
    }
}
