use serde::{Deserialize, Serialize};

/// Key override section. Every field is optional; unset keys keep the
/// built-in defaults. Values are validated when the binding table is built,
/// not here, so a bad token can warn without discarding the whole config.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BindsConfig {
    #[serde(default)]
    pub playlist: Option<String>,
    #[serde(default)]
    pub track: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub findadd: Option<String>,
}
