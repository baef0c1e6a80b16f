use serde::{Deserialize, Serialize};

/// Sources searched when neither the config file nor the environment names any.
pub const DEFAULT_SOURCES: [&str; 6] = ["qqmusic", "fivesing", "netease", "migu", "joox", "yiting"];
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_SEARCH_SIZE: usize = 5;
/// Fuzzy results above this count are discarded as ambiguous.
pub const DEFAULT_MAX_FUZZY_MATCHES: usize = 2;
pub const DEFAULT_SAVEDIR: &str = "downloaded";
pub const DEFAULT_LOGFILE: &str = "songgrab.log";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig {
    pub base_url: Option<String>,
    pub sources: Option<Vec<String>>,
    pub search_size_per_source: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MatchingConfig {
    pub max_fuzzy_matches: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    pub savedir: Option<String>,
    pub logfilepath: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SonggrabConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}
