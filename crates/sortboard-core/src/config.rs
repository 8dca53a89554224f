use std::fmt;

use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;

fn default_exclude_animals() -> Vec<String> {
    vec!["radial_maze_behavior".to_string(), "HP02".to_string()]
}

#[derive(Clone, Deserialize)]
pub struct AppConfig {
    /// Notion integration token (NOTION_API_KEY).
    pub notion_api_key: String,
    /// Root of the data tree, one subdirectory per animal (ROOT_DIR).
    pub root_dir: String,
    /// Notion database holding one entry per session (DATABASE_ID).
    pub database_id: String,
    /// Top-level directories the scanner skips entirely.
    #[serde(default = "default_exclude_animals")]
    pub exclude_animals: Vec<String>,
}

// The token must not leak through `{:?}`, which both `print-config` and the
// file log sink use.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("notion_api_key", &"[REDACTED]")
            .field("root_dir", &self.root_dir)
            .field("database_id", &self.database_id)
            .field("exclude_animals", &self.exclude_animals)
            .finish()
    }
}

/// Merge an optional `Config.toml` with environment variables. The three
/// credentials/paths have no defaults; a missing one fails the load.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(Environment::default())
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
