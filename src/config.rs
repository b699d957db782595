//! Service configuration.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "timetable.toml";
pub const ENV_PREFIX: &str = "TIMETABLE_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// JSON catalog served by `/v1/timetable/generate`. Empty store if unset.
    pub catalog_path: Option<PathBuf>,
    /// `env_logger` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            catalog_path: None,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Defaults, then `timetable.toml`, then `config_path` if given, then
    /// `TIMETABLE_*` variables.
    #[allow(clippy::result_large_err)]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(DEFAULT_CONFIG_FILE));

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX)).extract()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
