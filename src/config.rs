use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::toolbar::query::LOG_FILE_COUNT_INTERVAL;
use crate::toolbar::range::ReclassifyPolicy;

pub const DEFAULT_CONFIG_FILE: &str = "lumberjack.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub aws: AwsConfig,
    #[serde(default)]
    pub toolbar: ToolbarConfig,
    /// Query string the log view starts on, e.g. a shared link's
    /// `start_timestamp=1700000000&_limit=20&_offset=0`.
    #[serde(default)]
    pub initial_query: Option<String>,
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                Self::from_file(&default_path)?
            } else {
                Self::default()
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self =
            toml::from_str(&contents).with_context(|| "failed to parse configuration TOML")?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(profile) = env::var("LUMBERJACK_PROFILE") {
            self.aws.profile = profile;
        }
        if let Ok(region) = env::var("LUMBERJACK_REGION") {
            self.aws.region = region;
        }
        if let Ok(log_group) = env::var("LUMBERJACK_LOG_GROUP") {
            self.aws.log_group = log_group;
        }
        if let Ok(page_size) = env::var("LUMBERJACK_PAGE_SIZE") {
            match page_size.parse::<u32>() {
                Ok(value) if value > 0 => self.toolbar.page_size = value,
                _ => log::warn!("ignoring LUMBERJACK_PAGE_SIZE={page_size:?}"),
            }
        }
        if let Ok(query) = env::var("LUMBERJACK_QUERY") {
            self.initial_query = Some(query);
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AwsConfig {
    #[serde(default)]
    pub profile: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub log_group: String,
    /// Upper bound on events pulled from CloudWatch for one window.
    #[serde(default = "default_max_events")]
    pub max_events: usize,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            profile: String::new(),
            region: default_region(),
            log_group: String::new(),
            max_events: default_max_events(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolbarConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_tolerance")]
    pub reclassify_tolerance_secs: i64,
    #[serde(default)]
    pub reclassify_policy: ReclassifyPolicy,
    /// Refuse to search a custom range with an empty date.
    #[serde(default = "default_validate")]
    pub validate_custom_range: bool,
}

impl Default for ToolbarConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            reclassify_tolerance_secs: default_tolerance(),
            reclassify_policy: ReclassifyPolicy::default(),
            validate_custom_range: default_validate(),
        }
    }
}

fn default_region() -> String {
    "eu-west-1".to_string()
}

fn default_max_events() -> usize {
    10_000
}

fn default_page_size() -> u32 {
    LOG_FILE_COUNT_INTERVAL
}

fn default_tolerance() -> i64 {
    60
}

fn default_validate() -> bool {
    true
}
