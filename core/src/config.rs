use crate::error::CoreResult;
use crate::sanitize::limits::SanitizeLimits;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ENGINE_VERSION: &str = concat!("report_core/", env!("CARGO_PKG_VERSION"));

/// Environment variable naming a JSON config file for the CLI.
pub const CONFIG_ENV_VAR: &str = "REPORT_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReportConfig {
    pub engine_version: String,
    pub limits: SanitizeLimits,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            engine_version: DEFAULT_ENGINE_VERSION.to_string(),
            limits: SanitizeLimits::default(),
        }
    }
}

impl ReportConfig {
    /// Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> CoreResult<Self> {
        let cfg: ReportConfig = serde_json::from_str(s)?;
        cfg.limits.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    /// Reads the file named by `REPORT_CONFIG`, or defaults when unset.
    pub fn from_env() -> CoreResult<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_json_file(path),
            None => Ok(Self::default()),
        }
    }
}
