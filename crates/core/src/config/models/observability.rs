use serde::{Deserialize, Serialize};

use crate::{DispatchError, DispatchResult};

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl ObservabilityConfig {
    pub fn validate(&self) -> DispatchResult<()> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(DispatchError::config_error(format!(
                "无效的日志级别: {}，支持的级别: {:?}",
                self.log_level, valid_log_levels
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.log_format.as_str()) {
            return Err(DispatchError::config_error(format!(
                "无效的日志格式: {}，支持的格式: {:?}",
                self.log_format, valid_log_formats
            )));
        }

        Ok(())
    }
}
