use serde::{Deserialize, Serialize};

use crate::models::ChargerCommand;
use crate::{DispatchError, DispatchResult};

fn default_keys_file() -> String {
    "key.txt".to_string()
}

/// 分发运行参数：一次运行内固定的目标地址和命令
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DispatchConfig {
    /// 标识列表文件，每行一个标识
    #[serde(default = "default_keys_file")]
    pub keys_file: String,
    /// 目标充电桩IP地址
    #[serde(default)]
    pub target_address: String,
    #[serde(default)]
    pub command: ChargerCommand,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            keys_file: default_keys_file(),
            target_address: String::new(),
            command: ChargerCommand::default(),
        }
    }
}

impl DispatchConfig {
    pub fn validate(&self) -> DispatchResult<()> {
        if self.keys_file.trim().is_empty() {
            return Err(DispatchError::config_error("标识列表文件路径不能为空"));
        }

        if self.target_address.trim().is_empty() {
            return Err(DispatchError::config_error("目标充电桩地址不能为空"));
        }

        Ok(())
    }
}
