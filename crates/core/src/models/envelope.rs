use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{models::Identifier, DispatchError, DispatchResult};

/// 充电桩可执行的命令
///
/// 序列化为snake_case名称；反序列化经由 [`FromStr`]，忽略大小写和两端空白。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ChargerCommand {
    /// 读取配置项
    #[default]
    GetConfig,
    /// 固件升级
    UpdateFirmware,
    /// 软重启
    SoftReset,
}

impl ChargerCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChargerCommand::GetConfig => "get_config",
            ChargerCommand::UpdateFirmware => "update_firmware",
            ChargerCommand::SoftReset => "soft_reset",
        }
    }
}

impl FromStr for ChargerCommand {
    type Err = DispatchError;

    fn from_str(command: &str) -> Result<Self, Self::Err> {
        match command.trim().to_lowercase().as_str() {
            "get_config" => Ok(ChargerCommand::GetConfig),
            "update_firmware" => Ok(ChargerCommand::UpdateFirmware),
            "soft_reset" => Ok(ChargerCommand::SoftReset),
            _ => Err(DispatchError::config_error(format!(
                "不支持的命令: {command}"
            ))),
        }
    }
}

impl TryFrom<String> for ChargerCommand {
    type Error = DispatchError;

    fn try_from(command: String) -> Result<Self, Self::Error> {
        command.parse()
    }
}

impl fmt::Display for ChargerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 发给单个充电桩的命令内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargerPayload {
    #[serde(rename = "ipaddress")]
    pub target_address: String,
    pub command: ChargerCommand,
    pub key_name: String,
}

/// 消息信封，线上格式为 `{"charger": {"ipaddress": ..., "command": ..., "key_name": ...}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub charger: ChargerPayload,
}

impl CommandEnvelope {
    /// 序列化为JSON消息体
    pub fn to_bytes(&self) -> DispatchResult<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| DispatchError::Serialization(format!("序列化命令消息失败: {e}")))
    }

    /// 反序列化JSON消息体
    pub fn from_slice(data: &[u8]) -> DispatchResult<Self> {
        serde_json::from_slice(data)
            .map_err(|e| DispatchError::Serialization(format!("反序列化命令消息失败: {e}")))
    }
}

/// 构造单个标识的命令信封
///
/// 纯函数：`target_address` 和 `command` 在一次运行内固定，只有 `key_name` 随标识变化。
pub fn build_envelope(
    target_address: &str,
    command: ChargerCommand,
    key_name: &Identifier,
) -> DispatchResult<CommandEnvelope> {
    key_name.validate()?;

    Ok(CommandEnvelope {
        charger: ChargerPayload {
            target_address: target_address.to_string(),
            command,
            key_name: key_name.as_str().to_string(),
        },
    })
}
