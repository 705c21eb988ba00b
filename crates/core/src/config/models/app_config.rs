use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat, Map};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::DispatchResult;

use super::{broker::BrokerConfig, dispatch::DispatchConfig, observability::ObservabilityConfig};

/// 未指定配置文件时按顺序查找的默认路径
pub const DEFAULT_CONFIG_PATHS: [&str; 3] = [
    "config/charger.toml",
    "charger.toml",
    "/etc/charger-dispatch/config.toml",
];

/// 环境变量前缀，例如 `CHARGER_BROKER__HOST`
pub const ENV_PREFIX: &str = "CHARGER";

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    pub broker: BrokerConfig,
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置并校验
    ///
    /// 加载顺序：
    /// 1. 默认值
    /// 2. 配置文件（TOML格式）
    /// 3. 环境变量覆盖（前缀 `CHARGER_`，嵌套字段以 `__` 连接）
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        Self::load_with_env(config_path, None)
    }

    /// 与 [`AppConfig::load`] 相同，但可以注入环境变量表（测试使用）
    pub fn load_with_env(
        config_path: Option<&str>,
        env_source: Option<Map<String, String>>,
    ) -> Result<Self> {
        let config = Self::load_unvalidated(config_path, env_source)?;
        config.validate()?;
        Ok(config)
    }

    /// 合并默认值、配置文件和环境变量，但不做校验
    ///
    /// 命令行覆盖需要在校验之前应用，调用方负责随后调用 [`AppConfig::validate`]。
    pub fn load_unvalidated(
        config_path: Option<&str>,
        env_source: Option<Map<String, String>>,
    ) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = ConfigBuilder::builder()
            .set_default("broker.host", defaults.broker.host.as_str())?
            .set_default("broker.port", i64::from(defaults.broker.port))?
            .set_default("broker.username", defaults.broker.username.as_str())?
            .set_default("broker.password", defaults.broker.password.as_str())?
            .set_default("broker.vhost", defaults.broker.vhost.as_str())?
            .set_default("broker.exchange", defaults.broker.exchange.as_str())?
            .set_default("broker.routing_key", defaults.broker.routing_key.as_str())?
            .set_default(
                "broker.connection_timeout_seconds",
                defaults.broker.connection_timeout_seconds,
            )?
            .set_default("broker.persistent", defaults.broker.persistent)?
            .set_default("broker.content_type", defaults.broker.content_type.as_str())?
            .set_default("dispatch.keys_file", defaults.dispatch.keys_file.as_str())?
            .set_default(
                "dispatch.target_address",
                defaults.dispatch.target_address.as_str(),
            )?
            .set_default("dispatch.command", defaults.dispatch.command.as_str())?
            .set_default(
                "observability.log_level",
                defaults.observability.log_level.as_str(),
            )?
            .set_default(
                "observability.log_format",
                defaults.observability.log_format.as_str(),
            )?;

        if let Some(path) = config_path {
            if Path::new(path).exists() {
                builder = builder.add_source(File::new(path, FileFormat::Toml));
            } else {
                return Err(anyhow::anyhow!("配置文件不存在: {}", path));
            }
        } else if let Some(path) = DEFAULT_CONFIG_PATHS
            .iter()
            .find(|path| Path::new(path).exists())
        {
            builder = builder.add_source(File::new(path, FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .source(env_source),
        );

        let config: AppConfig = builder
            .build()
            .context("构建配置失败")?
            .try_deserialize()
            .context("反序列化配置失败")?;

        Ok(config)
    }

    /// 从TOML字符串加载配置
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(toml_str).context("解析TOML配置失败")?;

        config.validate()?;
        Ok(config)
    }

    /// 将配置序列化为TOML字符串
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("序列化配置为TOML失败")
    }

    /// 逐节校验配置，任一节失败即返回 `Configuration` 错误
    pub fn validate(&self) -> DispatchResult<()> {
        self.broker.validate()?;
        self.dispatch.validate()?;
        self.observability.validate()?;
        Ok(())
    }
}
