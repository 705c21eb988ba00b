//! 配置管理
//!
//! 配置按 默认值 → TOML文件 → 环境变量 的顺序合并，加载后整体校验并保持不可变。
//! 消息代理参数以 [`BrokerConfig`](models::BrokerConfig) 的形式显式传给连接器。

pub mod models;

#[cfg(test)]
mod tests;

pub use models::{AppConfig, BrokerConfig, DispatchConfig, ObservabilityConfig};
