use serde::{Deserialize, Serialize};

use crate::{DispatchError, DispatchResult};

fn default_port() -> u16 {
    5672
}

fn default_vhost() -> String {
    "/".to_string()
}

fn default_connection_timeout_seconds() -> u64 {
    30
}

fn default_persistent() -> bool {
    true
}

fn default_content_type() -> String {
    "application/json".to_string()
}

/// 消息代理（RabbitMQ）连接配置
///
/// 运行期间不可变，显式传给连接器，不使用进程级全局常量。
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BrokerConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
    #[serde(default = "default_vhost")]
    pub vhost: String,
    /// 预先存在的交换机名称，本工具不负责声明
    pub exchange: String,
    /// fanout交换机保持为空
    #[serde(default)]
    pub routing_key: String,
    #[serde(default = "default_connection_timeout_seconds")]
    pub connection_timeout_seconds: u64,
    /// 是否以持久化模式（delivery_mode = 2）投递
    #[serde(default = "default_persistent")]
    pub persistent: bool,
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: default_port(),
            username: "guest".to_string(),
            password: "guest".to_string(),
            vhost: default_vhost(),
            exchange: "evmswss_command".to_string(),
            routing_key: String::new(),
            connection_timeout_seconds: default_connection_timeout_seconds(),
            persistent: default_persistent(),
            content_type: default_content_type(),
        }
    }
}

// 手写Debug，避免密码进入日志
impl std::fmt::Debug for BrokerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrokerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("vhost", &self.vhost)
            .field("exchange", &self.exchange)
            .field("routing_key", &self.routing_key)
            .field("connection_timeout_seconds", &self.connection_timeout_seconds)
            .field("persistent", &self.persistent)
            .field("content_type", &self.content_type)
            .finish()
    }
}

impl BrokerConfig {
    /// 校验消息代理配置，失败时返回 `Configuration` 错误
    pub fn validate(&self) -> DispatchResult<()> {
        if self.host.trim().is_empty() {
            return Err(DispatchError::config_error("RabbitMQ主机地址不能为空"));
        }

        if self.port == 0 {
            return Err(DispatchError::config_error("RabbitMQ端口必须大于0"));
        }

        if self.username.is_empty() {
            return Err(DispatchError::config_error("RabbitMQ用户名不能为空"));
        }

        if self.vhost.is_empty() {
            return Err(DispatchError::config_error("RabbitMQ虚拟主机不能为空"));
        }

        if self.exchange.trim().is_empty() {
            return Err(DispatchError::config_error("交换机名称不能为空"));
        }

        if self.connection_timeout_seconds == 0 {
            return Err(DispatchError::config_error("RabbitMQ连接超时时间必须大于0"));
        }

        if self.content_type.is_empty() {
            return Err(DispatchError::config_error("消息content_type不能为空"));
        }

        Ok(())
    }

    /// `host:port` 形式的地址
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 隐藏密码后的连接地址，用于日志和错误信息
    pub fn redacted_uri(&self) -> String {
        format!(
            "amqp://{}:***@{}/{}",
            self.username,
            self.address(),
            self.vhost.trim_start_matches('/')
        )
    }

    /// 投递模式：2 表示持久化，1 表示非持久化
    pub fn delivery_mode(&self) -> u8 {
        if self.persistent {
            2
        } else {
            1
        }
    }
}
