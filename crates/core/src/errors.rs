use thiserror::Error;

/// 命令分发错误类型定义
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("标识列表不可用: {path} - {message}")]
    SourceUnavailable { path: String, message: String },

    #[error("连接消息代理失败: {address} - {message}")]
    Connection { address: String, message: String },

    #[error("无效的标识: {identifier:?} - {reason}")]
    InvalidIdentifier { identifier: String, reason: String },

    #[error("发布消息到交换机 {exchange} 失败: {message}")]
    Publish { exchange: String, message: String },

    #[error("序列化错误: {0}")]
    Serialization(String),

    #[error("配置错误: {0}")]
    Configuration(String),
}

/// 统一的Result类型
pub type DispatchResult<T> = std::result::Result<T, DispatchError>;

impl DispatchError {
    pub fn source_unavailable<P: Into<String>, S: Into<String>>(path: P, message: S) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn connection<A: Into<String>, S: Into<String>>(address: A, message: S) -> Self {
        Self::Connection {
            address: address.into(),
            message: message.into(),
        }
    }

    pub fn invalid_identifier<I: Into<String>, S: Into<String>>(identifier: I, reason: S) -> Self {
        Self::InvalidIdentifier {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    pub fn publish<E: Into<String>, S: Into<String>>(exchange: E, message: S) -> Self {
        Self::Publish {
            exchange: exchange.into(),
            message: message.into(),
        }
    }

    pub fn config_error<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// 致命错误会在发布开始之前中止整个分发运行
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DispatchError::SourceUnavailable { .. }
                | DispatchError::Connection { .. }
                | DispatchError::Configuration(_)
        )
    }

    /// 错误类别的稳定名称，用于报告和日志字段
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::SourceUnavailable { .. } => "source_unavailable",
            DispatchError::Connection { .. } => "connection_error",
            DispatchError::InvalidIdentifier { .. } => "invalid_identifier",
            DispatchError::Publish { .. } => "publish_error",
            DispatchError::Serialization(_) => "serialization_error",
            DispatchError::Configuration(_) => "configuration_error",
        }
    }
}

impl From<serde_json::Error> for DispatchError {
    fn from(err: serde_json::Error) -> Self {
        DispatchError::Serialization(err.to_string())
    }
}
