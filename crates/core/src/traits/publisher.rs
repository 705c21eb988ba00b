use async_trait::async_trait;

use crate::{config::models::BrokerConfig, DispatchResult};

/// 消息代理连接器：按配置建立一个连接和一个发布通道
#[async_trait]
pub trait BrokerConnector: Send + Sync {
    /// 建立网络连接并完成认证，失败时返回 `DispatchError::Connection`
    async fn open(&self, config: &BrokerConfig) -> DispatchResult<Box<dyn BrokerSession>>;
}

/// 已建立的代理会话，独占于一次分发运行
#[async_trait]
pub trait BrokerSession: Send + Sync {
    /// 向交换机发布一条消息，不等待代理确认
    async fn publish(&self, exchange: &str, routing_key: &str, body: &[u8]) -> DispatchResult<()>;

    /// 释放网络会话，可重复调用
    async fn close(&self) -> DispatchResult<()>;

    /// 获取连接状态
    fn is_connected(&self) -> bool;
}
