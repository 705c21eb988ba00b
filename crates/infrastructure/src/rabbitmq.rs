use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use charger_core::{BrokerConfig, BrokerConnector, BrokerSession, DispatchError, DispatchResult};
use lapin::{options::BasicPublishOptions, BasicProperties, Channel, Connection, ConnectionProperties};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::amqp_uri::build_amqp_uri;

/// RabbitMQ连接器
#[derive(Debug, Clone, Copy, Default)]
pub struct RabbitMqConnector;

impl RabbitMqConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BrokerConnector for RabbitMqConnector {
    async fn open(&self, config: &BrokerConfig) -> DispatchResult<Box<dyn BrokerSession>> {
        let session = RabbitMqSession::connect(config.clone()).await?;
        Ok(Box::new(session))
    }
}

/// RabbitMQ会话：一个连接加一个发布通道
pub struct RabbitMqSession {
    connection: Connection,
    channel: Channel,
    config: BrokerConfig,
    closed: AtomicBool,
}

impl RabbitMqSession {
    /// 建立连接并创建通道，超过 `connection_timeout_seconds` 视为连接失败
    pub async fn connect(config: BrokerConfig) -> DispatchResult<Self> {
        let address = config.redacted_uri();
        let uri = build_amqp_uri(&config)?;
        let timeout = Duration::from_secs(config.connection_timeout_seconds);

        let connection = tokio::time::timeout(
            timeout,
            Connection::connect(uri.as_str(), ConnectionProperties::default()),
        )
        .await
        .map_err(|_| {
            DispatchError::connection(&address, format!("连接超时 ({}秒)", timeout.as_secs()))
        })?
        .map_err(|e| DispatchError::connection(&address, format!("连接RabbitMQ失败: {e}")))?;

        let channel = connection
            .create_channel()
            .await
            .map_err(|e| DispatchError::connection(&address, format!("创建通道失败: {e}")))?;

        info!("成功连接到RabbitMQ: {}", address);

        Ok(Self {
            connection,
            channel,
            config,
            closed: AtomicBool::new(false),
        })
    }

    fn properties(&self) -> BasicProperties {
        BasicProperties::default()
            .with_content_type(self.config.content_type.clone().into())
            .with_delivery_mode(self.config.delivery_mode())
            .with_message_id(Uuid::new_v4().to_string().into())
            .with_timestamp(Utc::now().timestamp().max(0) as u64)
    }
}

#[async_trait]
impl BrokerSession for RabbitMqSession {
    async fn publish(&self, exchange: &str, routing_key: &str, body: &[u8]) -> DispatchResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(DispatchError::publish(exchange, "会话已关闭"));
        }

        // 未启用publisher confirms，返回的确认句柄直接丢弃
        let _confirm = self
            .channel
            .basic_publish(
                exchange.into(),
                routing_key.into(),
                BasicPublishOptions::default(),
                body,
                self.properties(),
            )
            .await
            .map_err(|e| DispatchError::publish(exchange, e.to_string()))?;

        debug!(
            "消息已发布到交换机: {} (routing_key={:?}, {} bytes)",
            exchange,
            routing_key,
            body.len()
        );
        Ok(())
    }

    async fn close(&self) -> DispatchResult<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            debug!("RabbitMQ连接已经关闭过");
            return Ok(());
        }

        if !self.connection.status().connected() {
            warn!("RabbitMQ连接已断开，跳过关闭握手");
            return Ok(());
        }

        self.connection
            .close(200, "正常关闭".into())
            .await
            .map_err(|e| {
                DispatchError::connection(self.config.redacted_uri(), format!("关闭连接失败: {e}"))
            })?;

        info!("RabbitMQ连接已关闭");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        !self.closed.load(Ordering::SeqCst) && self.connection.status().connected()
    }
}
