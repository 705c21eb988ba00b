#[cfg(test)]
mod rabbitmq_publisher_tests {
    use std::time::Duration;

    use charger_core::{
        build_envelope, BrokerConfig, BrokerConnector, BrokerSession, ChargerCommand,
        CommandEnvelope, DispatchError, Identifier,
    };
    use charger_infrastructure::{build_amqp_uri, RabbitMqConnector};
    use lapin::{
        options::{BasicGetOptions, QueueBindOptions, QueueDeclareOptions},
        types::FieldTable,
        BasicProperties, Channel, Connection, ConnectionProperties,
    };
    use testcontainers::runners::AsyncRunner;
    use testcontainers_modules::rabbitmq::RabbitMq;

    const UNREACHABLE_PASSWORD: &str = "s3cr3t-unreachable";

    fn unreachable_config() -> BrokerConfig {
        BrokerConfig {
            host: "127.0.0.1".to_string(),
            // 保留端口，不会有服务监听
            port: 1,
            password: UNREACHABLE_PASSWORD.to_string(),
            connection_timeout_seconds: 2,
            ..BrokerConfig::default()
        }
    }

    #[tokio::test]
    async fn test_unreachable_broker_is_connection_error() {
        let result = RabbitMqConnector::new().open(&unreachable_config()).await;

        match result {
            Err(err) => {
                assert!(matches!(err, DispatchError::Connection { .. }));
                assert!(err.is_fatal());
                let message = err.to_string();
                assert!(message.contains("***"));
                assert!(!message.contains(UNREACHABLE_PASSWORD));
            }
            Ok(_) => panic!("expected connection error"),
        }
    }

    /// 声明独占队列并绑定到交换机，用于接收发布的消息
    async fn bind_capture_queue(channel: &Channel, exchange: &str) -> String {
        let queue = channel
            .queue_declare(
                "".into(),
                QueueDeclareOptions {
                    exclusive: true,
                    auto_delete: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .unwrap();
        let queue_name = queue.name().as_str().to_string();

        channel
            .queue_bind(
                queue_name.as_str().into(),
                exchange.into(),
                "".into(),
                QueueBindOptions::default(),
                FieldTable::default(),
            )
            .await
            .unwrap();

        queue_name
    }

    /// 未启用publisher confirms，消息到达队列可能稍有延迟
    async fn get_one(channel: &Channel, queue: &str) -> (Vec<u8>, BasicProperties) {
        for _ in 0..50 {
            let message = channel
                .basic_get(
                    queue.into(),
                    BasicGetOptions {
                        no_ack: true,
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
            if let Some(message) = message {
                return (message.delivery.data, message.delivery.properties);
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        panic!("no message delivered to {queue}");
    }

    #[tokio::test]
    #[ignore = "需要Docker环境"]
    async fn test_publish_delivers_envelope_with_properties() {
        let container = RabbitMq::default().start().await.unwrap();
        let port = container.get_host_port_ipv4(5672).await.unwrap();

        let config = BrokerConfig {
            host: "127.0.0.1".to_string(),
            port,
            exchange: "amq.fanout".to_string(),
            ..BrokerConfig::default()
        };

        let uri = build_amqp_uri(&config).unwrap();
        let consumer = Connection::connect(uri.as_str(), ConnectionProperties::default())
            .await
            .unwrap();
        let consumer_channel = consumer.create_channel().await.unwrap();
        let queue = bind_capture_queue(&consumer_channel, &config.exchange).await;

        let session = RabbitMqConnector::new().open(&config).await.unwrap();
        assert!(session.is_connected());

        let key = Identifier::from_line("HeartbeatInterval").unwrap();
        let body = build_envelope("10.112.7.65", ChargerCommand::GetConfig, &key)
            .unwrap()
            .to_bytes()
            .unwrap();

        session
            .publish(&config.exchange, &config.routing_key, &body)
            .await
            .unwrap();

        let (data, properties) = get_one(&consumer_channel, &queue).await;
        let envelope = CommandEnvelope::from_slice(&data).unwrap();
        assert_eq!(envelope.charger.target_address, "10.112.7.65");
        assert_eq!(envelope.charger.command, ChargerCommand::GetConfig);
        assert_eq!(envelope.charger.key_name, "HeartbeatInterval");

        assert_eq!(
            properties.content_type().as_ref().map(|c| c.as_str()),
            Some("application/json")
        );
        assert_eq!(*properties.delivery_mode(), Some(2));
        assert!(properties.message_id().is_some());
        assert!(properties.timestamp().is_some());

        // 恰好一条
        let empty = consumer_channel
            .basic_get(queue.as_str().into(), BasicGetOptions::default())
            .await
            .unwrap();
        assert!(empty.is_none());

        session.close().await.unwrap();
        assert!(!session.is_connected());
        // 重复关闭不报错
        session.close().await.unwrap();
    }
}
