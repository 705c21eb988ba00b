pub mod amqp_uri;
pub mod rabbitmq;

pub use amqp_uri::build_amqp_uri;
pub use rabbitmq::{RabbitMqConnector, RabbitMqSession};
