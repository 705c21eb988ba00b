pub mod app_config;
pub mod broker;
pub mod dispatch;
pub mod observability;

pub use app_config::AppConfig;
pub use broker::BrokerConfig;
pub use dispatch::DispatchConfig;
pub use observability::ObservabilityConfig;
