pub mod config;
pub mod errors;
pub mod models;
pub mod traits;

pub use config::models::{AppConfig, BrokerConfig, DispatchConfig, ObservabilityConfig};
pub use errors::*;
pub use models::{
    build_envelope, ChargerCommand, CommandEnvelope, Identifier, ItemOutcome, OutcomeLedger,
    RunReport, RunStatus,
};
pub use traits::{BrokerConnector, BrokerSession};
