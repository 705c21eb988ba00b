//! Test helper utilities

use charger_core::{AppConfig, BrokerConfig, ChargerCommand, DispatchConfig};
use std::io::Write;
use tempfile::NamedTempFile;

pub const TEST_TARGET_ADDRESS: &str = "10.112.7.65";
pub const TEST_EXCHANGE: &str = "evmswss_command";

/// Write `lines` into a temporary identifier list, one per line
pub fn write_keys_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();
    file
}

/// A valid configuration whose dispatch section points at `keys_file`
pub fn test_config(keys_file: &str) -> AppConfig {
    AppConfig {
        broker: BrokerConfig {
            exchange: TEST_EXCHANGE.to_string(),
            ..BrokerConfig::default()
        },
        dispatch: DispatchConfig {
            keys_file: keys_file.to_string(),
            target_address: TEST_TARGET_ADDRESS.to_string(),
            command: ChargerCommand::GetConfig,
        },
        ..AppConfig::default()
    }
}
