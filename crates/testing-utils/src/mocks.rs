//! Mock implementations of the broker capability traits
//!
//! The connector and every session it opens share one state, so a test can keep
//! the connector and inspect what the dispatch loop did after the run.

use async_trait::async_trait;
use charger_core::{
    BrokerConfig, BrokerConnector, BrokerSession, CommandEnvelope, DispatchError, DispatchResult,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// One call to `publish`, successful or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishAttempt {
    pub exchange: String,
    pub routing_key: String,
    pub body: Vec<u8>,
    pub succeeded: bool,
}

impl PublishAttempt {
    pub fn envelope(&self) -> CommandEnvelope {
        CommandEnvelope::from_slice(&self.body).unwrap()
    }
}

#[derive(Debug, Default)]
struct MockBrokerState {
    open_error: Option<String>,
    /// 1-based publish attempt numbers that fail
    failing_attempts: HashSet<usize>,
    fail_close: bool,
    attempts: Vec<PublishAttempt>,
    open_calls: usize,
    close_calls: usize,
    connected: bool,
    last_config: Option<BrokerConfig>,
}

/// Mock implementation of BrokerConnector for testing
#[derive(Debug, Clone, Default)]
pub struct MockBrokerConnector {
    state: Arc<Mutex<MockBrokerState>>,
}

impl MockBrokerConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// `open` fails with a connection error
    pub fn failing_open(reason: &str) -> Self {
        let connector = Self::new();
        connector.state.lock().unwrap().open_error = Some(reason.to_string());
        connector
    }

    /// The given 1-based publish attempt fails with a publish error
    pub fn fail_publish_on(self, attempt: usize) -> Self {
        self.state.lock().unwrap().failing_attempts.insert(attempt);
        self
    }

    /// `close` returns an error (the dispatch loop must swallow it)
    pub fn fail_close(self) -> Self {
        self.state.lock().unwrap().fail_close = true;
        self
    }

    pub fn attempts(&self) -> Vec<PublishAttempt> {
        self.state.lock().unwrap().attempts.clone()
    }

    pub fn publish_attempts(&self) -> usize {
        self.state.lock().unwrap().attempts.len()
    }

    pub fn published(&self) -> Vec<PublishAttempt> {
        self.attempts().into_iter().filter(|a| a.succeeded).collect()
    }

    /// key_name of every attempt, in order
    pub fn attempted_keys(&self) -> Vec<String> {
        self.attempts()
            .iter()
            .map(|a| a.envelope().charger.key_name)
            .collect()
    }

    pub fn open_calls(&self) -> usize {
        self.state.lock().unwrap().open_calls
    }

    pub fn close_calls(&self) -> usize {
        self.state.lock().unwrap().close_calls
    }

    pub fn is_connected(&self) -> bool {
        self.state.lock().unwrap().connected
    }

    pub fn last_config(&self) -> Option<BrokerConfig> {
        self.state.lock().unwrap().last_config.clone()
    }
}

#[async_trait]
impl BrokerConnector for MockBrokerConnector {
    async fn open(&self, config: &BrokerConfig) -> DispatchResult<Box<dyn BrokerSession>> {
        let mut state = self.state.lock().unwrap();
        state.open_calls += 1;
        state.last_config = Some(config.clone());

        if let Some(reason) = &state.open_error {
            return Err(DispatchError::connection(config.redacted_uri(), reason.clone()));
        }

        state.connected = true;
        Ok(Box::new(MockBrokerSession {
            state: Arc::clone(&self.state),
        }))
    }
}

/// Session handed out by [`MockBrokerConnector`]
#[derive(Debug)]
pub struct MockBrokerSession {
    state: Arc<Mutex<MockBrokerState>>,
}

#[async_trait]
impl BrokerSession for MockBrokerSession {
    async fn publish(&self, exchange: &str, routing_key: &str, body: &[u8]) -> DispatchResult<()> {
        let mut state = self.state.lock().unwrap();
        let attempt_no = state.attempts.len() + 1;
        let succeeded = state.connected && !state.failing_attempts.contains(&attempt_no);

        state.attempts.push(PublishAttempt {
            exchange: exchange.to_string(),
            routing_key: routing_key.to_string(),
            body: body.to_vec(),
            succeeded,
        });

        if succeeded {
            Ok(())
        } else {
            Err(DispatchError::publish(
                exchange,
                format!("simulated transport fault on attempt {attempt_no}"),
            ))
        }
    }

    async fn close(&self) -> DispatchResult<()> {
        let mut state = self.state.lock().unwrap();
        state.close_calls += 1;
        state.connected = false;

        if state.fail_close {
            return Err(DispatchError::connection("mock", "simulated close failure"));
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state.lock().unwrap().connected
    }
}
