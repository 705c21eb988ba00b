use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{models::Identifier, DispatchError};

/// 单个标识的发布结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    /// 已交给传输层（未等待代理确认）
    Sent,
    Failed { kind: String, reason: String },
}

impl ItemOutcome {
    pub fn failed(error: &DispatchError) -> Self {
        ItemOutcome::Failed {
            kind: error.kind().to_string(),
            reason: error.to_string(),
        }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, ItemOutcome::Sent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeEntry {
    pub identifier: Identifier,
    pub outcome: ItemOutcome,
}

/// 结果台账：按处理顺序记录每个标识的结果，重复标识各占一条
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutcomeLedger {
    entries: Vec<OutcomeEntry>,
}

impl OutcomeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_sent(&mut self, identifier: Identifier) {
        self.entries.push(OutcomeEntry {
            identifier,
            outcome: ItemOutcome::Sent,
        });
    }

    pub fn record_failed(&mut self, identifier: Identifier, error: &DispatchError) {
        self.entries.push(OutcomeEntry {
            identifier,
            outcome: ItemOutcome::failed(error),
        });
    }

    pub fn entries(&self) -> &[OutcomeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sent_count(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_sent()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.len() - self.sent_count()
    }
}

/// 分发运行的整体状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunStatus {
    /// 连接已建立，所有标识都处理过（单项失败不影响整体状态）
    Completed,
    /// 在发布开始前中止
    Aborted { kind: String, reason: String },
}

impl RunStatus {
    pub fn aborted(error: &DispatchError) -> Self {
        RunStatus::Aborted {
            kind: error.kind().to_string(),
            reason: error.to_string(),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, RunStatus::Completed)
    }
}

/// 一次分发运行的最终报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub status: RunStatus,
    pub outcomes: OutcomeLedger,
}

impl RunReport {
    pub fn sent_count(&self) -> usize {
        self.outcomes.sent_count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.failed_count()
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> Identifier {
        Identifier::from_line(raw).unwrap()
    }

    #[test]
    fn test_ledger_keeps_order_and_duplicates() {
        let mut ledger = OutcomeLedger::new();
        ledger.record_sent(id("A1"));
        ledger.record_failed(id("A2"), &DispatchError::publish("ex", "broken pipe"));
        ledger.record_sent(id("A1"));

        let keys: Vec<&str> = ledger
            .entries()
            .iter()
            .map(|e| e.identifier.as_str())
            .collect();
        assert_eq!(keys, vec!["A1", "A2", "A1"]);
        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.sent_count(), 2);
        assert_eq!(ledger.failed_count(), 1);
    }

    #[test]
    fn test_failed_outcome_carries_reason() {
        let mut ledger = OutcomeLedger::new();
        ledger.record_failed(id("K"), &DispatchError::publish("ex", "channel closed"));

        assert_eq!(ledger.failed_count(), 1);
        match &ledger.entries()[0].outcome {
            ItemOutcome::Failed { kind, reason } => {
                assert_eq!(kind, "publish_error");
                assert!(reason.contains("channel closed"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_report_json_shape() {
        let mut ledger = OutcomeLedger::new();
        ledger.record_sent(id("A1"));

        let report = RunReport {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            status: RunStatus::Completed,
            outcomes: ledger,
        };

        let value: serde_json::Value =
            serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();
        assert_eq!(value["status"]["state"], "completed");
        assert_eq!(value["outcomes"][0]["identifier"], "A1");
        assert_eq!(value["outcomes"][0]["outcome"]["status"], "sent");
    }

    #[test]
    fn test_aborted_status() {
        let status = RunStatus::aborted(&DispatchError::connection("h:1", "refused"));
        assert!(!status.is_completed());
        assert!(matches!(
            status,
            RunStatus::Aborted { ref kind, .. } if kind == "connection_error"
        ));
    }
}
