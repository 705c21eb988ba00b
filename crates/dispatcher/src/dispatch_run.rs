use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use charger_core::{
    build_envelope, AppConfig, BrokerConfig, BrokerConnector, BrokerSession, ChargerCommand,
    DispatchError, DispatchResult, Identifier, OutcomeLedger, RunReport, RunStatus,
};
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::input_source::load_identifiers;

/// 一次运行内固定不变的命令参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub target_address: String,
    pub command: ChargerCommand,
}

/// 一次分发运行的结果
///
/// `fatal` 为 `Some` 时运行在发布开始之前就已中止，台账为空。
#[derive(Debug)]
pub struct RunOutcome {
    pub report: RunReport,
    pub fatal: Option<DispatchError>,
}

impl RunOutcome {
    pub fn into_result(self) -> DispatchResult<RunReport> {
        match self.fatal {
            Some(err) => Err(err),
            None => Ok(self.report),
        }
    }
}

/// 命令分发器
///
/// 运行流程：加载标识 → 建立连接 → 逐个发布 → 关闭连接。
/// 加载失败或连接失败直接中止；单个标识发布失败只记入台账，继续处理下一个。
/// 所有代理调用都按顺序await，不存在并发发布。
pub struct CommandDispatcher {
    connector: Arc<dyn BrokerConnector>,
    broker: BrokerConfig,
    keys_file: PathBuf,
    spec: CommandSpec,
}

impl CommandDispatcher {
    pub fn new(
        connector: Arc<dyn BrokerConnector>,
        broker: BrokerConfig,
        keys_file: impl Into<PathBuf>,
        spec: CommandSpec,
    ) -> Self {
        Self {
            connector,
            broker,
            keys_file: keys_file.into(),
            spec,
        }
    }

    pub fn from_config(connector: Arc<dyn BrokerConnector>, config: &AppConfig) -> Self {
        Self::new(
            connector,
            config.broker.clone(),
            &config.dispatch.keys_file,
            CommandSpec {
                target_address: config.dispatch.target_address.clone(),
                command: config.dispatch.command,
            },
        )
    }

    /// 执行一次完整的分发运行
    pub async fn execute(&self) -> RunOutcome {
        let run_id = Uuid::new_v4();
        let span = info_span!("dispatch_run", %run_id, exchange = %self.broker.exchange);

        async move {
            let started_at = Utc::now();

            let identifiers = match load_identifiers(&self.keys_file) {
                Ok(identifiers) => identifiers,
                Err(e) => return self.abort(run_id, started_at, e),
            };
            info!(
                "已加载 {} 个标识，命令 {} → {}",
                identifiers.len(),
                self.spec.command,
                self.spec.target_address
            );

            let session = match self.connector.open(&self.broker).await {
                Ok(session) => SessionGuard::new(session),
                Err(e) => return self.abort(run_id, started_at, e),
            };

            let ledger = self.publish_all(session.session(), &identifiers).await;
            session.release().await;

            info!(
                "分发完成: 共 {} 个，成功 {}，失败 {}",
                ledger.len(),
                ledger.sent_count(),
                ledger.failed_count()
            );

            RunOutcome {
                report: RunReport {
                    run_id,
                    started_at,
                    finished_at: Utc::now(),
                    status: RunStatus::Completed,
                    outcomes: ledger,
                },
                fatal: None,
            }
        }
        .instrument(span)
        .await
    }

    /// 按顺序逐个发布，每个标识在台账中恰好占一条
    async fn publish_all(
        &self,
        session: &dyn BrokerSession,
        identifiers: &[Identifier],
    ) -> OutcomeLedger {
        let mut ledger = OutcomeLedger::new();

        for identifier in identifiers {
            match self.publish_one(session, identifier).await {
                Ok(()) => {
                    debug!("已发送命令: key={}", identifier);
                    ledger.record_sent(identifier.clone());
                }
                Err(e) => {
                    warn!("发送命令失败: key={}, 错误: {}", identifier, e);
                    ledger.record_failed(identifier.clone(), &e);
                }
            }
        }

        ledger
    }

    async fn publish_one(
        &self,
        session: &dyn BrokerSession,
        identifier: &Identifier,
    ) -> DispatchResult<()> {
        let body = build_envelope(&self.spec.target_address, self.spec.command, identifier)?
            .to_bytes()?;

        session
            .publish(&self.broker.exchange, &self.broker.routing_key, &body)
            .await
    }

    fn abort(
        &self,
        run_id: Uuid,
        started_at: chrono::DateTime<Utc>,
        error: DispatchError,
    ) -> RunOutcome {
        error!("分发运行中止: {}", error);

        RunOutcome {
            report: RunReport {
                run_id,
                started_at,
                finished_at: Utc::now(),
                status: RunStatus::aborted(&error),
                outcomes: OutcomeLedger::new(),
            },
            fatal: Some(error),
        }
    }
}

/// 持有已打开的会话，保证每次运行恰好关闭一次
///
/// 正常路径通过 [`SessionGuard::release`] 关闭；若因panic或future被取消而未释放，
/// drop时记录警告，底层连接随会话一起丢弃。
struct SessionGuard {
    session: Box<dyn BrokerSession>,
    released: bool,
}

impl SessionGuard {
    fn new(session: Box<dyn BrokerSession>) -> Self {
        Self {
            session,
            released: false,
        }
    }

    fn session(&self) -> &dyn BrokerSession {
        self.session.as_ref()
    }

    /// 关闭会话，关闭失败只记录日志，不向上抛出
    async fn release(mut self) {
        if let Err(e) = self.session.close().await {
            warn!("关闭代理连接失败: {}", e);
        }
        self.released = true;
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if !self.released {
            warn!("代理会话未经关闭即被丢弃");
        }
    }
}
