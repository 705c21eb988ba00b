use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use charger_core::{AppConfig, ItemOutcome, RunReport, RunStatus};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Cli;

/// 初始化日志系统
pub fn init_logging(log_level: &str, log_format: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match log_format {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
                .context("初始化JSON日志格式失败")?;
        }
        "pretty" => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()
                .context("初始化Pretty日志格式失败")?;
        }
        _ => {
            return Err(anyhow::anyhow!("不支持的日志格式: {log_format}"));
        }
    }

    Ok(())
}

/// 加载配置并应用命令行覆盖
pub fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_unvalidated(Some(path), None)
            .with_context(|| format!("加载配置文件失败: {path}"))?,
        None => AppConfig::load_unvalidated(None, None).context("加载配置失败")?,
    };

    cli.apply_overrides(&mut config)?;
    Ok(config)
}

/// 输出面向操作员的运行结果：每个成功标识一行确认，每个失败标识一行原因，最后一行汇总
pub fn print_report<W: Write>(report: &RunReport, out: &mut W) -> Result<()> {
    for entry in report.outcomes.entries() {
        match &entry.outcome {
            ItemOutcome::Sent => writeln!(out, "已发送命令: key={}", entry.identifier)?,
            ItemOutcome::Failed { reason, .. } => {
                writeln!(out, "发送命令失败: key={} ({})", entry.identifier, reason)?
            }
        }
    }

    match &report.status {
        RunStatus::Completed => writeln!(
            out,
            "分发运行 {} 完成: 成功 {}，失败 {}",
            report.run_id,
            report.sent_count(),
            report.failed_count()
        )?,
        RunStatus::Aborted { reason, .. } => {
            writeln!(out, "分发运行 {} 中止: {}", report.run_id, reason)?
        }
    }

    Ok(())
}

/// 将运行报告以JSON格式写入文件
pub fn write_report(path: impl AsRef<Path>, report: &RunReport) -> Result<()> {
    let path = path.as_ref();
    let json = report.to_json_pretty().context("序列化运行报告失败")?;
    std::fs::write(path, json)
        .with_context(|| format!("写入运行报告失败: {}", path.display()))?;
    Ok(())
}
