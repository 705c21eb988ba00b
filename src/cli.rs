use anyhow::Result;
use charger_core::{AppConfig, ChargerCommand};
use clap::Parser;

/// 命令行参数
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "send-command")]
#[command(version)]
#[command(about = "向充电桩批量发送命令")]
#[command(long_about = "读取标识列表，为每个标识构造一条充电桩命令并发布到RabbitMQ交换机")]
pub struct Cli {
    /// 配置文件路径 (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// 标识列表文件，每行一个标识
    #[arg(short, long)]
    pub keys_file: Option<String>,

    /// 目标充电桩IP地址
    #[arg(short, long)]
    pub target_address: Option<String>,

    /// 命令 (get_config | update_firmware | soft_reset)
    #[arg(long)]
    pub command: Option<ChargerCommand>,

    /// 交换机名称
    #[arg(short, long)]
    pub exchange: Option<String>,

    /// 日志级别
    #[arg(short, long, value_parser = ["trace", "debug", "info", "warn", "error"])]
    pub log_level: Option<String>,

    /// 日志格式
    #[arg(long, value_parser = ["json", "pretty"])]
    pub log_format: Option<String>,

    /// 运行报告输出路径 (JSON)
    #[arg(short, long)]
    pub report: Option<String>,
}

impl Cli {
    /// 命令行参数覆盖配置文件和环境变量，覆盖后重新校验
    pub fn apply_overrides(&self, config: &mut AppConfig) -> Result<()> {
        if let Some(keys_file) = &self.keys_file {
            config.dispatch.keys_file = keys_file.clone();
        }
        if let Some(target_address) = &self.target_address {
            config.dispatch.target_address = target_address.clone();
        }
        if let Some(command) = self.command {
            config.dispatch.command = command;
        }
        if let Some(exchange) = &self.exchange {
            config.broker.exchange = exchange.clone();
        }
        if let Some(log_level) = &self.log_level {
            config.observability.log_level = log_level.clone();
        }
        if let Some(log_format) = &self.log_format {
            config.observability.log_format = log_format.clone();
        }

        config.validate()?;
        Ok(())
    }
}
