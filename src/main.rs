use std::sync::Arc;

use anyhow::Result;
use charger_dispatcher::CommandDispatcher;
use charger_infrastructure::RabbitMqConnector;
use clap::Parser;
use tracing::{error, info};

use charger_dispatch::cli::Cli;
use charger_dispatch::common::{init_logging, load_config, print_report, write_report};

// 单线程运行时：所有代理调用按顺序执行
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    init_logging(
        &config.observability.log_level,
        &config.observability.log_format,
    )?;

    info!("启动充电桩命令分发");
    info!("消息代理: {}", config.broker.redacted_uri());
    info!("标识列表: {}", config.dispatch.keys_file);

    let dispatcher = CommandDispatcher::from_config(Arc::new(RabbitMqConnector::new()), &config);
    let outcome = dispatcher.execute().await;

    print_report(&outcome.report, &mut std::io::stdout().lock())?;

    if let Some(path) = &cli.report {
        if let Err(e) = write_report(path, &outcome.report) {
            error!("{e:#}");
        }
    }

    outcome.into_result()?;
    Ok(())
}
