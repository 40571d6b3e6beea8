//! # Marzban 迁移工具主程序

use clap::Parser;
use marzban_migrate::{
    cli::{self, Cli},
    linfo,
    logging::{self, LogComponent, LogStage},
};

#[tokio::main]
async fn main() {
    let args = Cli::parse();
    logging::init_logging(args.log_level.as_deref());

    linfo!(
        "system",
        LogStage::Startup,
        LogComponent::Main,
        "start",
        "迁移工具启动",
        version = env!("CARGO_PKG_VERSION")
    );

    let code = cli::execute(args).await;

    linfo!(
        "system",
        LogStage::Shutdown,
        LogComponent::Main,
        "exit",
        "迁移工具退出",
        exit_code = code
    );
    std::process::exit(code);
}
