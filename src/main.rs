use clap::Parser;
use std::sync::Arc;
use storefront_client::app::commands;
use storefront_client::config::cli::LogFormat;
use storefront_client::utils::error::{ErrorSeverity, StorefrontError};
use storefront_client::utils::logger;
use storefront_client::{CliConfig, ConsoleNotifier, Storefront};

fn exit_code(e: &StorefrontError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,      // 輸入問題，已提示使用者
        ErrorSeverity::Medium => 2,   // 網路或登入問題，可重試
        ErrorSeverity::High => 1,     // 伺服器拒絕或回應異常
        ErrorSeverity::Critical => 3, // 設定或本機檔案錯誤
    }
}

fn report(e: &StorefrontError) {
    tracing::error!(
        "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli.command);
    }

    // 載入並驗證配置
    let settings = match cli.settings() {
        Ok(settings) => settings,
        Err(e) => {
            report(&e);
            std::process::exit(exit_code(&e).max(1));
        }
    };
    tracing::debug!("Using storefront at {}", settings.base_url);

    let storefront = match Storefront::connect(settings, Arc::new(ConsoleNotifier)).await {
        Ok(storefront) => storefront,
        Err(e) => {
            report(&e);
            std::process::exit(exit_code(&e).max(1));
        }
    };

    match commands::run(&cli.command, &storefront).await {
        Ok(output) => {
            if !output.text.is_empty() {
                println!("{}", output.text);
            }
            if !output.success {
                std::process::exit(1);
            }
        }
        Err(e) => {
            report(&e);
            let code = exit_code(&e);
            if code > 0 {
                std::process::exit(code);
            }
        }
    }

    Ok(())
}
