use clap::Parser;
use njcheck::domain::ports::ConfigProvider;
use njcheck::utils::error::ErrorSeverity;
use njcheck::utils::{logger, validation::Validate};
use njcheck::{CheckEngine, CliConfig, FileConfig, LocalStorage, OfferPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting njcheck");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let exit_code = match cli.config.clone() {
        Some(path) => match FileConfig::from_file(&path) {
            Ok(config) => {
                let monitor = cli.monitor || config.monitor;
                run(config, monitor).await
            }
            Err(e) => {
                tracing::error!("❌ Failed to load configuration: {}", e);
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
                1
            }
        },
        None => {
            let monitor = cli.monitor;
            run(cli, monitor).await
        }
    };

    if exit_code > 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run<C>(config: C, monitor_enabled: bool) -> i32
where
    C: ConfigProvider + Validate + 'static,
{
    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        return 1;
    }

    // 創建存儲和管道
    let storage = LocalStorage::new(config.output_path().unwrap_or(".").to_string());
    let pipeline = OfferPipeline::new(storage, config);

    // 創建檢查引擎並運行
    let engine = CheckEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Offer check completed successfully!");
            if output_path != "stdout" {
                tracing::info!("📁 Report saved to: {}", output_path);
            }
            0
        }
        Err(e) => {
            tracing::error!(
                "❌ Offer check failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

            // 根據錯誤嚴重程度決定退出碼
            match e.severity() {
                ErrorSeverity::Low => 0,      // 警告，但成功
                ErrorSeverity::Medium => 2,   // 重試錯誤
                ErrorSeverity::High => 1,     // 處理錯誤
                ErrorSeverity::Critical => 3, // 系統錯誤
            }
        }
    }
}
