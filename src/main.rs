use anyhow::Context;
use form_sink::config::LogFormat;
use form_sink::server::{build_state, describe_variant, serve, shutdown_signal};
use form_sink::utils::{logger, validation::Validate};
use form_sink::ServerConfig;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;

    // 初始化日誌
    match config.log_format {
        LogFormat::Compact => logger::init_compact_logger(config.verbose),
        LogFormat::Json => logger::init_json_logger(config.verbose),
    }

    tracing::info!("Starting form-sink");
    if config.verbose {
        tracing::debug!("Server config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let state = build_state(&config)
        .await
        .context("failed to initialise storage or mail transport")?;

    let listener = TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address()))?;

    tracing::info!("🧩 Variant: {}", describe_variant(&config));
    tracing::info!(
        "🚀 HTTP server running. Access it at: http://{}/",
        listener.local_addr()?
    );

    serve(listener, state, shutdown_signal()).await?;

    tracing::info!("✅ Server stopped");
    Ok(())
}
