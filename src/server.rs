use crate::adapters::storage::{FileStore, MemoryStore};
use crate::config::{ServerConfig, SinkMode, StoreBackend};
use crate::core::ingest::IngestService;
use crate::core::read::{ReadService, SecretGate};
use crate::domain::ports::{Mailer, RecordStore};
use crate::http::{router, AppState};
use crate::utils::error::{FormError, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

pub fn build_store(config: &ServerConfig) -> Arc<dyn RecordStore> {
    match config.store {
        StoreBackend::File => Arc::new(FileStore::new(&config.data_dir)),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    }
}

#[cfg(feature = "smtp")]
async fn build_mailer(config: &ServerConfig) -> Result<Arc<dyn Mailer>> {
    let mailer = crate::adapters::mail::SmtpMailer::from_config(&config.smtp)?;

    // 啟動時先試連一次；失敗只警告，每個請求仍會自行回報錯誤
    match mailer.verify().await {
        Ok(true) => tracing::info!("📧 SMTP relay reachable"),
        Ok(false) => tracing::warn!("⚠️ SMTP relay did not accept a test connection"),
        Err(e) => tracing::warn!("⚠️ SMTP relay check failed: {}", e),
    }

    Ok(Arc::new(mailer))
}

#[cfg(not(feature = "smtp"))]
async fn build_mailer(_config: &ServerConfig) -> Result<Arc<dyn Mailer>> {
    Err(FormError::ConfigError {
        message: "email mode requires the `smtp` feature".to_string(),
    })
}

/// Wires store, mailer and services from configuration.
pub async fn build_state(config: &ServerConfig) -> Result<AppState> {
    let state = match config.mode {
        SinkMode::Store => {
            let store = build_store(config);
            let mut state = AppState::new(IngestService::to_store(store.clone()));

            if config.serves_reads() {
                state = state.with_reader(ReadService::new(store));
                if let Some(secret) = &config.read_secret {
                    state = state.with_secret_gate(SecretGate::new(&config.secret_header, secret));
                }
            }
            state
        }
        SinkMode::Email => {
            let mailer = build_mailer(config).await?;
            AppState::new(IngestService::to_mail(mailer, &config.smtp.mail_subject))
        }
    };

    Ok(state.with_max_body_bytes(config.max_body_bytes))
}

pub fn describe_variant(config: &ServerConfig) -> String {
    match (config.mode, config.serves_reads(), config.read_secret.is_some()) {
        (SinkMode::Email, _, _) => "email forward".to_string(),
        (SinkMode::Store, false, _) => format!("{:?} store, ingest only", config.store),
        (SinkMode::Store, true, false) => format!("{:?} store, ingest + read", config.store),
        (SinkMode::Store, true, true) => {
            format!("{:?} store, ingest + secret-gated read", config.store)
        }
    }
}

pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(FormError::IoError)
}

pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("❌ Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("🛑 Shutdown signal received");
}
