#![allow(dead_code)]

use async_trait::async_trait;
use form_sink::core::{MailMessage, Mailer, RecordStore, RecordStream};
use form_sink::server::serve;
use form_sink::{AppState, FormError, Result};
use std::sync::Mutex;
use tokio::net::TcpListener;

/// Starts the server on an ephemeral port and returns its base URL.
pub async fn spawn_server(state: AppState) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        serve(listener, state, std::future::pending()).await.unwrap();
    });

    format!("http://{}", addr)
}

pub fn assert_cors_headers(response: &reqwest::Response) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "POST, OPTIONS");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
    assert_eq!(headers["content-type"], "application/json");
}

#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<MailMessage>>,
    pub fail: bool,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn deliver(&self, message: &MailMessage) -> Result<()> {
        if self.fail {
            return Err(FormError::delivery("relay refused connection"));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Store whose every operation fails.
pub struct OfflineStore;

#[async_trait]
impl RecordStore for OfflineStore {
    async fn put(&self, key: &str, _value: &serde_json::Value) -> Result<()> {
        Err(FormError::storage_write(key, "connection reset"))
    }

    async fn list_all(&self) -> Result<RecordStream> {
        Err(FormError::storage_list("connection reset"))
    }
}
