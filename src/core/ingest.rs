use crate::core::keys::KeyGenerator;
use crate::core::render::render_message;
use crate::domain::ports::{Mailer, RecordStore};
use crate::utils::error::{FormError, Result};
use serde_json::Value;
use std::sync::Arc;

/// Where a decoded submission goes.
pub enum Sink {
    Store {
        store: Arc<dyn RecordStore>,
        keys: KeyGenerator,
    },
    Mail {
        mailer: Arc<dyn Mailer>,
        subject: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Receipt {
    Stored { key: String },
    Delivered,
}

pub struct IngestService {
    sink: Sink,
}

impl IngestService {
    pub fn new(sink: Sink) -> Self {
        Self { sink }
    }

    pub fn to_store(store: Arc<dyn RecordStore>) -> Self {
        Self::new(Sink::Store {
            store,
            keys: KeyGenerator::new(),
        })
    }

    pub fn to_mail(mailer: Arc<dyn Mailer>, subject: impl Into<String>) -> Self {
        Self::new(Sink::Mail {
            mailer,
            subject: subject.into(),
        })
    }

    /// Decodes a fully drained body and persists or forwards it.
    pub async fn ingest(&self, body: &[u8]) -> Result<Receipt> {
        let value = decode_body(body)?;

        match &self.sink {
            Sink::Store { store, keys } => {
                let key = keys.next_key();
                store.put(&key, &value).await?;
                tracing::debug!("💾 Stored submission under {}", key);
                Ok(Receipt::Stored { key })
            }
            Sink::Mail { mailer, subject } => {
                let message = render_message(subject, &value);
                mailer.deliver(&message).await?;
                tracing::debug!("📧 Forwarded submission by mail");
                Ok(Receipt::Delivered)
            }
        }
    }
}

pub fn decode_body(body: &[u8]) -> Result<Value> {
    if body.is_empty() {
        return Err(FormError::NoBody);
    }
    Ok(serde_json::from_slice(body)?)
}
