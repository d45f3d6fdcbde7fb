use crate::domain::model::Record;
use crate::domain::ports::RecordStore;
use crate::utils::error::{FormError, Result};
use futures::TryStreamExt;
use std::sync::Arc;

pub struct ReadService {
    store: Arc<dyn RecordStore>,
}

impl ReadService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Collects the whole keyspace in the store's iteration order.
    pub async fn read_all(&self) -> Result<Vec<Record>> {
        let records: Vec<Record> = self.store.list_all().await?.try_collect().await?;
        tracing::debug!("📖 Listed {} records", records.len());
        Ok(records)
    }
}

/// Shared-secret check for the read endpoint.
#[derive(Debug, Clone)]
pub struct SecretGate {
    header: String,
    secret: String,
}

impl SecretGate {
    pub fn new(header: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            header: header.into().to_ascii_lowercase(),
            secret: secret.into(),
        }
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn check(&self, presented: Option<&str>) -> Result<()> {
        match presented {
            Some(value) if value == self.secret => Ok(()),
            _ => Err(FormError::AuthMismatch),
        }
    }
}
