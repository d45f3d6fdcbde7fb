use crate::domain::model::{MailMessage, Record};
use crate::utils::error::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;

/// A lazily produced listing. Finite; each call to `list_all` starts a new one.
pub type RecordStream = BoxStream<'static, Result<Record>>;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Single-key write. An existing value under `key` is replaced.
    async fn put(&self, key: &str, value: &serde_json::Value) -> Result<()>;

    /// Opens a listing over the whole keyspace.
    async fn list_all(&self) -> Result<RecordStream>;
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn deliver(&self, message: &MailMessage) -> Result<()>;
}
