use crate::domain::model::Record;
use crate::domain::ports::{RecordStore, RecordStream};
use crate::utils::error::Result;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// In-process store; lists in key order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn put(&self, key: &str, value: &Value) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn list_all(&self) -> Result<RecordStream> {
        // 取快照，之後的寫入不影響這次列舉
        let snapshot: Vec<Record> = self
            .entries
            .read()
            .await
            .iter()
            .map(|(key, value)| Record::new(key.clone(), value.clone()))
            .collect();

        Ok(stream::iter(snapshot.into_iter().map(Ok)).boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use serde_json::json;

    #[tokio::test]
    async fn test_put_overwrites_existing_key() {
        let store = MemoryStore::new();
        store.put("data-1", &json!({"v": 1})).await.unwrap();
        store.put("data-1", &json!({"v": 2})).await.unwrap();

        assert_eq!(store.len().await, 1);
        let records: Vec<Record> = store.list_all().await.unwrap().try_collect().await.unwrap();
        assert_eq!(records, vec![Record::new("data-1", json!({"v": 2}))]);
    }

    #[tokio::test]
    async fn test_listing_is_restartable_and_snapshotted() {
        let store = MemoryStore::new();
        store.put("data-1", &json!(1)).await.unwrap();

        let first = store.list_all().await.unwrap();
        store.put("data-2", &json!(2)).await.unwrap();
        let second = store.list_all().await.unwrap();

        let first: Vec<Record> = first.try_collect().await.unwrap();
        let second: Vec<Record> = second.try_collect().await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
    }
}
