use crate::domain::model::Record;
use crate::domain::ports::{RecordStore, RecordStream};
use crate::utils::error::{FormError, Result};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

const RECORD_EXTENSION: &str = "json";

/// Directory-backed key-value store: one `{key, value}` JSON file per record.
///
/// Nothing is cached between calls; every operation reopens the directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", file_stem_for(key), RECORD_EXTENSION))
    }
}

fn is_plain(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'-')
}

/// 檔名只保留 `[A-Za-z0-9._-]`，其餘位元組編成 `%XX`，可逆
pub fn file_stem_for(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        if is_plain(byte) {
            stem.push(byte as char);
        } else {
            stem.push_str(&format!("%{:02X}", byte));
        }
    }
    stem
}

/// Inverse of [`file_stem_for`]; `None` for stems this store never wrote.
pub fn key_for_file_stem(stem: &str) -> Option<String> {
    let mut bytes = Vec::with_capacity(stem.len());
    let mut rest = stem.as_bytes();
    while let Some((&byte, tail)) = rest.split_first() {
        if byte == b'%' {
            let hex = std::str::from_utf8(tail.get(..2)?).ok()?;
            bytes.push(u8::from_str_radix(hex, 16).ok()?);
            rest = &tail[2..];
        } else {
            bytes.push(byte);
            rest = tail;
        }
    }
    String::from_utf8(bytes).ok()
}

fn sort_key(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    key_for_file_stem(&stem).unwrap_or(stem)
}

async fn read_record(path: PathBuf) -> Result<Record> {
    let bytes = fs::read(&path)
        .await
        .map_err(|e| FormError::storage_list(format!("{}: {}", path.display(), e)))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| FormError::storage_list(format!("{}: {}", path.display(), e)))
}

#[async_trait]
impl RecordStore for FileStore {
    async fn put(&self, key: &str, value: &Value) -> Result<()> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| FormError::storage_write(key, e))?;

        let record = Record::new(key, value.clone());
        let data = serde_json::to_vec(&record).map_err(|e| FormError::storage_write(key, e))?;

        // 先寫暫存檔再改名，列舉時不會讀到寫一半的檔案
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, &data)
            .await
            .map_err(|e| FormError::storage_write(key, e))?;
        fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| FormError::storage_write(key, e))?;

        Ok(())
    }

    async fn list_all(&self) -> Result<RecordStream> {
        let mut dir = match fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(stream::empty().boxed()),
            Err(e) => return Err(FormError::storage_list(e)),
        };

        let mut paths = Vec::new();
        while let Some(entry) = dir.next_entry().await.map_err(FormError::storage_list)? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some(RECORD_EXTENSION) {
                paths.push(path);
            }
        }
        // 依解碼後的 key 排序，`%XX` 的字典序與原字元不同
        paths.sort_by_cached_key(|path| sort_key(path));

        Ok(stream::iter(paths).then(read_record).boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use serde_json::json;
    use tempfile::TempDir;

    async fn collect(store: &FileStore) -> Result<Vec<Record>> {
        store.list_all().await?.try_collect().await
    }

    #[test]
    fn test_file_stem_escapes_unsafe_characters() {
        assert_eq!(
            file_stem_for("data-2024-05-01T12:30:45.123Z"),
            "data-2024-05-01T12%3A30%3A45.123Z"
        );
        assert_eq!(file_stem_for("a/b\\c d"), "a%2Fb%5Cc%20d");
        assert_eq!(file_stem_for("100%"), "100%25");
        assert_eq!(file_stem_for("é"), "%C3%A9");
    }

    #[test]
    fn test_file_stem_is_reversible() {
        for key in ["data-2024-05-01T12:30:45.123Z", "a:b", "a_b", "a%3Ab", "x/y z", "é"] {
            assert_eq!(key_for_file_stem(&file_stem_for(key)).as_deref(), Some(key));
        }
        assert_ne!(file_stem_for("a:b"), file_stem_for("a_b"));
        assert_ne!(file_stem_for("a:b"), file_stem_for("a%3Ab"));
        assert_eq!(key_for_file_stem("broken%4"), None);
        assert_eq!(key_for_file_stem("bad%ZZ"), None);
    }

    #[tokio::test]
    async fn test_distinct_keys_never_share_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        store.put("a:b", &json!("colon")).await.unwrap();
        store.put("a_b", &json!("underscore")).await.unwrap();
        store.put("a%3Ab", &json!("literal")).await.unwrap();

        let records = collect(&store).await.unwrap();
        assert_eq!(
            records,
            vec![
                Record::new("a%3Ab", json!("literal")),
                Record::new("a:b", json!("colon")),
                Record::new("a_b", json!("underscore")),
            ]
        );
    }

    #[tokio::test]
    async fn test_put_then_list_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("records"));

        store
            .put("data-2024-05-01T12:30:45.123Z", &json!({"name": "Ada"}))
            .await
            .unwrap();
        store
            .put("data-2024-05-01T12:30:45.123Z-000001", &json!([1, 2, 3]))
            .await
            .unwrap();

        let records = collect(&store).await.unwrap();
        assert_eq!(
            records,
            vec![
                Record::new("data-2024-05-01T12:30:45.123Z", json!({"name": "Ada"})),
                Record::new("data-2024-05-01T12:30:45.123Z-000001", json!([1, 2, 3])),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_directory_lists_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("never-created"));
        assert!(collect(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_listing_skips_foreign_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        store.put("data-1", &json!(1)).await.unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), "not a record").unwrap();
        std::fs::write(temp_dir.path().join("data-2.json.tmp"), "{").unwrap();

        let records = collect(&store).await.unwrap();
        assert_eq!(records, vec![Record::new("data-1", json!(1))]);
    }

    #[tokio::test]
    async fn test_corrupt_record_fails_listing() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        std::fs::write(temp_dir.path().join("broken.json"), "{").unwrap();

        let err = collect(&store).await.unwrap_err();
        assert!(matches!(err, FormError::StorageList { .. }));
    }

    #[tokio::test]
    async fn test_write_into_unusable_root_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "a file, not a directory").unwrap();

        let store = FileStore::new(&blocker);
        let err = store.put("data-1", &json!(1)).await.unwrap_err();
        assert!(matches!(err, FormError::StorageWrite { .. }));
    }
}
