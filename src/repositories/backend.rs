use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::warn;

/// Representation written for a collection that has never held a record.
pub const EMPTY_COLLECTION: &str = "[]";

/// Storage failures. These are logged by the collection and never surface to clients.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed collection JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Collection document is not a JSON array")]
    NotAnArray,
}

/// Where a collection's full contents are read from at boot and written to on every mutation.
pub trait Persistence<T>: Send + Sync {
    fn load(&self) -> Result<Vec<T>, StoreError>;
    fn persist(&self, records: &[T]) -> Result<(), StoreError>;
    /// Human readable location used in log lines.
    fn location(&self) -> String;
}

/// Only a syntax error or a non-array document fails the whole load. A single element
/// that still cannot be read is skipped so the rest of the collection survives.
fn decode<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>, StoreError> {
    let Value::Array(elements) = serde_json::from_str::<Value>(raw)? else {
        return Err(StoreError::NotAnArray);
    };

    let mut records = Vec::with_capacity(elements.len());
    for (index, element) in elements.into_iter().enumerate() {
        let id = element.get("id").cloned();
        match serde_json::from_value(element) {
            Ok(record) => records.push(record),
            Err(err) => warn!(index, id = ?id, error = %err, "Skipping unreadable record"),
        }
    }
    Ok(records)
}

fn encode<T: Serialize>(records: &[T]) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// A pretty-printed JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the parent directory and an empty array file when either is missing.
    fn ensure_file(&self) -> io::Result<()> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        if !self.path.exists() {
            fs::write(&self.path, EMPTY_COLLECTION)?;
        }
        Ok(())
    }
}

impl<T> Persistence<T> for JsonFileBackend
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    fn load(&self) -> Result<Vec<T>, StoreError> {
        self.ensure_file()?;
        let raw = fs::read_to_string(&self.path)?;
        decode(&raw)
    }

    fn persist(&self, records: &[T]) -> Result<(), StoreError> {
        self.ensure_file()?;
        let body = encode(records)?;
        fs::write(&self.path, body)?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Keeps the serialized collection in memory. Clones share the same contents, so a
/// second collection opened on a clone sees what the first one persisted.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    contents: Arc<Mutex<Option<String>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(raw: impl Into<String>) -> Self {
        Self {
            contents: Arc::new(Mutex::new(Some(raw.into()))),
        }
    }

    /// The serialized text as last written, if anything was written.
    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<T> Persistence<T> for InMemoryBackend
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    fn load(&self) -> Result<Vec<T>, StoreError> {
        let mut guard = self.contents.lock().unwrap_or_else(PoisonError::into_inner);
        let raw = guard.get_or_insert_with(|| EMPTY_COLLECTION.to_string());
        decode(raw)
    }

    fn persist(&self, records: &[T]) -> Result<(), StoreError> {
        let body = encode(records)?;
        *self.contents.lock().unwrap_or_else(PoisonError::into_inner) = Some(body);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: u64,
        label: String,
    }

    #[test]
    fn load_creates_missing_directory_and_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("rows.json");
        let backend = JsonFileBackend::new(&path);

        let rows: Vec<Row> = backend.load().unwrap();
        assert!(rows.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn persist_writes_two_space_pretty_json() {
        let dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("rows.json"));
        let rows = vec![Row {
            id: 1,
            label: "uno".into(),
        }];

        backend.persist(&rows).unwrap();

        let written = fs::read_to_string(backend.path()).unwrap();
        assert_eq!(written, "[\n  {\n    \"id\": 1,\n    \"label\": \"uno\"\n  }\n]");
        let reloaded: Vec<Row> = backend.load().unwrap();
        assert_eq!(reloaded, rows);
    }

    #[test]
    fn malformed_file_is_reported_and_left_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rows.json");
        fs::write(&path, "{ not json").unwrap();
        let backend = JsonFileBackend::new(&path);

        let result: Result<Vec<Row>, _> = backend.load();
        assert_matches!(result, Err(StoreError::Json(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn non_array_document_is_rejected() {
        let backend = InMemoryBackend::with_contents(r#"{"id": 1, "label": "x"}"#);
        let result: Result<Vec<Row>, _> = backend.load();
        assert_matches!(result, Err(StoreError::NotAnArray));
    }

    #[test]
    fn unreadable_element_is_skipped_and_the_rest_kept() {
        let backend = InMemoryBackend::with_contents(
            r#"[{"id": 1, "label": "uno"}, {"label": "senza id"}, {"id": 3, "label": "tre"}]"#,
        );
        let rows: Vec<Row> = backend.load().unwrap();
        assert_eq!(rows.iter().map(|row| row.id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn in_memory_clones_share_contents() {
        let backend = InMemoryBackend::new();
        let twin = backend.clone();
        Persistence::<Row>::persist(
            &backend,
            &[Row {
                id: 4,
                label: "quattro".into(),
            }],
        )
        .unwrap();

        let rows: Vec<Row> = twin.load().unwrap();
        assert_eq!(rows.len(), 1);
        assert!(twin.contents().unwrap().contains("quattro"));
    }
}
