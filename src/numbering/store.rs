use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

/// On-disk layout of the sequence record. Read and written as a whole on
/// every counter operation; no partial updates, no append log.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SequenceRecord {
    last_invoice_number: u64,
}

/// Persistence seam for the sequence counter.
#[async_trait]
pub trait CounterStore: Send + Sync {
    async fn load(&self) -> io::Result<u64>;
    async fn save(&self, value: u64) -> io::Result<()>;
}

/// Whole-file JSON store at a fixed path.
pub struct FileCounterStore {
    path: PathBuf,
}

impl FileCounterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileCounterStore { path: path.into() }
    }

    async fn write_record(&self, value: u64) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let record = SequenceRecord { last_invoice_number: value };
        let data = serde_json::to_string_pretty(&record)?;
        tokio::fs::write(&self.path, data).await
    }
}

#[async_trait]
impl CounterStore for FileCounterStore {
    async fn load(&self) -> io::Result<u64> {
        if !self.path.exists() {
            self.write_record(0).await?;
            return Ok(0);
        }

        let data = tokio::fs::read_to_string(&self.path).await?;
        match serde_json::from_str::<SequenceRecord>(&data) {
            Ok(record) => Ok(record.last_invoice_number),
            Err(err) => {
                // Corrupt record: log and restart the sequence at 0
                tracing::error!("invoice store at {:?} is corrupt: {}", self.path, err);
                Ok(0)
            }
        }
    }

    async fn save(&self, value: u64) -> io::Result<()> {
        self.write_record(value).await
    }
}

/// In-memory store for tests and embedding.
#[derive(Default)]
pub struct MemoryCounterStore {
    value: Mutex<u64>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn load(&self) -> io::Result<u64> {
        Ok(*self.value.lock().unwrap())
    }

    async fn save(&self, value: u64) -> io::Result<()> {
        *self.value.lock().unwrap() = value;
        Ok(())
    }
}
