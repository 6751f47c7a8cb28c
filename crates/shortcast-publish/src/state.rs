//! Publish state store.
//!
//! The whole collection of content units is rewritten on every mutation;
//! there are no partial-record updates. The backing JSON is pretty-printed
//! with stable field order so runs are human-diffable.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

use shortcast_models::ContentUnit;

use crate::error::{PublishError, PublishResult};

/// Durable record of all content units.
///
/// Callers must persist after every state-changing step (segment creation,
/// each successful upload) so a crash loses at most one in-flight
/// operation.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load all content units.
    async fn load(&self) -> PublishResult<Vec<ContentUnit>>;

    /// Atomically replace the persisted collection.
    async fn persist(&self, units: &[ContentUnit]) -> PublishResult<()>;
}

/// Flat-file JSON state store.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StateStore for JsonStateStore {
    /// Load all units. A missing or corrupt file is treated as "no prior
    /// state", never a fatal startup error.
    async fn load(&self) -> PublishResult<Vec<ContentUnit>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No state file at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&bytes) {
            Ok(units) => Ok(units),
            Err(e) => {
                warn!(
                    "State file {} unreadable ({}), starting empty",
                    self.path.display(),
                    e
                );
                Ok(Vec::new())
            }
        }
    }

    /// Write the full collection through a temp file + rename so a crash
    /// mid-write never corrupts the previous state.
    async fn persist(&self, units: &[ContentUnit]) -> PublishResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(units)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json.as_bytes()).await?;
        fs::rename(&tmp, &self.path).await.map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            PublishError::state_store(format!(
                "failed to replace {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }
}
