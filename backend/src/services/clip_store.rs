use crate::models::Clip;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;
use tokio::sync::Mutex;
use tokio::task;

#[async_trait]
pub trait ClipStore: Send + Sync {
    async fn list_clips(&self) -> Result<Vec<Clip>>;

    async fn append_clip(&self, clip: Clip) -> Result<()>;

    /// Returns whether any clip was removed.
    async fn remove_clip(&self, id: &str) -> Result<bool>;
}

#[derive(Default, Serialize, Deserialize)]
struct ClipsFile {
    #[serde(default)]
    clips: Vec<Clip>,
}

/// Clip list kept in a single pretty-printed JSON document.
///
/// Writes go to a sibling temp file that is renamed over the document, so
/// readers never see a partial file and need no lock.
pub struct JsonClipStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonClipStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonClipStore {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<ClipsFile> {
        let data = match fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(ClipsFile::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };

        serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }

    async fn write(&self, file: &ClipsFile) -> Result<()> {
        let data = serde_json::to_vec_pretty(file)?;
        let path = self.path.clone();
        task::spawn_blocking(move || replace_file(&path, &data)).await?
    }
}

fn replace_file(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[async_trait]
impl ClipStore for JsonClipStore {
    async fn list_clips(&self) -> Result<Vec<Clip>> {
        Ok(self.read().await?.clips)
    }

    async fn append_clip(&self, clip: Clip) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut file = self.read().await?;
        file.clips.push(clip);
        self.write(&file).await
    }

    async fn remove_clip(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut file = self.read().await?;
        let before = file.clips.len();
        file.clips.retain(|clip| clip.id != id);

        let removed = file.clips.len() != before;
        if removed {
            self.write(&file).await?;
        }
        Ok(removed)
    }
}
