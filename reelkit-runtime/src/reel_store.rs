use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use reelkit_core::types::Reel;
use reelkit_engine::traits::ReelStore;

/// Newest-first JSON file of committed reels.
#[derive(Debug, Clone)]
pub struct JsonReelStore {
    path: PathBuf,
    max_entries: usize,
}

impl JsonReelStore {
    pub fn at_path(path: PathBuf) -> Self {
        Self { path, max_entries: 200 }
    }

    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max.max(1);
        self
    }

    pub fn load(&self) -> anyhow::Result<Vec<Reel>> {
        if !self.path.exists() {
            return Ok(vec![]);
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read reels: {}", self.path.display()))?;
        let reels: Vec<Reel> = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse reels: {}", self.path.display()))?;
        Ok(reels)
    }

    /// Prepends a record; the collection stays ordered newest first and is
    /// capped at `max_entries` (oldest dropped).
    pub fn append(&self, reel: &Reel) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create dir: {}", parent.display()))?;
        }

        let mut reels = self.load()?;
        reels.insert(0, reel.clone());
        reels.truncate(self.max_entries);

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&reels)?)
            .with_context(|| format!("failed to write reels temp: {}", tmp.display()))?;
        replace_file(&tmp, &self.path)
            .with_context(|| format!("failed to replace reels: {}", self.path.display()))?;
        Ok(())
    }

    pub fn clear(&self) -> anyhow::Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("failed to remove reels: {}", self.path.display()))?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReelStore for JsonReelStore {
    fn append_record(&self, reel: &Reel) -> anyhow::Result<()> {
        self.append(reel)
    }
}

// Write temp, then swap it in; keep a backup so a failed swap can restore
// the previous file.
fn replace_file(tmp: &Path, dst: &Path) -> anyhow::Result<()> {
    let backup = dst.with_extension("bak");

    if dst.exists() {
        let _ = fs::remove_file(&backup);
        fs::rename(dst, &backup)
            .with_context(|| format!("failed rename {} -> {}", dst.display(), backup.display()))?;
    }

    if let Err(e) = fs::rename(tmp, dst) {
        if backup.exists() {
            let _ = fs::rename(&backup, dst);
        }
        let _ = fs::remove_file(tmp);
        return Err(anyhow::Error::new(e).context(format!(
            "failed rename {} -> {}",
            tmp.display(),
            dst.display()
        )));
    }

    let _ = fs::remove_file(&backup);
    Ok(())
}
