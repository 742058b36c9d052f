use anyhow::{Context, Result};
use std::{fs, path::Path};
use tracing::debug;

use crate::paths;

/// Removes the scratch download directory. Missing is fine.
pub fn clear(root: &Path) -> Result<()> {
    clear_dir(&paths::cache_dir(root))
}

pub fn clear_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).with_context(|| format!("remove {}", dir.display()))?;
        debug!(dir = %dir.display(), "removed setup cache");
    }
    Ok(())
}
