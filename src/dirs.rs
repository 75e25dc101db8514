use std::fs;
use std::path::Path;

use anyhow::Result;

/// Ensures that a directory exists at the specified path, creating it if necessary.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
