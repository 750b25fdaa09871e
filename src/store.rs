use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub fn write_note(directory: &Path, file_name: &str, content: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(directory)
        .with_context(|| format!("failed to create note directory {}", directory.display()))?;

    let path = directory.join(file_name);
    std::fs::write(&path, content)
        .with_context(|| format!("failed to write note {}", path.display()))?;

    Ok(path)
}
