use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{CytowordError, Result};
use crate::extract::ListFormat;

pub const BACKUP_SUFFIX: &str = ".bak";

/// Reads a required input file; a missing file is a configuration error.
pub fn read_required(path: &Path, label: &str) -> Result<String> {
    if !path.is_file() {
        return Err(CytowordError::Config(format!(
            "{label} not found: {}",
            path.display()
        )));
    }
    Ok(fs::read_to_string(path)?)
}

/// Raw entries of a list file, format chosen from its extension.
pub fn read_symbols(path: &Path, label: &str) -> Result<Vec<String>> {
    let text = read_required(path, label)?;
    Ok(ListFormat::from_path(path).extract(&text))
}

#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Copies the current content verbatim to `<path>.bak`.
pub fn write_backup(path: &Path) -> Result<PathBuf> {
    let bak = backup_path(path);
    let content = fs::read(path)?;
    write_atomic(&bak, &content)?;
    Ok(bak)
}

/// A fully written temp file waiting to replace its target. Dropping it
/// without [`StagedWrite::commit`] removes the temp file and leaves the
/// target untouched.
#[derive(Debug)]
pub struct StagedWrite {
    tmp_path: PathBuf,
    target: PathBuf,
    parent: PathBuf,
    committed: bool,
}

impl StagedWrite {
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Renames the staged file over its target.
    pub fn commit(mut self) -> Result<()> {
        fs::rename(&self.tmp_path, &self.target)?;
        self.committed = true;
        if let Ok(dir) = fs::File::open(&self.parent) {
            let _ = dir.sync_all();
        }
        Ok(())
    }
}

impl Drop for StagedWrite {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.tmp_path);
        }
    }
}

/// Writes `content` next to `path` without touching `path` itself.
pub fn stage_atomic(path: &Path, content: &[u8]) -> Result<StagedWrite> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let file_name = path
        .file_name()
        .and_then(|x| x.to_str())
        .ok_or_else(|| {
            CytowordError::Config(format!("invalid target filename: {}", path.display()))
        })?;
    let tmp_name = format!(".{file_name}.cytoword.tmp.{}", uuid::Uuid::new_v4().simple());
    let staged = StagedWrite {
        tmp_path: parent.join(tmp_name),
        target: path.to_path_buf(),
        parent: parent.to_path_buf(),
        committed: false,
    };

    let mut tmp = fs::OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(&staged.tmp_path)?;
    tmp.write_all(content)?;
    tmp.sync_all()?;
    Ok(staged)
}

/// Write-to-temp then rename, so readers never observe a partial file.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    stage_atomic(path, content)?.commit()
}
