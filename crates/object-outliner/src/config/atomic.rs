//! Atomic file replacement for settings files.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::error::{ConfigError, ConfigResult};

/// Writes a file by way of a temporary sibling and a rename.
///
/// The write either succeeds completely or leaves the original file untouched.
///
/// 1. Creates a temporary file in the same directory as the target
/// 2. Writes data to the temporary file
/// 3. Syncs the temporary file to disk
/// 4. Renames the temporary file to the target path
pub struct AtomicWriter {
    target_path: PathBuf,
    temp_path: PathBuf,
    writer: BufWriter<fs::File>,
}

impl AtomicWriter {
    /// Creates a new atomic writer for the given target path.
    ///
    /// Missing parent directories are created.
    pub fn new(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let target_path = path.as_ref().to_path_buf();

        let parent = match target_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|e| ConfigError::io(&parent, e))?;

        let file_name = target_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "settings".to_string());
        let temp_path = parent.join(format!(".{}.tmp.{}", file_name, std::process::id()));

        let file = fs::File::create(&temp_path).map_err(|e| ConfigError::io(&target_path, e))?;

        Ok(Self {
            target_path,
            temp_path,
            writer: BufWriter::new(file),
        })
    }

    /// Writes all bytes to the temporary file.
    pub fn write_all(&mut self, buf: &[u8]) -> ConfigResult<()> {
        self.writer
            .write_all(buf)
            .map_err(|e| ConfigError::io(&self.target_path, e))
    }

    /// Flushes, syncs and renames the temporary file over the target.
    ///
    /// On failure the temporary file is removed.
    pub fn commit(self) -> ConfigResult<()> {
        let Self {
            target_path,
            temp_path,
            writer,
        } = self;

        let result = writer
            .into_inner()
            .map_err(|e| e.into_error())
            .and_then(|file| file.sync_all())
            .and_then(|()| fs::rename(&temp_path, &target_path));

        if let Err(e) = result {
            let _ = fs::remove_file(&temp_path);
            return Err(ConfigError::io(target_path, e));
        }
        Ok(())
    }
}

/// Atomically replaces `path` with `contents`.
pub fn atomic_write(path: impl AsRef<Path>, contents: &[u8]) -> ConfigResult<()> {
    let mut writer = AtomicWriter::new(path)?;
    if let Err(e) = writer.write_all(contents) {
        let _ = fs::remove_file(&writer.temp_path);
        return Err(e);
    }
    writer.commit()
}
