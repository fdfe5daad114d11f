//! Scoped writer for the output file.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::TEMP_SUFFIX;

/// Writer for one output file. Bytes go to a uniquely named temp file in the
/// destination's directory; `finalize` closes it and renames it over the
/// destination, so concurrent writers to the same output never share a temp
/// file and the last one to finalize wins.
///
/// When the output path is a symlink, the link is followed and its target is
/// replaced; the link itself stays. An existing destination keeps its
/// permissions; a new one gets the default mode (0666 minus umask on Unix).
///
/// Dropping a writer that was not finalized closes the handle and removes the
/// temp file, so an error anywhere between `create` and `finalize` leaves the
/// previous output (if any) untouched.
pub struct OutputWriter {
    file: NamedTempFile,
    final_path: PathBuf,
}

/// The file a write to `path` actually replaces: the symlink target when
/// `path` is a link to an existing file, `path` otherwise.
fn resolve_destination(path: &Path) -> PathBuf {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
        }
        _ => path.to_path_buf(),
    }
}

fn temp_dir_for(final_path: &Path) -> &Path {
    match final_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

impl OutputWriter {
    /// Create a fresh temp file next to `output_path`.
    /// The parent directory must already exist.
    pub fn create(output_path: &Path) -> Result<Self> {
        let final_path = resolve_destination(output_path);
        let dir = temp_dir_for(&final_path);
        let prefix = format!(
            ".{}.",
            final_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        );

        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix).suffix(TEMP_SUFFIX);
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(fs::Permissions::from_mode(0o666));
        }
        let file = builder.tempfile_in(dir).with_context(|| {
            format!("failed to create temp file in {}", dir.display())
        })?;

        if let Ok(meta) = fs::metadata(&final_path) {
            file.as_file()
                .set_permissions(meta.permissions())
                .with_context(|| format!("failed to copy permissions of {}", final_path.display()))?;
        }

        Ok(OutputWriter { file, final_path })
    }

    /// Write all of `data` at the current position.
    pub fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.file
            .write_all(data)
            .with_context(|| format!("write to {} failed", self.file.path().display()))?;
        Ok(())
    }

    /// Sync file data to disk. Call before `finalize` for durability.
    pub fn sync(&self) -> Result<()> {
        self.file.as_file().sync_all().context("output sync failed")?;
        Ok(())
    }

    /// Path to the temp file.
    pub fn temp_path(&self) -> &Path {
        self.file.path()
    }

    /// File that `finalize` replaces (symlinks already resolved).
    pub fn final_path(&self) -> &Path {
        &self.final_path
    }

    /// Close the handle and atomically rename the temp file onto the final path,
    /// replacing any previous file there.
    pub fn finalize(self) -> Result<()> {
        let OutputWriter { file, final_path } = self;
        let temp_path = file.path().to_path_buf();
        // On failure the returned temp file is dropped here, which deletes it.
        file.persist(&final_path).map_err(|e| e.error).with_context(|| {
            format!(
                "failed to rename {} to {}",
                temp_path.display(),
                final_path.display()
            )
        })?;
        Ok(())
    }
}
