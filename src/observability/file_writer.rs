//! Rotating log file with size-based rotation and backup retention.
//!
//! [`RotatingFileWriter`] implements [`MakeWriter`], so a `tracing-subscriber`
//! fmt layer can write straight into it. Each event arrives as one buffered
//! write, which keeps lines whole across rotations.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing_subscriber::fmt::MakeWriter;

/// Maximum file size before rotation (10 MB).
const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of backup files to retain after rotation.
const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe rotating file writer.
///
/// Before each write the current file size is checked. Past the limit, the
/// file is renamed to `<name>.<epoch_millis>`, a fresh file is started, and
/// backups beyond the retention count are removed, oldest first.
pub struct RotatingFileWriter {
    file_path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    /// Opened on first write.
    file: Mutex<Option<File>>,
}

impl RotatingFileWriter {
    /// Creates a writer for `file_path` with the default limits.
    ///
    /// The file is not opened until the first write.
    #[must_use]
    pub const fn new(file_path: PathBuf) -> Self {
        Self::with_limits(file_path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    /// Creates a writer rotating past `max_bytes` and keeping `max_backups`.
    #[must_use]
    pub const fn with_limits(file_path: PathBuf, max_bytes: u64, max_backups: usize) -> Self {
        Self {
            file_path,
            max_bytes,
            max_backups,
            file: Mutex::new(None),
        }
    }

    /// Path of the active log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn write_chunk(&self, buf: &[u8]) -> io::Result<()> {
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);

        self.check_and_rotate(&mut file)?;

        if file.is_none() {
            *file = Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.file_path)?,
            );
        }

        let handle = file
            .as_mut()
            .ok_or_else(|| io::Error::other("no log file available"))?;
        handle.write_all(buf)?;
        handle.flush()
    }

    fn check_and_rotate(&self, file: &mut Option<File>) -> io::Result<()> {
        if let Ok(metadata) = fs::metadata(&self.file_path) {
            if metadata.len() > self.max_bytes {
                *file = None;
                self.rotate_files()?;
            }
        }
        Ok(())
    }

    fn rotate_files(&self) -> io::Result<()> {
        let stamp = chrono::Utc::now().timestamp_millis();
        let file_name = self
            .file_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| io::Error::other("invalid log file name"))?;
        let backup_path = self.file_path.with_file_name(format!("{file_name}.{stamp}"));

        if self.file_path.exists() {
            fs::rename(&self.file_path, backup_path)?;
        }

        self.cleanup_old_backups(file_name)
    }

    /// Removes backups beyond the retention limit, newest kept.
    ///
    /// Individual deletion errors are ignored.
    fn cleanup_old_backups(&self, file_name: &str) -> io::Result<()> {
        let parent_dir = match self.file_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let prefix = format!("{file_name}.");

        let mut backups: Vec<(i64, PathBuf)> = fs::read_dir(parent_dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter_map(|path| {
                let stamp = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .and_then(|name| name.strip_prefix(&prefix))
                    .and_then(|suffix| suffix.parse::<i64>().ok())?;
                Some((stamp, path))
            })
            .collect();

        backups.sort_by(|a, b| b.0.cmp(&a.0));

        for (_, old_backup) in backups.iter().skip(self.max_backups) {
            let _ = fs::remove_file(old_backup);
        }

        Ok(())
    }
}

impl<'a> MakeWriter<'a> for RotatingFileWriter {
    type Writer = &'a Self;

    fn make_writer(&'a self) -> Self::Writer {
        self
    }
}

impl Write for &RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_chunk(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl std::fmt::Debug for RotatingFileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFileWriter")
            .field("file_path", &self.file_path)
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}
