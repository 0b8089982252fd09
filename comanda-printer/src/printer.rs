//! Printer adapters for finished ticket documents
//!
//! Supports:
//! - File printers (one document per job in an output directory)

use crate::error::{PrintError, PrintResult};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument, warn};

/// Suffixes tried before giving up on a taken file name
const MAX_NAME_ATTEMPTS: u32 = 100;

/// A rendered document waiting to be printed
#[derive(Debug, Clone)]
pub struct PrintJob {
    /// File name (no directory components)
    pub name: String,
    pub content: Vec<u8>,
}

impl PrintJob {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Trait for printer adapters
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Output a document, returning where it ended up
    async fn print(&self, job: &PrintJob) -> PrintResult<PathBuf>;

    /// Check if the printer is ready to accept jobs
    async fn is_online(&self) -> bool;
}

/// File printer
///
/// Writes each job as its own file inside `dir`, creating the directory on
/// first use. Existing files are never overwritten: a name already taken
/// gets a `_2`, `_3`, ... suffix before its extension.
#[derive(Debug, Clone)]
pub struct FilePrinter {
    dir: PathBuf,
}

impl FilePrinter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Get the output directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn target_path(&self, name: &str) -> PrintResult<PathBuf> {
        let file_name = Path::new(name)
            .file_name()
            .filter(|f| f.len() == name.len())
            .ok_or_else(|| PrintError::InvalidConfig(format!("Invalid file name: {}", name)))?;
        Ok(self.dir.join(file_name))
    }
}

impl Printer for FilePrinter {
    #[instrument(skip(self, job), fields(dir = %self.dir.display(), name = %job.name, data_len = job.content.len()))]
    async fn print(&self, job: &PrintJob) -> PrintResult<PathBuf> {
        let path = self.target_path(&job.name)?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| PrintError::Offline(format!("{}: {}", self.dir.display(), e)))?;

        for attempt in 1..=MAX_NAME_ATTEMPTS {
            let candidate = if attempt == 1 {
                path.clone()
            } else {
                with_suffix(&path, attempt)
            };
            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&candidate)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };
            file.write_all(&job.content).await?;
            file.flush().await?;

            info!(path = %candidate.display(), "Ticket written");
            return Ok(candidate);
        }

        Err(PrintError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("{} and its numbered variants are taken", path.display()),
        )))
    }

    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    async fn is_online(&self) -> bool {
        match tokio::fs::create_dir_all(&self.dir).await {
            Ok(()) => match tokio::fs::metadata(&self.dir).await {
                Ok(meta) => !meta.permissions().readonly(),
                Err(e) => {
                    warn!(error = %e, "Ticket directory unreadable");
                    false
                }
            },
            Err(e) => {
                warn!(error = %e, "Ticket directory unavailable");
                false
            }
        }
    }
}

/// `ticket.txt` -> `ticket_2.txt`
fn with_suffix(path: &Path, n: u32) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}_{n}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{n}"),
    };
    path.with_file_name(name)
}
