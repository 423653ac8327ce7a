use std::{
    fmt, io,
    path::{Path, PathBuf},
};

use futures_util::StreamExt;
use reqwest::Client;
use tokio::{fs::File, io::AsyncWriteExt};

use crate::{info, utils};

pub const AUDIO_EXTENSION: &str = "mp3";

#[derive(Debug)]
pub enum PersistError {
    Http(reqwest::Error),
    Io(io::Error),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Http(e) => write!(f, "fetching audio failed: {}", e),
            PersistError::Io(e) => write!(f, "writing audio failed: {}", e),
        }
    }
}

impl std::error::Error for PersistError {}

impl From<reqwest::Error> for PersistError {
    fn from(err: reqwest::Error) -> Self {
        PersistError::Http(err)
    }
}

impl From<io::Error> for PersistError {
    fn from(err: io::Error) -> Self {
        PersistError::Io(err)
    }
}

/// Streams remote audio into `<downloads_dir>/<name>.mp3`.
#[derive(Clone)]
pub struct FilePersister {
    client: Client,
    downloads_dir: PathBuf,
}

impl FilePersister {
    pub fn new(client: Client, downloads_dir: PathBuf) -> Self {
        Self {
            client,
            downloads_dir,
        }
    }

    pub fn downloads_dir(&self) -> &Path {
        &self.downloads_dir
    }

    /// Where a track with this name ends up.
    pub fn destination(&self, track_name: &str) -> PathBuf {
        self.downloads_dir.join(format!(
            "{}.{}",
            utils::sanitize_filename(track_name),
            AUDIO_EXTENSION
        ))
    }

    /// Downloads `source_url` and stores it under the sanitized track name.
    ///
    /// Bytes are written to a temporary `.part` file next to the destination
    /// and renamed over it once the stream is complete, so a failed or
    /// abandoned download never leaves a truncated file behind and
    /// concurrent writers of the same name resolve to the last one finishing.
    pub async fn save(&self, source_url: &str, track_name: &str) -> Result<PathBuf, PersistError> {
        self.ensure_downloads_dir().await?;

        let destination = self.destination(track_name);
        let part = PartFile::new(&destination);

        let response = self
            .client
            .get(source_url)
            .send()
            .await?
            .error_for_status()?;

        let mut file = File::create(part.path()).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            file.write_all(&chunk?).await?;
        }
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        part.commit(&destination).await?;
        Ok(destination)
    }

    /// Creates the downloads directory unless it already exists.
    ///
    /// Losing a creation race against another process is fine; existing
    /// files in the directory are never touched.
    pub async fn ensure_downloads_dir(&self) -> io::Result<()> {
        if let Ok(meta) = tokio::fs::metadata(&self.downloads_dir).await {
            if meta.is_dir() {
                return Ok(());
            }
        }

        match tokio::fs::create_dir_all(&self.downloads_dir).await {
            Ok(()) => {
                info!("Created downloads directory {}", self.downloads_dir.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Temporary file that is removed on drop unless committed.
struct PartFile {
    path: PathBuf,
    committed: bool,
}

impl PartFile {
    fn new(destination: &Path) -> Self {
        let mut name = destination
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".{}.part", utils::random_token(8)));

        Self {
            path: destination.with_file_name(name),
            committed: false,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    async fn commit(mut self, destination: &Path) -> io::Result<()> {
        tokio::fs::rename(&self.path, destination).await?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for PartFile {
    fn drop(&mut self) {
        if !self.committed {
            // may run after a cancelled future, so this has to be synchronous
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
