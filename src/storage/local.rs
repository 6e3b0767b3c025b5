//! Local filesystem store
//!
//! Every upload lands in a single flat directory under its generated name.

use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};

use axum::body::Bytes;
use futures::{Stream, TryStreamExt};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

use super::naming::generate_stored_name;
use super::types::StoredFile;
use crate::error::{AppError, Result};

/// Prefix of in-flight uploads inside the storage root
const TEMP_PREFIX: &str = ".upload-";

// ============================================================================
// File Store
// ============================================================================

/// Handle to the storage root
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the storage root if it does not exist yet
    pub async fn ensure_root(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Map a single request path segment to a path inside the storage root.
    ///
    /// Returns `None` for anything that is not a plain file name. Names with a
    /// leading dot never belong to a stored upload.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        let plain = !name.is_empty()
            && !name.starts_with('.')
            && !name.contains(['/', '\\', '\0']);

        plain.then(|| self.root.join(name))
    }

    /// Look up a stored regular file by name.
    ///
    /// Any lookup failure counts as a miss.
    pub async fn metadata(&self, name: &str) -> Option<(PathBuf, Metadata)> {
        let path = self.resolve(name)?;

        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Some((path, metadata)),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Stored file lookup failed");
                None
            }
        }
    }

    /// Stream an upload into the storage root under a freshly generated name.
    ///
    /// Bytes go to a hidden temporary file that only takes the final name once
    /// fully written. An error, or dropping the future midway, leaves nothing
    /// behind.
    pub async fn save<S, E>(&self, original_name: &str, stream: S) -> Result<StoredFile>
    where
        S: Stream<Item = std::result::Result<Bytes, E>>,
        AppError: From<E>,
    {
        let stored_name = generate_stored_name(original_name);
        let path = self.root.join(&stored_name);

        tracing::debug!(destination = %self.root.display(), "Writing upload");

        let (file, temp_path) = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempfile_in(&self.root)?
            .into_parts();

        let size = write_stream(File::from_std(file), stream).await?;

        // noclobber: a colliding name fails instead of replacing another upload
        temp_path
            .persist_noclobber(&path)
            .map_err(|e| AppError::Io(e.error))?;

        tracing::info!(
            destination = %self.root.display(),
            stored_name = %stored_name,
            size = size,
            "File stored"
        );

        Ok(StoredFile {
            stored_name,
            original_name: original_name.to_string(),
            path,
            size,
        })
    }
}

// ============================================================================
// Helpers
// ============================================================================

async fn write_stream<S, E>(file: File, stream: S) -> Result<u64>
where
    S: Stream<Item = std::result::Result<Bytes, E>>,
    AppError: From<E>,
{
    futures::pin_mut!(stream);

    let mut writer = BufWriter::new(file);
    let mut size = 0u64;

    while let Some(chunk) = stream.try_next().await? {
        writer.write_all(&chunk).await?;
        size += chunk.len() as u64;
    }

    writer.flush().await?;
    writer.into_inner().sync_all().await?;

    Ok(size)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{stream, StreamExt};
    use tempfile::TempDir;

    fn chunks(parts: &[&'static str]) -> impl Stream<Item = std::result::Result<Bytes, io::Error>> {
        stream::iter(
            parts
                .iter()
                .map(|p| Ok(Bytes::from_static(p.as_bytes())))
                .collect::<Vec<_>>(),
        )
    }

    #[tokio::test]
    async fn test_save_and_lookup() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        let stored = store.save("a.txt", chunks(&["hel", "lo"])).await.unwrap();

        assert!(stored.stored_name.ends_with("-a.txt"));
        assert_eq!(stored.original_name, "a.txt");
        assert_eq!(stored.size, 5);
        assert_eq!(tokio::fs::read(&stored.path).await.unwrap(), b"hello");

        let (path, metadata) = store.metadata(&stored.stored_name).await.unwrap();
        assert_eq!(path, stored.path);
        assert_eq!(metadata.len(), 5);
    }

    #[tokio::test]
    async fn test_save_empty_stream() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        let stored = store.save("empty.bin", chunks(&[])).await.unwrap();

        assert_eq!(stored.size, 0);
        assert!(store.metadata(&stored.stored_name).await.is_some());
    }

    #[tokio::test]
    async fn test_failed_stream_leaves_no_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        let failing = stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "client went away")),
        ]);

        let result = store.save("broken.txt", failing).await;
        assert!(matches!(result, Err(AppError::Io(_))));

        let mut entries = tokio::fs::read_dir(temp_dir.path()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_root_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("missing"));

        assert!(store.save("a.txt", chunks(&["x"])).await.is_err());

        store.ensure_root().await.unwrap();
        assert!(store.save("a.txt", chunks(&["x"])).await.is_ok());
    }

    #[tokio::test]
    async fn test_metadata_ignores_directories_and_missing() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        tokio::fs::create_dir(temp_dir.path().join("nested")).await.unwrap();

        assert!(store.metadata("nested").await.is_none());
        assert!(store.metadata("does-not-exist.txt").await.is_none());
    }

    #[tokio::test]
    async fn test_metadata_treats_lookup_errors_as_missing() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        // ENAMETOOLONG
        assert!(store.metadata(&"a".repeat(300)).await.is_none());

        // ENOTDIR: the storage root itself is a regular file
        let file_root = temp_dir.path().join("not-a-dir");
        tokio::fs::write(&file_root, b"x").await.unwrap();
        assert!(FileStore::new(&file_root).metadata("a.txt").await.is_none());
    }

    #[tokio::test]
    async fn test_dropped_save_leaves_no_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        let stalled = stream::once(async { Ok::<_, io::Error>(Bytes::from_static(b"partial")) })
            .chain(stream::pending());

        let result = tokio::time::timeout(
            std::time::Duration::from_millis(200),
            store.save("a.txt", stalled),
        )
        .await;
        assert!(result.is_err());

        let mut entries = tokio::fs::read_dir(temp_dir.path()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_in_flight_upload_is_not_visible() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        let (tx, rx) = futures::channel::mpsc::unbounded::<std::result::Result<Bytes, io::Error>>();
        tx.unbounded_send(Ok(Bytes::from_static(b"first half"))).unwrap();

        let upload = tokio::spawn({
            let store = store.clone();
            async move { store.save("a.txt", rx).await }
        });

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(temp_dir.path()).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with(TEMP_PREFIX));
        assert!(store.metadata(&names[0]).await.is_none());

        tx.unbounded_send(Ok(Bytes::from_static(b", second half"))).unwrap();
        drop(tx);

        let stored = upload.await.unwrap().unwrap();
        assert_eq!(
            tokio::fs::read(&stored.path).await.unwrap(),
            b"first half, second half"
        );
        assert!(store.metadata(&stored.stored_name).await.is_some());
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let store = FileStore::new("/srv/uploads");

        assert_eq!(
            store.resolve("1-2-a.txt"),
            Some(PathBuf::from("/srv/uploads/1-2-a.txt"))
        );
        assert_eq!(store.resolve(""), None);
        assert_eq!(store.resolve("."), None);
        assert_eq!(store.resolve(".upload-abc123"), None);
        assert_eq!(store.resolve(".."), None);
        assert_eq!(store.resolve("../secret"), None);
        assert_eq!(store.resolve("..\\secret"), None);
        assert_eq!(store.resolve("/etc/passwd"), None);
        assert_eq!(store.resolve("a\0b"), None);
    }
}
