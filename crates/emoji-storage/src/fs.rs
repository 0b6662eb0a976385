//! Directory-backed store. Every key maps to a file directly inside the root directory

use crate::{Result, StorageBackend};
use bytes::Bytes;
use futures_util::{pin_mut, Stream, TryStreamExt};
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::{
    fs::{self, File},
    io::AsyncWriteExt,
};
use tokio_util::io::ReaderStream;
use uuid::Uuid;

async fn write_all<T>(file: &mut File, input_stream: T) -> Result<()>
where
    T: Stream<Item = Result<Bytes>>,
{
    pin_mut!(input_stream);
    while let Some(chunk) = input_stream.try_next().await? {
        file.write_all(&chunk).await?;
    }
    file.sync_all().await?;

    Ok(())
}

/// File system storage
///
/// Writes go to a hidden partial file unique to the write and are renamed into place once the input stream is exhausted,
/// so a key either holds one complete asset or nothing at all. Concurrent writes to the same key resolve to the last rename
#[derive(Clone, Debug)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Create a storage inside an existing directory
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Directory all keys are resolved against
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, key: &str) -> io::Result<PathBuf> {
        let is_file_name =
            !key.is_empty() && key != "." && key != ".." && !key.contains(['/', '\\']);

        if is_file_name {
            Ok(self.root.join(key))
        } else {
            Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("storage key {key:?} is not a plain file name"),
            ))
        }
    }
}

impl StorageBackend for Storage {
    async fn delete(&self, key: &str) -> Result<()> {
        fs::remove_file(self.path_of(key)?).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<impl Stream<Item = Result<Bytes>> + Send + 'static> {
        let file = File::open(self.path_of(key)?).await?;
        Ok(ReaderStream::new(file).map_err(Into::into))
    }

    async fn put<T>(&self, key: &str, input_stream: T) -> Result<()>
    where
        T: Stream<Item = Result<Bytes>> + Send + 'static,
    {
        let target = self.path_of(key)?;
        let partial = self.root.join(format!(".{key}.{}.partial", Uuid::now_v7()));

        let mut file = File::create(&partial).await?;
        if let Err(error) = write_all(&mut file, input_stream).await {
            drop(file);
            fs::remove_file(&partial).await.ok();
            return Err(error);
        }

        if let Err(error) = fs::rename(&partial, &target).await {
            fs::remove_file(&partial).await.ok();
            return Err(error.into());
        }

        Ok(())
    }
}
