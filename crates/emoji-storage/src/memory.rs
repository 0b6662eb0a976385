//! In-memory implementation of the [`StorageBackend`] trait

use crate::{Result, StorageBackend};
use bytes::{Bytes, BytesMut};
use futures_util::{pin_mut, stream, Stream, StreamExt};
use std::{
    collections::HashMap,
    io,
    sync::{Arc, Mutex},
};

/// In-memory storage
///
/// Clones share the same underlying map
#[derive(Clone, Default)]
pub struct Storage {
    inner: Arc<Mutex<HashMap<String, Bytes>>>,
}

impl Storage {
    /// Create a new, empty in-memory storage
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether something is stored under the key
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.inner.lock().unwrap().contains_key(key)
    }
}

impl StorageBackend for Storage {
    async fn delete(&self, key: &str) -> Result<()> {
        self.inner.lock().unwrap().remove(key);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<impl Stream<Item = Result<Bytes>> + Send + 'static> {
        let data = self
            .inner
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{key} not found")))?;

        Ok(stream::once(async move { Ok(data) }))
    }

    async fn put<T>(&self, key: &str, input_stream: T) -> Result<()>
    where
        T: Stream<Item = Result<Bytes>> + Send + 'static,
    {
        pin_mut!(input_stream);

        // Only publish the value once the stream is fully drained
        let mut buffer = BytesMut::new();
        while let Some(chunk) = input_stream.next().await.transpose()? {
            buffer.extend_from_slice(&chunk);
        }

        self.inner
            .lock()
            .unwrap()
            .insert(key.to_string(), buffer.freeze());

        Ok(())
    }
}
