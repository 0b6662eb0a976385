#![doc = include_str!("../README.md")]
#![forbid(missing_docs, rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(forbidden_lint_groups)]

use bytes::Bytes;
use derive_more::From;
use futures_util::{Stream, StreamExt};
use std::{error::Error, future::Future};

pub mod fs;
pub mod memory;

/// Boxed error
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Result alias where the error defaults to [`BoxError`]
pub type Result<T, E = BoxError> = std::result::Result<T, E>;

/// Binary store for emoji assets, addressed by string keys
pub trait StorageBackend: Clone + Send + Sync {
    /// Remove the asset stored under the key
    fn delete(&self, key: &str) -> impl Future<Output = Result<()>> + Send;

    /// Stream the asset stored under the key
    ///
    /// Missing keys fail with an I/O error of kind [`std::io::ErrorKind::NotFound`]
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<impl Stream<Item = Result<Bytes>> + Send + 'static>> + Send;

    /// Store the stream under the key
    ///
    /// Resolves once the asset is completely written. A failing input stream fails the write
    fn put<T>(&self, key: &str, input_stream: T) -> impl Future<Output = Result<()>> + Send
    where
        T: Stream<Item = Result<Bytes>> + Send + 'static;
}

/// Every supported backend
#[derive(Clone, From)]
pub enum AnyStorageBackend {
    /// Files inside a directory
    Fs(fs::Storage),

    /// Process-local map
    Memory(memory::Storage),
}

impl StorageBackend for AnyStorageBackend {
    async fn delete(&self, key: &str) -> Result<()> {
        match self {
            Self::Fs(fs) => fs.delete(key).await,
            Self::Memory(memory) => memory.delete(key).await,
        }
    }

    async fn get(&self, key: &str) -> Result<impl Stream<Item = Result<Bytes>> + Send + 'static> {
        match self {
            Self::Fs(fs) => fs.get(key).await.map(StreamExt::left_stream),
            Self::Memory(memory) => memory.get(key).await.map(StreamExt::right_stream),
        }
    }

    async fn put<T>(&self, key: &str, input_stream: T) -> Result<()>
    where
        T: Stream<Item = Result<Bytes>> + Send + 'static,
    {
        match self {
            Self::Fs(fs) => fs.put(key, input_stream).await,
            Self::Memory(memory) => memory.put(key, input_stream).await,
        }
    }
}
