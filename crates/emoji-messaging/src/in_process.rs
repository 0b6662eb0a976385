//! Backend over Tokio broadcast channels, one per topic

use crate::{MessagingBackend, Result};
use futures_util::{stream::BoxStream, StreamExt, TryStreamExt};
use std::{collections::HashMap, sync::Mutex};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

const DEFAULT_CAPACITY: usize = 50;

/// Delivers payloads to subscribers inside the same process
///
/// Subscribers lagging behind by more than the channel capacity see an error in place of the skipped payloads
pub struct InProcessBackend {
    capacity: usize,
    topics: Mutex<HashMap<String, broadcast::Sender<Vec<u8>>>>,
}

impl InProcessBackend {
    /// Backend buffering up to `capacity` payloads per topic
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            topics: Mutex::default(),
        }
    }
}

impl Default for InProcessBackend {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl MessagingBackend for InProcessBackend {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<()> {
        let sender = self.topics.lock().unwrap().get(topic).cloned();
        let Some(sender) = sender.filter(|sender| sender.receiver_count() > 0) else {
            debug!(%topic, "no subscribers, dropping event");
            return Ok(());
        };

        // Only fails if the last subscriber went away in the meantime
        if sender.send(payload).is_err() {
            debug!(%topic, "subscribers left, dropping event");
        }

        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> Result<BoxStream<'static, Result<Vec<u8>>>> {
        let receiver = self
            .topics
            .lock()
            .unwrap()
            .entry(topic.to_owned())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe();

        Ok(BroadcastStream::new(receiver).map_err(Into::into).boxed())
    }
}
