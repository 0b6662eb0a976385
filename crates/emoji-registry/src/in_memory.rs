use crate::{CustomEmoji, EmojiRegistry};
use emoji_error::{bail, ErrorType, Result};
use std::{
    collections::{hash_map::Entry, HashMap},
    sync::{Arc, Mutex},
};

/// Process-local registry
///
/// The map is keyed by shortcode which doubles as the unique index
#[derive(Clone, Default)]
pub struct InMemory {
    inner: Arc<Mutex<HashMap<String, CustomEmoji>>>,
}

impl InMemory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl EmojiRegistry for InMemory {
    async fn create(&self, emoji: CustomEmoji) -> Result<CustomEmoji> {
        let mut guard = self.inner.lock().unwrap();
        match guard.entry(emoji.shortcode.clone()) {
            Entry::Occupied(..) => {
                bail!(
                    type = ErrorType::Conflict,
                    format!("duplicate shortcode: {}", emoji.shortcode)
                );
            }
            Entry::Vacant(entry) => {
                debug!(shortcode = %emoji.shortcode, "inserting custom emoji record");
                entry.insert(emoji.clone());
            }
        }

        Ok(emoji)
    }

    async fn find_by_shortcode(&self, shortcode: &str) -> Result<Option<CustomEmoji>> {
        Ok(self.inner.lock().unwrap().get(shortcode).cloned())
    }

    async fn list(&self) -> Result<Vec<CustomEmoji>> {
        Ok(self.inner.lock().unwrap().values().cloned().collect())
    }

    async fn remove(&self, shortcode: &str) -> Result<bool> {
        Ok(self.inner.lock().unwrap().remove(shortcode).is_some())
    }
}
