#[macro_use]
extern crate tracing;

use emoji_error::Result;
use enum_dispatch::enum_dispatch;

pub use self::in_memory::InMemory as InMemoryRegistry;
pub use self::model::CustomEmoji;

mod in_memory;
mod model;

#[enum_dispatch(EmojiRegistry)]
#[derive(Clone)]
pub enum AnyEmojiRegistry {
    InMemory(InMemoryRegistry),
}

/// Persistent store of custom emoji records
///
/// Implementations have to enforce uniqueness of the shortcode.
/// That constraint is the only thing guarding against two concurrent uploads of the same shortcode.
#[enum_dispatch]
#[allow(async_fn_in_trait)] // Because of `enum_dispatch`
pub trait EmojiRegistry: Send + Sync {
    /// Insert a new record
    ///
    /// Fails with [`emoji_error::ErrorType::Conflict`] if the shortcode is already taken
    async fn create(&self, emoji: CustomEmoji) -> Result<CustomEmoji>;

    async fn find_by_shortcode(&self, shortcode: &str) -> Result<Option<CustomEmoji>>;

    async fn list(&self) -> Result<Vec<CustomEmoji>>;

    /// Remove the record, returning whether anything was removed
    async fn remove(&self, shortcode: &str) -> Result<bool>;
}
