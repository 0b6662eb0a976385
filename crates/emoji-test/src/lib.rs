use emoji_messaging::{in_process::InProcessBackend, MessagingHub, Subscription};
use emoji_registry::InMemoryRegistry;
use emoji_service::{
    event::{EmojiAdded, EmojiRemoved, EMOJI_ADD_TOPIC, EMOJI_REMOVE_TOPIC},
    EmojiManager,
};
use emoji_storage::{memory, AnyStorageBackend};
use futures_util::{Stream, StreamExt};
use std::time::Duration;

pub use self::actor::TestActor;

mod actor;
pub mod fixture;

const NO_MESSAGE_GRACE_PERIOD: Duration = Duration::from_millis(50);

/// Manager wired up with in-process backends, plus handles to inspect them
pub struct TestContext {
    pub manager: EmojiManager,
    pub messaging_hub: MessagingHub,
    pub registry: InMemoryRegistry,
    pub storage: memory::Storage,
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        Self::build(true)
    }

    /// Context whose manager has custom emoji disabled
    #[must_use]
    pub fn without_storage() -> Self {
        Self::build(false)
    }

    fn build(with_storage: bool) -> Self {
        let messaging_hub = MessagingHub::new(InProcessBackend::default());
        let registry = InMemoryRegistry::new();
        let storage = memory::Storage::new();

        let manager = EmojiManager::builder()
            .messaging_hub(messaging_hub.clone())
            .registry(registry.clone())
            .storage(with_storage.then(|| AnyStorageBackend::from(storage.clone())))
            .build();

        Self {
            manager,
            messaging_hub,
            registry,
            storage,
        }
    }

    pub async fn subscribe_added(&self) -> Subscription<EmojiAdded> {
        self.messaging_hub
            .subscribe(EMOJI_ADD_TOPIC)
            .await
            .expect("Failed to subscribe to emoji:add")
    }

    pub async fn subscribe_removed(&self) -> Subscription<EmojiRemoved> {
        self.messaging_hub
            .subscribe(EMOJI_REMOVE_TOPIC)
            .await
            .expect("Failed to subscribe to emoji:remove")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Assert that the stream doesn't yield anything within a short grace period
///
/// # Panics
///
/// Panics if the stream yields an item
pub async fn assert_silent<S>(stream: &mut S)
where
    S: Stream + Unpin,
{
    let next = tokio::time::timeout(NO_MESSAGE_GRACE_PERIOD, stream.next()).await;
    assert!(next.is_err(), "stream unexpectedly yielded an item");
}
