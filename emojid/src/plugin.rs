use crate::{
    emoji_set::EmojiSetProvider,
    http::{chain::DispatchChain, custom_emoji},
};
use emoji_error::{bail, ErrorType, Result};
use emoji_service::EmojiManager;

/// Emoji manager together with the handlers serving its images
pub struct EmojiPlugin {
    chain: DispatchChain,
    manager: EmojiManager,
}

impl EmojiPlugin {
    /// Custom emoji are served first, if the manager has a storage
    #[must_use]
    pub fn new(manager: EmojiManager) -> Self {
        let mut chain = DispatchChain::default();
        if let Some(storage) = manager.storage() {
            chain.push(custom_emoji::routes(storage.clone()));
        }

        Self { chain, manager }
    }

    #[must_use]
    pub fn manager(&self) -> &EmojiManager {
        &self.manager
    }

    /// Register an emoji set
    ///
    /// Its images are served after everything registered before it.
    /// Its emoji lose against custom emoji and earlier sets when resolving a single shortcode.
    pub fn use_emoji_set<P>(&mut self, provider: &P) -> Result<&mut Self>
    where
        P: EmojiSetProvider + ?Sized,
    {
        let Some(middleware) = provider.middleware() else {
            bail!(
                type = ErrorType::InvalidArgument(Some(
                    "emoji set doesn't provide a middleware".into()
                )),
                format!("emoji set {:?} can't serve its images", provider.name())
            );
        };

        self.chain.push(middleware);
        self.manager.use_emoji_set(provider.to_emoji_set());

        info!(name = ?provider.name(), "registered emoji set");

        Ok(self)
    }

    /// Handler for everything below the mount path
    #[must_use]
    pub fn handler(&self) -> DispatchChain {
        self.chain.clone()
    }
}
