use axum::Router;
use emoji_service::EmojiSet;
use smol_str::SmolStr;
use std::{collections::HashMap, path::PathBuf};
use tokio::fs;
use tower_http::services::ServeDir;

/// Source of a named group of built-in emoji
pub trait EmojiSetProvider {
    /// Name the set is reported under. Unnamed sets are reported as `unknown`
    fn name(&self) -> Option<&str> {
        None
    }

    /// Shortcode to image file name mapping
    fn emoji(&self) -> &HashMap<String, String>;

    /// Handler serving the images of the set
    ///
    /// Sets without one can't be registered.
    fn middleware(&self) -> Option<Router>;

    /// Value view of the set, as used by the resolver
    fn to_emoji_set(&self) -> EmojiSet {
        let emoji = self.emoji().clone();

        match self.name() {
            Some(name) => EmojiSet::builder().name(name).emoji(emoji).build(),
            None => EmojiSet::builder().emoji(emoji).build(),
        }
    }
}

/// Emoji set backed by a directory of image files
#[derive(Clone, Debug)]
pub struct DirectoryEmojiSet {
    name: Option<SmolStr>,
    emoji: HashMap<String, String>,
    asset_dir: PathBuf,
}

impl DirectoryEmojiSet {
    #[must_use]
    pub fn new(
        name: Option<SmolStr>,
        emoji: HashMap<String, String>,
        asset_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name,
            emoji,
            asset_dir: asset_dir.into(),
        }
    }

    /// Read the mapping file referenced by the configuration
    pub async fn load(config: &emoji_config::emoji_set::Configuration) -> eyre::Result<Self> {
        let content = fs::read_to_string(config.mapping.as_str()).await?;
        let emoji: HashMap<String, String> = toml::from_str(&content)?;

        debug!(
            name = ?config.name,
            count = emoji.len(),
            "loaded emoji set mapping"
        );

        Ok(Self::new(
            config.name.clone(),
            emoji,
            config.asset_dir.as_str(),
        ))
    }
}

impl EmojiSetProvider for DirectoryEmojiSet {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn emoji(&self) -> &HashMap<String, String> {
        &self.emoji
    }

    fn middleware(&self) -> Option<Router> {
        Some(Router::new().fallback_service(ServeDir::new(&self.asset_dir)))
    }
}
