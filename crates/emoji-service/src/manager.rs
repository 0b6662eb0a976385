use crate::{
    consts::MAX_SHORTCODE_LENGTH,
    event::{EmojiAdded, EmojiRemoved, EMOJI_ADD_TOPIC, EMOJI_REMOVE_TOPIC},
    permission::{assert_permission, Actor, Permission},
    resolver::{self, ResolvedEmoji},
    set::EmojiSet,
    sniff::{self, ImageInput},
};
use emoji_error::{bail, emoji_error, Error, ErrorType, Result};
use emoji_messaging::MessagingHub;
use emoji_registry::{AnyEmojiRegistry, CustomEmoji, EmojiRegistry};
use emoji_storage::{AnyStorageBackend, StorageBackend};
use garde::Validate;
use std::{collections::HashMap, sync::Arc};
use typed_builder::TypedBuilder;

#[derive(Validate)]
struct NewShortcode {
    #[garde(
        length(chars, min = 1, max = MAX_SHORTCODE_LENGTH),
        pattern(r"^[a-zA-Z0-9_+\-]+$")
    )]
    shortcode: String,
}

/// Custom emoji lifecycle and emoji resolution
///
/// Cheap to clone. Registered emoji sets are shared between clones until one of them registers another set.
#[derive(Clone, TypedBuilder)]
pub struct EmojiManager {
    #[builder(default, setter(into))]
    emoji_sets: Arc<Vec<EmojiSet>>,
    messaging_hub: MessagingHub,
    #[builder(setter(into))]
    registry: AnyEmojiRegistry,
    /// Custom emoji are disabled without a storage
    #[builder(default, setter(into))]
    storage: Option<AnyStorageBackend>,
}

impl EmojiManager {
    /// Register an emoji set
    ///
    /// Sets registered earlier take precedence over sets registered later when resolving a single shortcode
    pub fn use_emoji_set(&mut self, set: EmojiSet) -> &mut Self {
        debug!(name = ?set.name(), emoji = set.emoji().len(), "registering emoji set");
        Arc::make_mut(&mut self.emoji_sets).push(set);
        self
    }

    #[must_use]
    pub fn emoji_sets(&self) -> &[EmojiSet] {
        &self.emoji_sets
    }

    #[must_use]
    pub fn storage(&self) -> Option<&AnyStorageBackend> {
        self.storage.as_ref()
    }

    pub async fn get_emoji(&self, shortcode: &str) -> Result<Option<ResolvedEmoji>> {
        resolver::resolve_one(&self.emoji_sets, &self.registry, shortcode).await
    }

    /// Map of every known shortcode to its name
    pub async fn list(&self) -> Result<HashMap<String, String>> {
        resolver::resolve_all(&self.emoji_sets, &self.registry).await
    }

    /// Upload a new custom emoji
    ///
    /// Without an actor the upload counts as system-initiated and skips the permission check.
    ///
    /// The image is written to the storage before the record is created.
    /// If creating the record fails (two concurrent uploads of the same shortcode),
    /// the image of the losing upload is left behind in the storage.
    #[instrument(skip_all, fields(%shortcode))]
    pub async fn add_custom_emoji<A>(
        &self,
        actor: Option<&A>,
        shortcode: &str,
        image: ImageInput,
    ) -> Result<ResolvedEmoji<A>>
    where
        A: Actor + Clone,
    {
        let Some(ref storage) = self.storage else {
            bail!(
                type = ErrorType::FeatureDisabled,
                "custom emoji are not enabled"
            );
        };

        if let Some(actor) = actor {
            assert_permission(actor, Permission::AddEmoji).await?;
        }

        NewShortcode {
            shortcode: shortcode.to_string(),
        }
        .validate()
        .map_err(|report| {
            let message = report.to_string();
            let ty = ErrorType::InvalidArgument(Some(message.clone()));
            emoji_error!(type = ty, message)
        })?;

        // Checked before the write so a rejected upload can't replace the image of the existing record
        if self.registry.find_by_shortcode(shortcode).await?.is_some() {
            bail!(
                type = ErrorType::Conflict,
                format!("custom emoji {shortcode:?} already exists")
            );
        }

        let image = sniff::sniff(image).await?;
        let name = format!("{shortcode}.{}", image.extension());

        storage
            .put(&name, image.into_stream())
            .await
            .map_err(Error::from_boxed)?;
        debug!(%name, "stored custom emoji image");

        let added_by = actor.map(Actor::id);
        let record = CustomEmoji {
            shortcode: shortcode.to_string(),
            name: name.clone(),
            added_by,
        };
        if let Err(error) = self.registry.create(record).await {
            warn!(%name, error = %error, "failed to create custom emoji record after storing its image");
            return Err(error);
        }

        self.messaging_hub
            .emitter(EMOJI_ADD_TOPIC)
            .emit(&EmojiAdded {
                shortcode: shortcode.to_string(),
                name: name.clone(),
                added_by,
            })
            .await
            .map_err(Error::from_boxed)?;

        info!(%name, "added custom emoji");

        Ok(ResolvedEmoji {
            set: None,
            shortcode: shortcode.to_string(),
            name,
            added_by: actor.cloned(),
        })
    }

    /// Delete a custom emoji
    ///
    /// Deleting a shortcode that doesn't exist is a no-op. The stored image is kept.
    #[instrument(skip_all, fields(%shortcode))]
    pub async fn delete_custom_emoji<A>(&self, actor: Option<&A>, shortcode: &str) -> Result<()>
    where
        A: Actor,
    {
        if let Some(actor) = actor {
            assert_permission(actor, Permission::RemoveEmoji).await?;
        }

        if !self.registry.remove(shortcode).await? {
            debug!("no custom emoji with this shortcode");
            return Ok(());
        }

        self.messaging_hub
            .emitter(EMOJI_REMOVE_TOPIC)
            .emit(&EmojiRemoved {
                shortcode: shortcode.to_string(),
                user: actor.map(Actor::id),
            })
            .await
            .map_err(Error::from_boxed)?;

        info!("removed custom emoji");

        Ok(())
    }
}
