//! Merging of emoji sets and the custom emoji registry
//!
//! Single lookups and full listings use opposite precedence among the sets:
//! a lookup takes the first registered set containing the shortcode, a listing lets the
//! last registered set win. Custom emoji always win over any set.

use crate::set::EmojiSet;
use emoji_error::Result;
use emoji_registry::{CustomEmoji, EmojiRegistry};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::collections::HashMap;
use uuid::Uuid;

/// Emoji resolved from either an emoji set or the custom registry
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedEmoji<A = Uuid> {
    /// `None` if the emoji comes from the custom registry
    pub set: Option<SmolStr>,
    pub shortcode: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_by: Option<A>,
}

impl From<CustomEmoji> for ResolvedEmoji {
    fn from(value: CustomEmoji) -> Self {
        Self {
            set: None,
            shortcode: value.shortcode,
            name: value.name,
            added_by: value.added_by,
        }
    }
}

/// Resolve a single shortcode
///
/// Returns `None` if neither the registry nor any of the sets know the shortcode
pub async fn resolve_one<R>(
    sets: &[EmojiSet],
    registry: &R,
    shortcode: &str,
) -> Result<Option<ResolvedEmoji>>
where
    R: EmojiRegistry,
{
    if let Some(custom) = registry.find_by_shortcode(shortcode).await? {
        return Ok(Some(custom.into()));
    }

    let resolved = sets.iter().find_map(|set| {
        set.get(shortcode).map(|name| ResolvedEmoji {
            set: Some(set.display_name()),
            shortcode: shortcode.to_string(),
            name: name.to_string(),
            added_by: None,
        })
    });

    Ok(resolved)
}

/// Resolve every known shortcode to its name
pub async fn resolve_all<R>(sets: &[EmojiSet], registry: &R) -> Result<HashMap<String, String>>
where
    R: EmojiRegistry,
{
    let mut map = HashMap::new();
    for set in sets {
        map.extend(
            set.emoji()
                .iter()
                .map(|(shortcode, name)| (shortcode.clone(), name.clone())),
        );
    }

    let custom = registry.list().await?;
    map.extend(custom.into_iter().map(|emoji| (emoji.shortcode, emoji.name)));

    Ok(map)
}
