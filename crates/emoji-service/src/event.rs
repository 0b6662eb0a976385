use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const EMOJI_ADD_TOPIC: &str = "emoji:add";
pub const EMOJI_REMOVE_TOPIC: &str = "emoji:remove";

/// Published on [`EMOJI_ADD_TOPIC`] after the record has been persisted
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmojiAdded {
    pub shortcode: String,
    pub name: String,
    pub added_by: Option<Uuid>,
}

/// Published on [`EMOJI_REMOVE_TOPIC`] after the record has been removed
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmojiRemoved {
    pub shortcode: String,
    /// Acting user, `None` if the removal was system-initiated
    pub user: Option<Uuid>,
}
