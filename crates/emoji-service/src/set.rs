use crate::consts::UNKNOWN_SET_NAME;
use smol_str::SmolStr;
use std::collections::HashMap;
use typed_builder::TypedBuilder;

/// Read-only collection of emoji provided from outside of the custom registry
#[derive(Clone, Debug, TypedBuilder)]
pub struct EmojiSet {
    #[builder(default, setter(into, strip_option))]
    name: Option<SmolStr>,
    /// Shortcode to emoji name
    #[builder(default)]
    emoji: HashMap<String, String>,
}

impl EmojiSet {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name to report for emoji resolved from this set
    #[must_use]
    pub fn display_name(&self) -> SmolStr {
        self.name
            .clone()
            .unwrap_or_else(|| SmolStr::new_static(UNKNOWN_SET_NAME))
    }

    #[must_use]
    pub fn emoji(&self) -> &HashMap<String, String> {
        &self.emoji
    }

    #[must_use]
    pub fn get(&self, shortcode: &str) -> Option<&str> {
        self.emoji.get(shortcode).map(String::as_str)
    }
}
