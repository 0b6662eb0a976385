use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Emoji set backed by a directory of images
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Configuration {
    pub name: Option<SmolStr>,
    /// TOML file with a `shortcode = "file name"` table
    pub mapping: SmolStr,
    /// Directory the images are served from
    pub asset_dir: SmolStr,
}
