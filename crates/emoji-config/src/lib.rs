#![forbid(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, forbidden_lint_groups)]

pub mod emoji_set;
pub mod messaging;
pub mod server;
pub mod storage;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Configuration {
    #[serde(default, rename = "emoji-set")]
    pub emoji_sets: Vec<emoji_set::Configuration>,
    #[serde(default)]
    pub messaging: messaging::Configuration,
    pub server: server::Configuration,
    /// Custom emoji are disabled without a storage
    pub storage: Option<storage::Configuration>,
}

impl Configuration {
    pub async fn load<P>(path: P) -> eyre::Result<Self>
    where
        P: AsRef<Path>,
    {
        let content = fs::read_to_string(path).await?;
        toml::from_str(&content).map_err(eyre::Report::from)
    }
}
