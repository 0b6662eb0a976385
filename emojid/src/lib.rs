#[macro_use]
extern crate tracing;

use self::{emoji_set::DirectoryEmojiSet, plugin::EmojiPlugin};
use emoji_config::{messaging, storage, Configuration};
use emoji_messaging::{in_process::InProcessBackend, MessagingHub};
use emoji_registry::InMemoryRegistry;
use emoji_service::EmojiManager;
use emoji_storage::{fs, memory, AnyStorageBackend};
use eyre::Context;
use std::path::PathBuf;

pub mod emoji_set;
pub mod http;
pub mod plugin;
pub mod signal;

async fn prepare_storage(config: &storage::Configuration) -> eyre::Result<AnyStorageBackend> {
    let storage = match config {
        storage::Configuration::Fs(fs_config) => {
            let upload_dir = PathBuf::from(fs_config.upload_dir.as_str());
            tokio::fs::create_dir_all(&upload_dir)
                .await
                .wrap_err("Failed to create the upload directory")?;

            fs::Storage::new(upload_dir).into()
        }
        storage::Configuration::InMemory => memory::Storage::new().into(),
    };

    Ok(storage)
}

fn prepare_messaging(config: &messaging::Configuration) -> MessagingHub {
    match config {
        messaging::Configuration::InProcess => MessagingHub::new(InProcessBackend::default()),
    }
}

/// Wire up the manager and register every configured emoji set
pub async fn initialise(config: &Configuration) -> eyre::Result<EmojiPlugin> {
    let storage = match config.storage {
        Some(ref storage_config) => Some(prepare_storage(storage_config).await?),
        None => {
            info!("no storage configured, custom emoji are disabled");
            None
        }
    };

    let manager = EmojiManager::builder()
        .messaging_hub(prepare_messaging(&config.messaging))
        .registry(InMemoryRegistry::new())
        .storage(storage)
        .build();

    let mut plugin = EmojiPlugin::new(manager);
    for set_config in &config.emoji_sets {
        let set = DirectoryEmojiSet::load(set_config)
            .await
            .wrap_err_with(|| format!("Failed to load emoji set from {}", set_config.mapping))?;

        plugin
            .use_emoji_set(&set)
            .map_err(emoji_error::Error::into_error)?;
    }

    Ok(plugin)
}
