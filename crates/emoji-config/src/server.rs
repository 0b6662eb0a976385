use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

fn default_mount_path() -> SmolStr {
    SmolStr::new_static("/")
}

const fn default_request_timeout_secs() -> u64 {
    60
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Configuration {
    #[serde(default = "default_mount_path")]
    pub mount_path: SmolStr,
    pub port: u16,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}
