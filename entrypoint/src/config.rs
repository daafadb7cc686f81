use serde::{Deserialize, Serialize};
use serde_envfile::Error;

fn default_mount() -> String {
    "secret".to_string()
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Config {
    pub vault_addr: String,
    pub vault_token: String,
    #[serde(default = "default_mount")]
    pub vault_mount: String,
    pub vault_secret: String,
    pub vault_field: String,
    pub target_var: String,
    #[serde(default)]
    pub secrets_dir: Option<String>,
    #[serde(default)]
    pub pre_command: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        serde_envfile::from_env()
    }
}
