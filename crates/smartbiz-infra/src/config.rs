//! Configuration loading for SmartBiz.
//!
//! Settings come from `config.toml` in the data directory (`~/.smartbiz/`
//! unless `SMARTBIZ_DATA_DIR` is set). Credentials never live in that file:
//! they are read from the environment and held as [`SecretString`].

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use smartbiz_types::config::GlobalConfig;

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const STABLE_DIFFUSION_API_KEY: &str = "STABLE_DIFFUSION_API_KEY";
pub const CLOUDINARY_URL: &str = "CLOUDINARY_URL";

/// Resolve the data directory: `SMARTBIZ_DATA_DIR`, then `~/.smartbiz`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SMARTBIZ_DATA_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".smartbiz"),
        None => PathBuf::from(".smartbiz"),
    }
}

/// Load `{data_dir}/config.toml`.
///
/// A missing file yields the defaults. An unreadable or malformed file is
/// logged and also yields the defaults.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", config_path.display());
            GlobalConfig::default()
        }
    }
}

/// External-service credentials. Empty variables count as unset.
#[derive(Default)]
pub struct Credentials {
    pub openai_api_key: Option<SecretString>,
    pub edit_api_key: Option<SecretString>,
    pub cloudinary_url: Option<SecretString>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let secret = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(SecretString::from)
        };
        Self {
            openai_api_key: secret(OPENAI_API_KEY),
            edit_api_key: secret(STABLE_DIFFUSION_API_KEY),
            cloudinary_url: secret(CLOUDINARY_URL),
        }
    }
}
