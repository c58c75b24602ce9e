//! Server configuration file.
//!
//! A context name such as `prod` resolves to `/etc/garaged/prod.toml`; any
//! argument containing `/` or ending in `.toml` is used as a path directly.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

/// Directory searched for context files.
pub const CONFIG_DIR: &str = "/etc/garaged";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub admin: AdminConfig,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// The single operator account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_username")]
    pub username: String,
    /// argon2id PHC string.
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_expire_secs")]
    pub expire_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    /// Database file; defaults to `garage.redb` inside `data_dir`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<String>,
}

/// Base service labels. Empty means the built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub base_services: Vec<String>,
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_expire_secs() -> u64 {
    3600
}

impl ServerConfig {
    /// Map a context name or path to a config file path.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.ends_with(".toml") {
            PathBuf::from(name_or_path)
        } else {
            PathBuf::from(CONFIG_DIR).join(format!("{}.toml", name_or_path))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: ServerConfig = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_context_name() {
        assert_eq!(
            ServerConfig::resolve_path("prod"),
            PathBuf::from("/etc/garaged/prod.toml")
        );
        assert_eq!(
            ServerConfig::resolve_path("./local.toml"),
            PathBuf::from("./local.toml")
        );
        assert_eq!(
            ServerConfig::resolve_path("dev.toml"),
            PathBuf::from("dev.toml")
        );
    }

    #[test]
    fn parse_minimal_file() {
        let config: ServerConfig = toml::from_str(
            r#"
[admin]
password_hash = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"

[jwt]
secret = "abc"

[storage]
data_dir = "/var/lib/garaged"
"#,
        )
        .unwrap();
        assert_eq!(config.admin.username, "admin");
        assert_eq!(config.jwt.expire_secs, 3600);
        assert!(config.catalog.base_services.is_empty());
        assert!(config.storage.db_path.is_none());
    }

    #[test]
    fn parse_explicit_db_path() {
        let config: ServerConfig = toml::from_str(
            r#"
[admin]
password_hash = "h"

[jwt]
secret = "abc"

[storage]
data_dir = "/var/lib/garaged"
db_path = "/mnt/fast/warranty.redb"
"#,
        )
        .unwrap();
        assert_eq!(config.storage.db_path.as_deref(), Some("/mnt/fast/warranty.redb"));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/test.toml");
        let config = ServerConfig {
            admin: AdminConfig { username: "usta".into(), password_hash: "h".into() },
            jwt: JwtConfig { secret: "s".into(), expire_secs: 60 },
            storage: StorageConfig { data_dir: "/data".into(), db_path: None },
            catalog: CatalogConfig { base_services: vec!["PPF".into()] },
        };
        config.save(&path).unwrap();

        let back = ServerConfig::load(&path).unwrap();
        assert_eq!(back.admin.username, "usta");
        assert_eq!(back.catalog.base_services, vec!["PPF".to_string()]);
    }
}
