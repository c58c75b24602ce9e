//! `garaged init`: write a fresh server config for a context.

use std::path::PathBuf;

use rand::Rng;
use tracing::info;

use crate::bootstrap::hash_password;
use crate::config::{AdminConfig, CatalogConfig, JwtConfig, ServerConfig, StorageConfig};

pub struct InitOptions {
    pub name: String,
    pub config_dir: String,
    pub data_dir: Option<String>,
    pub username: String,
    pub password: String,
    pub force: bool,
}

/// Hash the admin password, generate a JWT secret and write
/// `{config_dir}/{name}.toml`. Returns the written path.
pub fn run(opts: &InitOptions) -> anyhow::Result<PathBuf> {
    if opts.password.is_empty() {
        anyhow::bail!("admin password must not be empty");
    }

    let config_path = PathBuf::from(&opts.config_dir).join(format!("{}.toml", opts.name));
    if config_path.exists() && !opts.force {
        anyhow::bail!(
            "{} already exists; pass --force to overwrite",
            config_path.display()
        );
    }

    let data_dir = opts
        .data_dir
        .clone()
        .unwrap_or_else(|| format!("/var/lib/garaged/{}", opts.name));

    let config = ServerConfig {
        admin: AdminConfig {
            username: opts.username.clone(),
            password_hash: hash_password(&opts.password)?,
        },
        jwt: JwtConfig {
            secret: random_secret(),
            expire_secs: 3600,
        },
        storage: StorageConfig { data_dir: data_dir.clone(), db_path: None },
        catalog: CatalogConfig::default(),
    };

    config.save(&config_path)?;
    std::fs::create_dir_all(&data_dir)?;

    info!(config = %config_path.display(), data = %data_dir, "context initialized");
    Ok(config_path)
}

/// 32 random bytes, hex encoded.
fn random_secret() -> String {
    let mut rng = rand::thread_rng();
    (0..32).map(|_| format!("{:02x}", rng.r#gen::<u8>())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::{verify_admin_password, verify_config};

    fn opts(dir: &tempfile::TempDir) -> InitOptions {
        InitOptions {
            name: "test".into(),
            config_dir: dir.path().join("etc").to_string_lossy().to_string(),
            data_dir: Some(dir.path().join("data").to_string_lossy().to_string()),
            username: "usta".into(),
            password: "gizli".into(),
            force: false,
        }
    }

    #[test]
    fn writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = run(&opts(&dir)).unwrap();

        let config = ServerConfig::load(&path).unwrap();
        verify_config(&config).unwrap();
        assert_eq!(config.admin.username, "usta");
        assert!(verify_admin_password("gizli", &config.admin.password_hash));
        assert_eq!(config.jwt.secret.len(), 64);
        assert!(dir.path().join("data").is_dir());
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let mut o = opts(&dir);
        run(&o).unwrap();
        assert!(run(&o).is_err());

        o.force = true;
        run(&o).unwrap();
    }

    #[test]
    fn secrets_differ() {
        assert_ne!(random_secret(), random_secret());
    }
}
