//! Startup checks and admin credential handling.

use argon2::Argon2;
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::config::ServerConfig;

/// Refuse to start with a configuration that cannot authenticate anyone.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.admin.username.trim().is_empty() {
        anyhow::bail!("Admin username is empty in configuration.");
    }
    if config.admin.password_hash.is_empty() {
        anyhow::bail!(
            "No admin password hash found in configuration.\n\
             Run `garaged init` to set up the server first."
        );
    }
    if config.jwt.secret.is_empty() {
        anyhow::bail!("JWT secret is empty in configuration.");
    }
    if config.storage.data_dir.is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    Ok(())
}

/// Hash a password into an argon2id PHC string.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| anyhow::anyhow!("failed to hash password: {}", e))
}

/// Verify a login attempt against the stored hash.
pub fn verify_admin_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}
