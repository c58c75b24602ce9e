use std::path::{Path, PathBuf};

/// File name of the embedded database inside the data directory.
pub const DB_FILE: &str = "garage.redb";

/// Default HTTP listen address.
pub const DEFAULT_LISTEN: &str = "0.0.0.0:8080";

/// Where the server keeps its data and which address it binds.
///
/// Filled by the binary from its config file and CLI flags.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub data_dir: Option<PathBuf>,

    /// Explicit database file; overrides `{data_dir}/garage.redb`.
    pub db_path: Option<PathBuf>,

    pub listen: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            db_path: None,
            listen: DEFAULT_LISTEN.to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn new(data_dir: impl AsRef<Path>, listen: &str) -> Self {
        Self {
            data_dir: Some(data_dir.as_ref().to_path_buf()),
            db_path: None,
            listen: listen.to_string(),
        }
    }

    /// Database file path. Without a data dir the file lands in the working
    /// directory.
    pub fn resolve_db_path(&self) -> PathBuf {
        if let Some(path) = &self.db_path {
            return path.clone();
        }
        match &self.data_dir {
            Some(dir) => dir.join(DB_FILE),
            None => PathBuf::from(DB_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_file_inside_data_dir() {
        let config = ServiceConfig::new("/var/lib/garaged/prod", "127.0.0.1:9000");
        assert_eq!(
            config.resolve_db_path(),
            PathBuf::from("/var/lib/garaged/prod/garage.redb")
        );
        assert_eq!(config.listen, "127.0.0.1:9000");
    }

    #[test]
    fn explicit_db_path_wins() {
        let config = ServiceConfig {
            db_path: Some(PathBuf::from("/elsewhere/other.redb")),
            ..ServiceConfig::new("/data", DEFAULT_LISTEN)
        };
        assert_eq!(config.resolve_db_path(), PathBuf::from("/elsewhere/other.redb"));
    }

    #[test]
    fn no_data_dir_uses_cwd() {
        let config = ServiceConfig::default();
        assert_eq!(config.resolve_db_path(), PathBuf::from(DB_FILE));
        assert_eq!(config.listen, DEFAULT_LISTEN);
    }
}
