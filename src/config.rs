//! Runtime configuration.
//!
//! The data directory comes from `--data-dir`, then `$TASKDESK_DIR`, then
//! `$HOME/.taskdesk`, falling back to `./.taskdesk` without a home.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::controller::NOTIFICATION_TIMEOUT;
use crate::error::Result;
use crate::storage::{AnyStorage, FileStorage, MemoryStorage};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "TASKDESK_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Keep everything in memory; nothing touches disk.
    pub ephemeral: bool,
    pub notification_timeout: Duration,
}

impl Config {
    /// Resolve from command-line flags and the process environment.
    pub fn resolve(cli_dir: Option<&Path>, ephemeral: bool) -> Self {
        Self::resolve_with(
            cli_dir,
            std::env::var(DATA_DIR_ENV).ok(),
            std::env::var("HOME").ok(),
            ephemeral,
        )
    }

    fn resolve_with(
        cli_dir: Option<&Path>,
        env_dir: Option<String>,
        home: Option<String>,
        ephemeral: bool,
    ) -> Self {
        let data_dir = match (cli_dir, env_dir.filter(|d| !d.trim().is_empty())) {
            (Some(dir), _) => dir.to_path_buf(),
            (None, Some(dir)) => PathBuf::from(dir),
            (None, None) => PathBuf::from(home.unwrap_or_else(|| ".".to_string())).join(".taskdesk"),
        };
        Self {
            data_dir,
            ephemeral,
            notification_timeout: NOTIFICATION_TIMEOUT,
        }
    }

    /// Open the storage backend this configuration selects.
    pub fn open_storage(&self) -> Result<AnyStorage> {
        if self.ephemeral {
            return Ok(AnyStorage::Memory(MemoryStorage::new()));
        }
        Ok(AnyStorage::File(FileStorage::open(&self.data_dir)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_precedence() {
        let cfg = Config::resolve_with(
            Some(Path::new("/tmp/cli")),
            Some("/tmp/env".into()),
            Some("/home/u".into()),
            false,
        );
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/cli"));

        let cfg = Config::resolve_with(None, Some("/tmp/env".into()), Some("/home/u".into()), false);
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/env"));

        let cfg = Config::resolve_with(None, Some("  ".into()), Some("/home/u".into()), false);
        assert_eq!(cfg.data_dir, PathBuf::from("/home/u/.taskdesk"));

        let cfg = Config::resolve_with(None, None, None, true);
        assert_eq!(cfg.data_dir, PathBuf::from("./.taskdesk"));
        assert_eq!(cfg.notification_timeout, NOTIFICATION_TIMEOUT);
    }

    #[test]
    fn test_open_storage() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::resolve_with(Some(&dir.path().join("data")), None, None, false);
        assert!(matches!(cfg.open_storage().unwrap(), AnyStorage::File(_)));
        assert!(dir.path().join("data").is_dir());

        let cfg = Config { ephemeral: true, ..cfg };
        assert!(matches!(cfg.open_storage().unwrap(), AnyStorage::Memory(_)));
    }
}
