use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Environment variable that overrides the database location.
pub const DB_PATH_ENV: &str = "PERSONAL_LIBRARY_DB";
/// Folder created next to the executable for the database and logs.
const DATA_DIR_NAME: &str = "data";
/// Home-directory folder used when the executable location is unknown.
const HOME_DIR_NAME: &str = ".personal-library";
/// SQLite file name stored inside the data directory.
const DB_FILE_NAME: &str = "library.sqlite";
const LOG_DIR_NAME: &str = "logs";

/// Where the application keeps its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
}

impl LibraryConfig {
    /// Build a config around an explicit database file. Logs land in a `logs`
    /// folder beside it.
    pub fn with_db_path(db_path: impl Into<PathBuf>) -> Self {
        let db_path = db_path.into();
        let log_dir = db_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(LOG_DIR_NAME);
        Self { db_path, log_dir }
    }

    /// Resolve the locations for this run: the environment override first,
    /// then `data/` beside the executable, then a folder in the home
    /// directory.
    pub fn resolve() -> Result<Self> {
        Self::from_sources(
            env::var_os(DB_PATH_ENV),
            executable_dir(),
            BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf()),
        )
    }

    fn from_sources(
        env_override: Option<OsString>,
        exe_dir: Option<PathBuf>,
        home_dir: Option<PathBuf>,
    ) -> Result<Self> {
        if let Some(path) = env_override.filter(|value| !value.is_empty()) {
            return Ok(Self::with_db_path(PathBuf::from(path)));
        }

        if let Some(dir) = exe_dir {
            return Ok(Self::with_db_path(dir.join(DATA_DIR_NAME).join(DB_FILE_NAME)));
        }

        let home = home_dir.ok_or_else(|| anyhow!("could not locate home directory"))?;
        Ok(Self::with_db_path(home.join(HOME_DIR_NAME).join(DB_FILE_NAME)))
    }
}

fn executable_dir() -> Option<PathBuf> {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logs_live_next_to_the_database() {
        let config = LibraryConfig::with_db_path("/srv/library/data/library.sqlite");
        assert_eq!(config.log_dir, PathBuf::from("/srv/library/data/logs"));
    }

    #[test]
    fn bare_file_name_logs_to_relative_folder() {
        let config = LibraryConfig::with_db_path("library.sqlite");
        assert_eq!(config.log_dir, PathBuf::from("logs"));
    }

    #[test]
    fn env_override_wins() {
        let config = LibraryConfig::from_sources(
            Some(OsString::from("/tmp/custom.sqlite")),
            Some(PathBuf::from("/opt/library")),
            Some(PathBuf::from("/home/ana")),
        )
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/custom.sqlite"));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/logs"));
    }

    #[test]
    fn empty_override_falls_back_to_executable_dir() {
        let config = LibraryConfig::from_sources(
            Some(OsString::new()),
            Some(PathBuf::from("/opt/library")),
            Some(PathBuf::from("/home/ana")),
        )
        .unwrap();
        assert_eq!(
            config.db_path,
            PathBuf::from("/opt/library/data/library.sqlite")
        );
    }

    #[test]
    fn home_directory_is_the_last_resort() {
        let config =
            LibraryConfig::from_sources(None, None, Some(PathBuf::from("/home/ana"))).unwrap();
        assert_eq!(
            config.db_path,
            PathBuf::from("/home/ana/.personal-library/library.sqlite")
        );

        assert!(LibraryConfig::from_sources(None, None, None).is_err());
    }
}
