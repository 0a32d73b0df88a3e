use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatabaseUrlError {
    #[error("database url is empty")]
    Empty,
    #[error("database url has no file path: {0}")]
    MissingPath(String),
}

/// Where the quiz database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// In-memory database, kept as the URL sqlx opens.
    Memory(String),
    /// Absolute path to a database file.
    File(PathBuf),
}

impl DatabaseLocation {
    /// Parse `sqlite::memory:`, `mode=memory` URIs, `sqlite://` and `sqlite:`
    /// URLs, or a bare path. Relative paths resolve against `base`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseUrlError` for an empty input or a URL without a path.
    pub fn parse(raw: &str, base: &Path) -> Result<Self, DatabaseUrlError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(DatabaseUrlError::Empty);
        }
        if raw == "sqlite::memory:" || raw.contains("mode=memory") {
            return Ok(Self::Memory(raw.to_owned()));
        }

        let rest = raw
            .strip_prefix("sqlite://")
            .or_else(|| raw.strip_prefix("sqlite:"))
            .unwrap_or(raw);
        let path = rest.split('?').next().unwrap_or_default();
        if path.is_empty() {
            return Err(DatabaseUrlError::MissingPath(raw.to_owned()));
        }

        let path = Path::new(path);
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.join(path)
        };
        Ok(Self::File(absolute))
    }

    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            Self::Memory(_) => None,
            Self::File(path) => Some(path.as_path()),
        }
    }

    #[must_use]
    pub fn url(&self) -> String {
        match self {
            Self::Memory(url) => url.clone(),
            Self::File(path) => format!("sqlite://{}", path.display()),
        }
    }
}

impl fmt::Display for DatabaseLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> PathBuf {
        PathBuf::from("/srv/relic")
    }

    #[test]
    fn memory_urls_pass_through() {
        assert_eq!(
            DatabaseLocation::parse("sqlite::memory:", &base()).unwrap(),
            DatabaseLocation::Memory("sqlite::memory:".into())
        );
        let shared = "sqlite:file:quiz?mode=memory&cache=shared";
        assert_eq!(
            DatabaseLocation::parse(shared, &base()).unwrap().url(),
            shared
        );
    }

    #[test]
    fn relative_paths_resolve_against_base() {
        for raw in ["relic.sqlite3", "sqlite:relic.sqlite3", "sqlite://relic.sqlite3"] {
            assert_eq!(
                DatabaseLocation::parse(raw, &base()).unwrap(),
                DatabaseLocation::File(PathBuf::from("/srv/relic/relic.sqlite3")),
                "{raw}"
            );
        }
    }

    #[test]
    fn absolute_paths_drop_query_parameters() {
        let location =
            DatabaseLocation::parse("sqlite:///var/lib/relic.db?mode=rwc", &base()).unwrap();
        assert_eq!(
            location,
            DatabaseLocation::File(PathBuf::from("/var/lib/relic.db"))
        );
        assert_eq!(location.to_string(), "sqlite:///var/lib/relic.db");
    }

    #[test]
    fn rejects_urls_without_a_path() {
        assert_eq!(
            DatabaseLocation::parse("  ", &base()),
            Err(DatabaseUrlError::Empty)
        );
        assert_eq!(
            DatabaseLocation::parse("sqlite://?mode=rwc", &base()),
            Err(DatabaseUrlError::MissingPath("sqlite://?mode=rwc".into()))
        );
    }
}
