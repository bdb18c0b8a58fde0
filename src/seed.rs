//! Fixture loading for the initial store contents.

use std::{
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    constants::{FILES_FIXTURE, SESSIONS_FIXTURE, USERS_FIXTURE},
    models::{file::FileRecord, session::UploadSession, user::User},
};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("reading fixture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parsing fixture {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Initial contents of the three record stores.
#[derive(Debug, Clone, Default)]
pub struct Seed {
    pub files: Vec<FileRecord>,
    pub sessions: Vec<UploadSession>,
    pub users: Vec<User>,
}

impl Seed {
    /// Load `files.json`, `uploadSessions.json` and `users.json` from `dir`.
    ///
    /// A missing fixture yields an empty collection; a malformed one is an
    /// error.
    pub async fn load(dir: &Path) -> Result<Self, SeedError> {
        let seed = Self {
            files: load_fixture(&dir.join(FILES_FIXTURE)).await?,
            sessions: load_fixture(&dir.join(SESSIONS_FIXTURE)).await?,
            users: load_fixture(&dir.join(USERS_FIXTURE)).await?,
        };
        info!(
            dir = %dir.display(),
            files = seed.files.len(),
            sessions = seed.sessions.len(),
            users = seed.users.len(),
            "seed fixtures loaded"
        );
        Ok(seed)
    }
}

async fn load_fixture<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, SeedError> {
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "fixture not found, starting empty");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(SeedError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_slice(&raw).map_err(|source| SeedError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn loads_camel_case_fixtures() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(FILES_FIXTURE),
            r#"[{"id":"1","name":"photo.jpg","size":2048,"type":"image/jpeg",
                "uploadDate":"2024-01-15T10:30:00Z","status":"completed"}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join(SESSIONS_FIXTURE),
            r#"[{"id":"s1","files":["photo.jpg"],"startTime":"2024-01-15T10:29:00Z",
                "totalSize":2048,"completedSize":0}]"#,
        )
        .unwrap();

        let seed = Seed::load(dir.path()).await.unwrap();
        assert_eq!(seed.files.len(), 1);
        assert_eq!(seed.files[0].size, 2048);
        assert_eq!(seed.files[0].content_type.as_deref(), Some("image/jpeg"));
        assert_eq!(seed.sessions[0].files, vec!["photo.jpg".to_string()]);
        assert!(seed.users.is_empty());
    }

    #[tokio::test]
    async fn malformed_fixture_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(USERS_FIXTURE), "{not json").unwrap();
        let err = Seed::load(dir.path()).await.unwrap_err();
        assert!(matches!(err, SeedError::Json { .. }));
    }
}
