use crate::domain::error::DomainError;
use crate::domain::ports::token_store::TokenStore;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const CREDENTIALS_FILE_NAME: &str = "credentials.json";

/// Stored tokens expire after a day, like the session cookie they replace.
pub const TOKEN_LIFETIME_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
struct StoredCredentials {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Credentials file on disk, written owner-only on Unix.
pub struct FileTokenStore {
    path: PathBuf,
    lifetime: Duration,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lifetime: Duration::hours(TOKEN_LIFETIME_HOURS),
        }
    }

    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// `<config dir>/recsync/credentials.json`
    pub fn default_path() -> Result<PathBuf, DomainError> {
        dirs::config_dir()
            .map(|d| d.join("recsync").join(CREDENTIALS_FILE_NAME))
            .ok_or_else(|| DomainError::TokenStore("config directory not found".into()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, DomainError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(DomainError::TokenStore(format!(
                    "read {}: {e}",
                    self.path.display()
                )))
            }
        };
        let stored: StoredCredentials = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(error) => {
                tracing::warn!(%error, path = %self.path.display(), "ignoring unreadable credentials file");
                return Ok(None);
            }
        };
        if stored.expires_at <= Utc::now() {
            tracing::debug!(path = %self.path.display(), "stored token expired");
            return Ok(None);
        }
        Ok(Some(stored.token).filter(|t| !t.trim().is_empty()))
    }

    fn save(&self, token: &str) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| DomainError::TokenStore(format!("mkdir {}: {e}", parent.display())))?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                    tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
                }
            }
        }

        let stored = StoredCredentials {
            token: token.to_string(),
            expires_at: Utc::now() + self.lifetime,
        };
        let json = serde_json::to_string(&stored).map_err(|e| DomainError::TokenStore(e.to_string()))?;
        let write_err = |e: std::io::Error| DomainError::TokenStore(format!("write {}: {e}", self.path.display()));

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path).map_err(write_err)?;
        file.write_all(json.as_bytes()).map_err(write_err)?;

        // `mode` only applies when the file is created.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600)).map_err(|e| {
                DomainError::TokenStore(format!("chmod {}: {e}", self.path.display()))
            })?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), DomainError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::TokenStore(format!(
                "delete {}: {e}",
                self.path.display()
            ))),
        }
    }
}
