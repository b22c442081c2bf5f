use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use super::{AuthError, Token};

/// Fixed key (file name / keychain entry) the token is stored under
pub const TOKEN_KEY: &str = "auth_token";

/// Durable single-slot storage for the bearer token.
///
/// Implementations hold at most one token. `remove` must be idempotent.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Result<Option<Token>, AuthError>;

    /// Persist `token`, replacing any prior value
    fn set(&self, token: &Token) -> Result<(), AuthError>;

    fn remove(&self) -> Result<(), AuthError>;
}

/// In-process store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: RwLock<Option<Token>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: Token) -> Self {
        Self {
            slot: RwLock::new(Some(token)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<Token>, AuthError> {
        let slot = self
            .slot
            .read()
            .map_err(|_| AuthError::Store("token slot lock poisoned".to_string()))?;
        Ok(slot.clone())
    }

    fn set(&self, token: &Token) -> Result<(), AuthError> {
        let mut slot = self
            .slot
            .write()
            .map_err(|_| AuthError::Store("token slot lock poisoned".to_string()))?;
        *slot = Some(token.clone());
        Ok(())
    }

    fn remove(&self) -> Result<(), AuthError> {
        let mut slot = self
            .slot
            .write()
            .map_err(|_| AuthError::Store("token slot lock poisoned".to_string()))?;
        *slot = None;
        Ok(())
    }
}

/// Token persisted as a plain file named `auth_token` in the cache directory.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    cache_dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn path(&self) -> PathBuf {
        self.cache_dir.join(TOKEN_KEY)
    }

    /// Open the token file for writing, owner-only from the moment it exists
    #[cfg(unix)]
    fn open_private(path: &Path) -> Result<File, AuthError> {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?;
        // mode() only applies on creation
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        Ok(file)
    }

    #[cfg(not(unix))]
    fn open_private(path: &Path) -> Result<File, AuthError> {
        Ok(OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?)
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Result<Option<Token>, AuthError> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        if contents.is_empty() {
            return Ok(None);
        }
        Ok(Some(Token::new(contents)))
    }

    fn set(&self, token: &Token) -> Result<(), AuthError> {
        let path = self.path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = Self::open_private(&path)?;
        file.write_all(token.as_str().as_bytes())?;
        debug!(path = %path.display(), "Token saved");
        Ok(())
    }

    fn remove(&self) -> Result<(), AuthError> {
        let path = self.path();
        if path.exists() {
            std::fs::remove_file(&path)?;
            debug!(path = %path.display(), "Token removed");
        }
        Ok(())
    }
}
