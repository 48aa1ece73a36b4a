use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::errors::{AppError, AppResult};

/// Where the access token lives between runs.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> AppResult<Option<String>>;
    fn save(&self, token: &str) -> AppResult<()>;
    fn clear(&self) -> AppResult<()>;
}

pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> AppResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Session(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn save(&self, token: &str) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.path)?;
        // The open-time mode only applies to newly created files.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(token.as_bytes())?;
        log::debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> AppResult<Option<String>> {
        let guard = self
            .token
            .lock()
            .map_err(|_| AppError::Session("Session store lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, token: &str) -> AppResult<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| AppError::Session("Session store lock poisoned".to_string()))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| AppError::Session("Session store lock poisoned".to_string()))?;
        *guard = None;
        Ok(())
    }
}
