//! Bearer-token session shared by the API client, the board and the auth flows.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Cheap to clone; every clone sees the same token.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
    store: Option<PathBuf>,
}

impl Session {
    /// A session that lives only in memory.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Restore the token persisted at `path`, if any.
    pub fn load(path: &Path) -> Self {
        let token = match fs::read_to_string(path) {
            Ok(contents) => Some(contents.trim().to_string()).filter(|t| !t.is_empty()),
            Err(_) => None,
        };
        debug!(path = %path.display(), restored = token.is_some(), "loaded session");
        Self {
            token: Arc::new(RwLock::new(token)),
            store: Some(path.to_path_buf()),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn set_token(&self, token: impl Into<String>) -> std::io::Result<()> {
        let token = token.into();
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token.clone());
        }
        if let Some(path) = &self.store {
            save_token(path, &token)?;
        }
        Ok(())
    }

    pub fn clear(&self) {
        if let Ok(mut slot) = self.token.write() {
            *slot = None;
        }
        if let Some(path) = &self.store {
            if path.exists() {
                if let Err(err) = fs::remove_file(path) {
                    warn!(path = %path.display(), "failed to remove session file: {}", err);
                }
            }
        }
    }
}

fn save_token(path: &Path, token: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;

    // mode() only applies on creation; tighten a file left by an older run
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(token.as_bytes())?;

    Ok(())
}
