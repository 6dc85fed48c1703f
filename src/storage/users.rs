//! Credential File
//!
//! On-disk account store: one `username|password` line per account. Loaded
//! fully at startup and written back fully at shutdown. A missing file is
//! seeded with sample accounts so a fresh checkout is immediately usable.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::session::User;

/// Accounts written into a freshly created credential file.
pub const SAMPLE_USERS: [&str; 4] = ["ana", "jaime", "dani", "vico"];

/// Password shared by the sample accounts.
pub const SAMPLE_PASSWORD: &str = "1234";

/// Credential store errors. Fatal at startup; logged and non-fatal at
/// shutdown save.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying file I/O failed.
    #[error("credential file I/O: {0}")]
    Io(#[from] io::Error),

    /// A line is missing the `|` separator.
    #[error("malformed credential line {line}")]
    Malformed {
        /// 1-based line number.
        line: usize,
    },
}

/// The `username|password` credential file.
#[derive(Debug, Clone)]
pub struct UserFile {
    path: PathBuf,
}

impl UserFile {
    /// Point at a credential file, existing or not.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file seeded with [`SAMPLE_USERS`] if it does not exist.
    pub fn ensure_exists(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            return Ok(());
        }
        let mut file = fs::File::create(&self.path)?;
        for name in SAMPLE_USERS {
            writeln!(file, "{name}|{SAMPLE_PASSWORD}")?;
        }
        info!(path = %self.path.display(), "seeded credential file with sample users");
        Ok(())
    }

    /// Load every account. Blank lines are skipped; a line without the
    /// separator is a hard error.
    pub fn load_all(&self) -> Result<Vec<User>, StoreError> {
        let raw = fs::read_to_string(&self.path)?;
        let mut users = Vec::new();
        for (idx, line) in raw.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let (name, pass) = line
                .split_once('|')
                .ok_or(StoreError::Malformed { line: idx + 1 })?;
            users.push(User::new(name, pass));
        }
        info!(count = users.len(), "loaded accounts");
        Ok(users)
    }

    /// Write every account back, replacing the file contents.
    pub fn save_all(&self, users: &[User]) -> Result<(), StoreError> {
        let mut file = fs::File::create(&self.path)?;
        for user in users {
            writeln!(file, "{}|{}", user.username, user.password)?;
        }
        info!(count = users.len(), "saved accounts");
        Ok(())
    }
}
