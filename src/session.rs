use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tokio::sync::watch;
use tracing::info;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to read session file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse session file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to write session file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Not signed in. Run `plantpal login` or `plantpal create-account` first.")]
    NotSignedIn,
}

/// The locally persisted subset of the signed-in user.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub garden_name: Option<String>,
}

/// Fields to merge into the session. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct SessionUpdate {
    pub user_id: Option<i32>,
    pub zip_code: Option<String>,
    pub user_name: Option<String>,
    pub garden_name: Option<String>,
}

/// Session context constructed once at startup and handed to every view.
///
/// All writes go through [`Session::update`]; zip-code changes are published on
/// a watch channel so other views can react without polling the file.
pub struct Session {
    path: PathBuf,
    data: SessionData,
    zip_tx: watch::Sender<Option<String>>,
}

impl Session {
    /// Loads the session from disk. A missing file yields a signed-out session.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let data = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|source| SessionError::Read {
                path: path.display().to_string(),
                source,
            })?;
            toml::from_str(&content).map_err(|source| SessionError::Parse {
                path: path.display().to_string(),
                source,
            })?
        } else {
            SessionData::default()
        };
        let (zip_tx, _) = watch::channel(data.zip_code.clone());
        Ok(Self { path, data, zip_tx })
    }

    pub fn data(&self) -> &SessionData {
        &self.data
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The signed-in user id; protected views gate on this.
    pub fn user_id(&self) -> Result<i32, SessionError> {
        self.data.user_id.ok_or(SessionError::NotSignedIn)
    }

    pub fn zip_code(&self) -> Option<&str> {
        self.data.zip_code.as_deref()
    }

    pub fn user_name(&self) -> Option<&str> {
        self.data.user_name.as_deref()
    }

    pub fn garden_name(&self) -> Option<&str> {
        self.data.garden_name.as_deref()
    }

    /// Subscribes to zip-code changes. The receiver always holds the latest zip.
    pub fn subscribe_zip(&self) -> watch::Receiver<Option<String>> {
        self.zip_tx.subscribe()
    }

    /// Merges `update` into the session, persists it, and publishes the new zip
    /// code if it changed.
    pub fn update(&mut self, update: SessionUpdate) -> Result<(), SessionError> {
        if let Some(user_id) = update.user_id {
            self.data.user_id = Some(user_id);
        }
        if let Some(user_name) = update.user_name {
            self.data.user_name = Some(user_name);
        }
        if let Some(garden_name) = update.garden_name {
            self.data.garden_name = Some(garden_name);
        }
        let zip_changed = match update.zip_code {
            Some(zip) if self.data.zip_code.as_deref() != Some(zip.as_str()) => {
                self.data.zip_code = Some(zip);
                true
            }
            _ => false,
        };

        self.persist()?;

        if zip_changed {
            // Subscribers may have gone away; that is not an error.
            let _ = self.zip_tx.send(self.data.zip_code.clone());
        }
        Ok(())
    }

    /// Clears the whole session (logout, account deletion).
    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.data = SessionData::default();
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|source| SessionError::Write {
                path: self.path.display().to_string(),
                source,
            })?;
        }
        let _ = self.zip_tx.send(None);
        info!("Session cleared.");
        Ok(())
    }

    fn persist(&self) -> Result<(), SessionError> {
        let content = toml::to_string_pretty(&self.data).map_err(|e| SessionError::Write {
            path: self.path.display().to_string(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;
        fs::write(&self.path, content).map_err(|source| SessionError::Write {
            path: self.path.display().to_string(),
            source,
        })
    }
}
