//! Persistence of the last submitted request
//!
//! Failures never propagate: a store that cannot be read behaves as if
//! nothing was saved, and failed writes are only logged.

use crate::RecommendationRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// Fixed key under which the last request is stored
pub const SESSION_KEY: &str = "outsourcing-tool-user-input";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedRequest {
    request: RecommendationRequest,
    saved_at: DateTime<Utc>,
}

/// File-backed store for the last request
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store rooted at `dir`; the directory is created on first save
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{SESSION_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last saved request, if any can be read back
    pub fn load(&self) -> Option<RecommendationRequest> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No saved request at {:?}", self.path);
                return None;
            }
            Err(e) => {
                warn!("Failed to open saved request {:?}: {}", self.path, e);
                return None;
            }
        };

        match serde_json::from_reader::<_, SavedRequest>(BufReader::new(file)) {
            Ok(saved) => {
                debug!("Restored request saved at {}", saved.saved_at.to_rfc3339());
                Some(saved.request)
            }
            Err(e) => {
                warn!("Ignoring malformed saved request {:?}: {}", self.path, e);
                None
            }
        }
    }

    pub fn save(&self, request: &RecommendationRequest) {
        if let Err(e) = self.try_save(request) {
            error!("Failed to save user input to {:?}: {}", self.path, e);
        }
    }

    pub fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Cleared saved request {:?}", self.path),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => error!("Failed to clear user input {:?}: {}", self.path, e),
        }
    }

    fn try_save(&self, request: &RecommendationRequest) -> crate::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let saved = SavedRequest {
            request: request.clone(),
            saved_at: Utc::now(),
        };
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, &saved)?;
        writer.flush()?;
        Ok(())
    }
}
