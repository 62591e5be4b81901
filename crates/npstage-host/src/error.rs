use std::path::{Path, PathBuf};

use npstage_npapi::NPError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("access denied at `{path}`: {reason}")]
    AccessDenied { path: PathBuf, reason: String },
    #[error("plugin initialization failed: {reason}")]
    InitFailed { reason: String },
    #[error("playback failed: {reason}")]
    PlaybackFailed { reason: String },
}

impl Error {
    pub fn access_denied(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::AccessDenied {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn init_failed(reason: impl Into<String>) -> Self {
        Self::InitFailed {
            reason: reason.into(),
        }
    }

    pub fn playback_failed(reason: impl Into<String>) -> Self {
        Self::PlaybackFailed {
            reason: reason.into(),
        }
    }

    pub(crate) fn io_at(path: &Path, source: std::io::Error) -> Self {
        Self::AccessDenied {
            path: path.to_path_buf(),
            reason: source.to_string(),
        }
    }
}

/// Maps a plugin entry-point return code to a playback error carrying the
/// entry-point name.
pub(crate) fn np_call(what: &'static str, code: NPError) -> Result<()> {
    if code == npstage_npapi::NPERR_NO_ERROR {
        return Ok(());
    }
    Err(Error::playback_failed(format!(
        "{what} returned error code {code}"
    )))
}
