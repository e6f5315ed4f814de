//! Wire types for the MusicBox backend.
//!
//! The backend wraps fallible operations in `{ success, error? }`
//! envelopes; the conversion helpers here turn those into `Result`s so
//! callers never look at a `success` flag.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A library-persisted track as serialized by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    pub id: i64,
    pub title: String,
    #[serde(default = "unknown_artist")]
    pub artist: String,
    /// Catalog duration in whole seconds. Used as a provisional player
    /// duration until the decoder reports the real one.
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn unknown_artist() -> String {
    "Unknown Artist".to_string()
}

/// Transient output of a URL conversion. Not persisted; consumed by either
/// "save to library" or "download".
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub file_id: String,
    pub title: String,
    pub artist: Option<String>,
    pub duration: u64,
    pub youtube_url: Option<String>,
    pub safe_title: String,
}

/// Body for `POST /save-to-library`.
#[derive(Debug, Clone, Serialize)]
pub struct SaveRequest {
    pub file_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    pub duration: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
}

impl From<&ConversionResult> for SaveRequest {
    fn from(r: &ConversionResult) -> Self {
        Self {
            file_id: r.file_id.clone(),
            title: r.title.clone(),
            artist: r.artist.clone(),
            duration: r.duration,
            youtube_url: r.youtube_url.clone(),
        }
    }
}

/// Raw `POST /convert` response before envelope unwrapping.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub file_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub youtube_url: Option<String>,
    #[serde(default)]
    pub safe_title: Option<String>,
}

impl ConvertResponse {
    /// Unwrap the envelope into a `ConversionResult` or the server's error.
    pub fn into_result(self) -> Result<ConversionResult, ApiError> {
        if !self.success {
            return Err(ApiError::Api(
                self.error
                    .unwrap_or_else(|| "Failed to convert video".to_string()),
            ));
        }

        // A success response without a file id is malformed; treat it as an
        // application error rather than trusting a half-filled payload.
        let file_id = self
            .file_id
            .ok_or_else(|| ApiError::Api("Conversion response was incomplete".to_string()))?;
        let title = self.title.unwrap_or_else(|| "audio".to_string());
        let safe_title = self.safe_title.unwrap_or_else(|| title.clone());

        Ok(ConversionResult {
            file_id,
            title,
            artist: self.artist,
            duration: self.duration.unwrap_or(0),
            youtube_url: self.youtube_url,
            safe_title,
        })
    }
}

/// `{ success, error? }` envelope used by delete and save.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl StatusResponse {
    pub fn into_result(self, fallback: &str) -> Result<(), ApiError> {
        if self.success {
            Ok(())
        } else {
            Err(ApiError::Api(
                self.error.unwrap_or_else(|| fallback.to_string()),
            ))
        }
    }
}

/// Failure taxonomy for backend calls.
///
/// `Api` is a well-formed `success:false` response and carries the server's
/// message verbatim. The other variants cover connection failures,
/// timeouts, non-success statuses and undecodable bodies, and are surfaced
/// to the user only as a generic retry message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Api(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// The message shown in the UI. Raw transport details stay in the log.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Api(msg) => msg.clone(),
            _ => "Network error. Please try again.".to_string(),
        }
    }

    pub fn is_transport(&self) -> bool {
        !matches!(self, ApiError::Api(_))
    }
}
