use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::ServerSettings;

use super::types::{
    ApiError, ConversionResult, ConvertResponse, SaveRequest, StatusResponse, Track,
};

/// Blocking client for the MusicBox backend.
///
/// Cheap to clone; the underlying `reqwest` client is shared. All calls run
/// on worker threads, never on the UI thread.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::blocking::Client,
    base: String,
}

impl ApiClient {
    pub fn new(settings: &ServerSettings) -> Result<Self, ApiError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// `GET /api/songs`: the full library, server-defined order.
    pub fn songs(&self) -> Result<Vec<Track>, ApiError> {
        let resp = self
            .http
            .get(format!("{}/api/songs", self.base))
            .send()?
            .error_for_status()?;
        Ok(resp.json()?)
    }

    /// `GET /api/songs/{id}`: a single track record.
    pub fn song(&self, id: i64) -> Result<Track, ApiError> {
        let resp = self
            .http
            .get(format!("{}/api/songs/{}", self.base, id))
            .send()?
            .error_for_status()?;
        Ok(resp.json()?)
    }

    /// `DELETE /api/songs/{id}`.
    pub fn delete_song(&self, id: i64) -> Result<(), ApiError> {
        let resp: StatusResponse = self
            .http
            .delete(format!("{}/api/songs/{}", self.base, id))
            .send()?
            .error_for_status()?
            .json()?;
        resp.into_result("Failed to delete song")
    }

    /// `POST /convert`: ask the server to extract audio from `url`.
    ///
    /// This is the long call of the API; the configured timeout has to
    /// accommodate the server-side extraction.
    pub fn convert(&self, url: &str) -> Result<ConversionResult, ApiError> {
        let resp: ConvertResponse = self
            .http
            .post(format!("{}/convert", self.base))
            .json(&serde_json::json!({ "url": url }))
            .send()?
            .error_for_status()?
            .json()?;
        resp.into_result()
    }

    /// `POST /save-to-library`: promote a conversion result into the library.
    pub fn save_to_library(&self, request: &SaveRequest) -> Result<(), ApiError> {
        let resp: StatusResponse = self
            .http
            .post(format!("{}/save-to-library", self.base))
            .json(request)
            .send()?
            .error_for_status()?
            .json()?;
        resp.into_result("Failed to save")
    }

    /// URL of a track's audio stream. No network; the audio transport
    /// fetches it when told to load.
    pub fn audio_url(&self, song_id: i64) -> String {
        format!("{}/api/songs/{}/audio", self.base, song_id)
    }

    /// URL of a one-shot file download for a conversion result.
    pub fn download_url(&self, file_id: &str, title: &str) -> String {
        format!(
            "{}/download/{}?title={}",
            self.base,
            file_id,
            urlencoding::encode(title)
        )
    }

    /// Fetch an entire resource into memory (used for audio streams).
    pub fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let resp = self.http.get(url).send()?.error_for_status()?;
        Ok(resp.bytes()?.to_vec())
    }

    /// Stream `url` into `dir/file_name`, returning the written path.
    pub fn download_file(
        &self,
        url: &str,
        dir: &Path,
        file_name: &str,
    ) -> Result<PathBuf, ApiError> {
        let mut resp = self.http.get(url).send()?.error_for_status()?;

        let dest = dir.join(file_name);
        let mut file = File::create(&dest)?;
        resp.copy_to(&mut file)?;
        Ok(dest)
    }
}
