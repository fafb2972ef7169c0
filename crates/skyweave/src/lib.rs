use core::fmt;

use model::DetectionMode;
use serde::{de::DeserializeOwned, Deserialize};

use crate::geojson::GeoJson;

pub mod geojson;

/// Marker the backend answers on `GET /` while it is up. Anything else
/// counts as offline.
pub const STATUS_MARKER: &str = "SkyWeave backend running";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
}

impl BackendConfig {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Reads `SKYWEAVE_BACKEND_URL`, falling back to the local dev port the
    /// backend binds by default.
    pub fn from_env() -> Self {
        let base_url = std::env::var("SKYWEAVE_BACKEND_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        Self { base_url }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[derive(Debug)]
pub enum ApiError {
    Request(reqwest::Error),
    Status(reqwest::StatusCode),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Request(why) => write!(f, "backend request failed: {}", why),
            Self::Status(code) => {
                write!(f, "backend answered with status {}", code)
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(why: reqwest::Error) -> Self {
        Self::Request(why)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn is_running(&self) -> bool {
        self.status == STATUS_MARKER
    }
}

/// Acknowledgement of `POST /set_base_location`. The backend also clears its
/// accumulated trail when this succeeds.
#[derive(Debug, Clone, Deserialize)]
pub struct BaseLocationAck {
    pub status: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone)]
pub struct SkyweaveClient {
    base_url: String,
    http: reqwest::Client,
}

impl SkyweaveClient {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.http.get(self.url(path)).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(response.json().await?)
    }

    pub async fn status(&self) -> ApiResult<StatusResponse> {
        self.get_json("/").await
    }

    pub async fn trail_geojson(&self) -> ApiResult<GeoJson> {
        self.get_json("/trail/geojson").await
    }

    pub async fn landslide_geojson(&self) -> ApiResult<GeoJson> {
        self.get_json("/landslide/geojson").await
    }

    pub async fn combined_geojson(&self) -> ApiResult<GeoJson> {
        self.get_json("/combined/geojson").await
    }

    pub async fn set_base_location(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> ApiResult<BaseLocationAck> {
        let response = self
            .http
            .post(self.url("/set_base_location"))
            .json(&serde_json::json!({ "lat": latitude, "lon": longitude }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(response.json().await?)
    }

    /// The backend serves the annotated MJPEG stream at `/stream` for trail
    /// detection and at `/stream/{mode}` for the other modes.
    pub fn stream_url(&self, mode: DetectionMode) -> String {
        match mode {
            DetectionMode::Trail => self.url("/stream"),
            other => self.url(&format!("/stream/{}", other)),
        }
    }

    /// Opens the MJPEG stream for passthrough. The body is consumed as raw
    /// bytes, never parsed.
    pub async fn open_stream(
        &self,
        mode: DetectionMode,
    ) -> ApiResult<reqwest::Response> {
        let response = self.http.get(self.stream_url(mode)).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_payload_counts_as_running() {
        let response: StatusResponse =
            serde_json::from_str(r#"{"status": "SkyWeave backend running"}"#)
                .unwrap();
        assert!(response.is_running());
    }

    #[test]
    fn any_other_payload_does_not() {
        let response = StatusResponse {
            status: "starting up".to_owned(),
        };
        assert!(!response.is_running());
    }

    #[test]
    fn stream_paths_per_mode() {
        let client = SkyweaveClient::new(&BackendConfig::default());
        assert_eq!(
            client.stream_url(DetectionMode::Trail),
            "http://127.0.0.1:5000/stream"
        );
        assert_eq!(
            client.stream_url(DetectionMode::Landslide),
            "http://127.0.0.1:5000/stream/landslide"
        );
        assert_eq!(
            client.stream_url(DetectionMode::Combined),
            "http://127.0.0.1:5000/stream/combined"
        );
    }
}
