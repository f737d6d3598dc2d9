//! Page screenshots from a remote capture service.

use shotframe_common::config::CaptureConfig;
use shotframe_common::error::{ShotframeError, ShotframeResult};
use shotframe_editor_model::SourceImage;

use crate::source::{decode_image, ImageSource};

const API_KEY_HEADER: &str = "X-RapidAPI-Key";
const API_HOST_HEADER: &str = "X-RapidAPI-Host";

/// Asks the configured capture endpoint to screenshot `target_url`.
#[derive(Debug, Clone)]
pub struct RemoteCapture {
    config: CaptureConfig,
    target_url: String,
    client: reqwest::Client,
}

impl RemoteCapture {
    pub fn new(config: CaptureConfig, target_url: impl Into<String>) -> Self {
        Self {
            config,
            target_url: target_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Use a preconfigured HTTP client (proxies, timeouts, TLS roots).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    /// Build the GET request without sending it.
    pub fn request(&self) -> ShotframeResult<reqwest::Request> {
        if self.config.endpoint.trim().is_empty() {
            return Err(ShotframeError::config(
                "remote capture endpoint is not configured (set capture.endpoint)",
            ));
        }

        let mut builder = self
            .client
            .get(self.config.endpoint.trim())
            .query(&[(self.config.url_param.as_str(), self.target_url.as_str())]);
        if !self.config.api_key.is_empty() {
            builder = builder.header(API_KEY_HEADER, &self.config.api_key);
        }
        if !self.config.api_host.is_empty() {
            builder = builder.header(API_HOST_HEADER, &self.config.api_host);
        }

        builder
            .build()
            .map_err(|e| ShotframeError::config(format!("invalid capture request: {e}")))
    }
}

#[async_trait::async_trait]
impl ImageSource for RemoteCapture {
    async fn fetch(&self) -> ShotframeResult<SourceImage> {
        let request = self.request()?;
        tracing::info!(target_url = %self.target_url, endpoint = %request.url(), "Requesting capture");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| ShotframeError::fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, target_url = %self.target_url, "Capture service refused");
            return Err(ShotframeError::fetch(format!(
                "capture service returned {status}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ShotframeError::fetch(format!("reading capture body: {e}")))?;
        decode_image(&bytes)
    }

    fn describe(&self) -> String {
        format!("capture of {}", self.target_url)
    }
}
