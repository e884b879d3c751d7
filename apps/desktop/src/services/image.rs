//! Illustration generation over HTTP.

use super::{BoxFuture, ServiceError};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Produces an illustration for a prompt, returned as a data URL.
pub trait ImageGenerator: Send + Sync {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, ServiceError>>;
}

/// Generator used when no image endpoint is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledImageGenerator;

impl ImageGenerator for DisabledImageGenerator {
    fn generate<'a>(&'a self, _prompt: &'a str) -> BoxFuture<'a, Result<String, ServiceError>> {
        Box::pin(async {
            Err(ServiceError::Unavailable(
                "image generation is not configured".to_string(),
            ))
        })
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    image: String,
    #[serde(default)]
    mime_type: Option<String>,
}

/// Client for a JSON image-generation endpoint.
///
/// Posts `{"prompt": ...}` and expects `{"image": ..., "mime_type"?: ...}` back,
/// where `image` is either a data URL or bare base64.
#[derive(Debug, Clone)]
pub struct HttpImageGenerator {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpImageGenerator {
    pub fn new(endpoint: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    async fn request(&self, prompt: &str) -> Result<String, ServiceError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&GenerateRequest { prompt });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(ServiceError::Backend { status, message });
        }

        let body: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;

        to_data_url(&body.image, body.mime_type.as_deref())
    }
}

impl ImageGenerator for HttpImageGenerator {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, ServiceError>> {
        Box::pin(self.request(prompt))
    }
}

/// Normalize an image payload into a data URL.
pub fn to_data_url(image: &str, mime_type: Option<&str>) -> Result<String, ServiceError> {
    let image = image.trim();
    if image.is_empty() {
        return Err(ServiceError::Parse("empty image payload".to_string()));
    }
    if image.starts_with("data:") {
        return Ok(image.to_string());
    }
    Ok(format!(
        "data:{};base64,{}",
        mime_type.unwrap_or("image/png"),
        image
    ))
}
