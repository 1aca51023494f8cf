//! Street-level imagery provider seam and the Street View Static API client.

use std::time::Duration;

use reqwest::blocking::Client;

use nse_core::GeoPoint;

use crate::{ImageryError, ImageryResult};

/// A source of street-level photographs.
///
/// `has_imagery` is the cheap (unbilled) availability check; `fetch_image`
/// returns the encoded image bytes.  Both are called from worker threads.
pub trait ImageryProvider: Send + Sync {
    fn has_imagery(&self, at: GeoPoint) -> ImageryResult<bool>;

    fn fetch_image(&self, at: GeoPoint) -> ImageryResult<Vec<u8>>;
}

/// Camera and request settings for [`StreetViewClient`].
#[derive(Clone, Debug)]
pub struct StreetViewConfig {
    pub base_url:         String,
    pub width:            u32,
    pub height:           u32,
    /// Horizontal field of view, degrees.
    pub fov:              u32,
    pub heading:          u32,
    pub pitch:            i32,
    pub metadata_timeout: Duration,
    pub image_timeout:    Duration,
}

impl Default for StreetViewConfig {
    fn default() -> Self {
        Self {
            base_url:         "https://maps.googleapis.com/maps/api/streetview".to_string(),
            width:            640,
            height:           640,
            fov:              90,
            heading:          0,
            pitch:            0,
            metadata_timeout: Duration::from_secs(10),
            image_timeout:    Duration::from_secs(15),
        }
    }
}

pub struct StreetViewClient {
    client:  Client,
    api_key: String,
    config:  StreetViewConfig,
}

impl StreetViewClient {
    /// # Errors
    ///
    /// [`ImageryError::MissingKey`] for an empty or blank key.
    pub fn new(api_key: impl Into<String>, config: StreetViewConfig) -> ImageryResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ImageryError::MissingKey);
        }
        let client = Client::builder().build()?;
        Ok(Self { client, api_key, config })
    }

    fn location(at: GeoPoint) -> String {
        format!("{},{}", at.lat, at.lon)
    }
}

impl ImageryProvider for StreetViewClient {
    fn has_imagery(&self, at: GeoPoint) -> ImageryResult<bool> {
        let resp = self
            .client
            .get(format!("{}/metadata", self.config.base_url))
            .query(&[("location", Self::location(at).as_str()), ("key", self.api_key.as_str())])
            .timeout(self.config.metadata_timeout)
            .send()?;
        let body: serde_json::Value = resp.json()?;
        Ok(metadata_available(&body))
    }

    fn fetch_image(&self, at: GeoPoint) -> ImageryResult<Vec<u8>> {
        let size = format!("{}x{}", self.config.width, self.config.height);
        let resp = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("size", size),
                ("location", Self::location(at)),
                ("fov", self.config.fov.to_string()),
                ("pitch", self.config.pitch.to_string()),
                ("heading", self.config.heading.to_string()),
                ("key", self.api_key.clone()),
            ])
            .timeout(self.config.image_timeout)
            .send()?;

        if !resp.status().is_success() {
            return Err(ImageryError::Status(resp.status().as_u16()));
        }
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.is_empty() && !content_type.starts_with("image/") {
            return Err(ImageryError::NotImage(content_type));
        }
        Ok(resp.bytes()?.to_vec())
    }
}

/// `true` when a metadata response reports `"status": "OK"`.
///
/// Every other status (`ZERO_RESULTS`, `NOT_FOUND`, `REQUEST_DENIED`, ...)
/// means no image will be served for the location.
pub fn metadata_available(body: &serde_json::Value) -> bool {
    body["status"].as_str() == Some("OK")
}
