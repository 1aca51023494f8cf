//! Nominatim / OpenStreetMap geocoder client.
//!
//! The public instance allows roughly one request per second and requires
//! an identifying `User-Agent`.  [`Geocoder`] enforces a minimum interval
//! between its own requests (1.5 s by default) so callers never need to
//! sleep themselves; concurrent callers are serialized.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

use std::sync::Mutex;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use reqwest::StatusCode;

use nse_core::{BBox, GeoPoint};

use crate::{SpatialError, SpatialResult};

/// Connection settings for [`Geocoder`].
#[derive(Clone, Debug)]
pub struct GeocodeConfig {
    pub base_url:     String,
    pub user_agent:   String,
    /// Minimum gap between consecutive requests.
    pub min_interval: Duration,
    pub timeout:      Duration,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            base_url:     "https://nominatim.openstreetmap.org/search".to_string(),
            user_agent:   concat!("rust_nse/", env!("CARGO_PKG_VERSION")).to_string(),
            min_interval: Duration::from_millis(1_500),
            timeout:      Duration::from_secs(10),
        }
    }
}

/// A resolved place.
#[derive(Clone, Debug, PartialEq)]
pub struct GeocodedPlace {
    /// The query string as given.
    pub query:        String,
    pub bbox:         BBox,
    pub center:       GeoPoint,
    pub display_name: String,
}

/// Blocking, self-throttling Nominatim client.
pub struct Geocoder {
    client:       Client,
    config:       GeocodeConfig,
    last_request: Mutex<Option<Instant>>,
}

impl Geocoder {
    pub fn new(config: GeocodeConfig) -> SpatialResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config, last_request: Mutex::new(None) })
    }

    /// Resolve `place` to its bounding box.
    ///
    /// # Errors
    ///
    /// [`SpatialError::PlaceNotFound`] when Nominatim has no match; HTTP and
    /// parse errors otherwise.
    pub fn geocode(&self, place: &str) -> SpatialResult<GeocodedPlace> {
        self.throttle();
        log::debug!("geocoding {place:?}");

        let resp = self
            .client
            .get(&self.config.base_url)
            .query(&[("q", place), ("format", "json"), ("limit", "1")])
            .send()?;

        if resp.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(SpatialError::RateLimited("Nominatim"));
        }
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().unwrap_or_default();
            return Err(SpatialError::Status { status, body });
        }

        let body: serde_json::Value = resp.json()?;
        parse_response(place, &body)?.ok_or_else(|| SpatialError::PlaceNotFound(place.to_string()))
    }

    /// Block until `min_interval` has passed since the previous request.
    /// The lock is held while sleeping so that concurrent callers queue up.
    fn throttle(&self) {
        let mut last = self.last_request.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.config.min_interval {
                std::thread::sleep(self.config.min_interval - elapsed);
            }
        }
        *last = Some(Instant::now());
    }
}

/// Parse a Nominatim `format=json` search response.
///
/// `boundingbox` is `[south, north, west, east]` as strings.  Returns
/// `Ok(None)` for an empty result list.
pub fn parse_response(
    query: &str,
    body: &serde_json::Value,
) -> SpatialResult<Option<GeocodedPlace>> {
    let results = body
        .as_array()
        .ok_or_else(|| SpatialError::Parse("Nominatim response is not an array".to_string()))?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let num = |v: &serde_json::Value, what: &str| -> SpatialResult<f64> {
        v.as_str()
            .and_then(|s| s.parse::<f64>().ok())
            .or_else(|| v.as_f64())
            .ok_or_else(|| SpatialError::Parse(format!("missing {what} in Nominatim response")))
    };

    let bb = first["boundingbox"]
        .as_array()
        .filter(|a| a.len() == 4)
        .ok_or_else(|| SpatialError::Parse("missing boundingbox in Nominatim response".to_string()))?;

    let bbox = BBox::new(
        num(&bb[0], "south")?,
        num(&bb[1], "north")?,
        num(&bb[2], "west")?,
        num(&bb[3], "east")?,
    )?;
    let center = GeoPoint::new(num(&first["lat"], "lat")?, num(&first["lon"], "lon")?);
    let display_name = first["display_name"].as_str().unwrap_or(query).to_string();

    Ok(Some(GeocodedPlace { query: query.to_string(), bbox, center, display_name }))
}
