//! Coordinate lookup for a (partial) location.
//!
//! [`GeoService`] builds an ordered list of query variants from the
//! available fields and asks a [`Geocoder`] for each in turn; the first hit
//! wins. [`NominatimGeocoder`] is the OpenStreetMap backend.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use wayfinder_config::GeocodingConfig;
use wayfinder_core::error::ToolError;

/// A resolved coordinate pair, kept as the backend's decimal strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    pub lat: String,
    pub lon: String,
    pub display_name: Option<String>,
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.lat, self.lon)
    }
}

/// A single-query geocoding backend.
#[async_trait]
pub trait Geocoder: Send + Sync {
    fn name(&self) -> &str;

    /// Look up one free-text query. `Ok(None)` means the backend had no match.
    async fn lookup(&self, query: &str) -> Result<Option<Coordinates>, ToolError>;
}

/// Result of resolving a location to coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeoOutcome {
    Found(Coordinates),
    NotFound,
    NoLocationData,
    /// Every attempted query errored; holds the last error.
    Failed(String),
}

impl std::fmt::Display for GeoOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Found(coords) => write!(f, "{coords}"),
            Self::NotFound => f.write_str("Not found"),
            Self::NoLocationData => f.write_str("No location data to geocode"),
            Self::Failed(reason) => write!(f, "Error getting coordinates: {reason}"),
        }
    }
}

/// Words dropped when building the cleaned-name variant.
const GENERIC_LANDMARK_WORDS: &[&str] = &[
    "temple", "shrine", "church", "cathedral", "mosque", "pagoda", "monastery", "museum",
    "monument", "palace", "ancient", "old",
];

/// Ordered query variants for the given fields.
pub fn query_variants(name: Option<&str>, city: Option<&str>, country: Option<&str>) -> Vec<String> {
    fn present(v: Option<&str>) -> Option<&str> {
        v.map(str::trim).filter(|s| !s.is_empty())
    }
    let (name, city, country) = (present(name), present(city), present(country));

    let mut variants = Vec::new();

    if let (Some(name), Some(city), Some(country)) = (name, city, country) {
        variants.push(format!("{name}, {city}, {country}"));
    }

    if let (Some(city), Some(country)) = (city, country) {
        variants.push(format!("{city}, {country}"));
    }

    if let (Some(name), Some(city), Some(country)) = (name, city, country) {
        let cleaned = clean_name(name);
        if !cleaned.is_empty() && cleaned != name {
            variants.push(format!("{cleaned}, {city}, {country}"));
        }
    }

    if let Some(country) = country {
        if variants.len() < 3 {
            variants.push(country.to_string());
        }
    }

    if variants.is_empty() {
        let parts: Vec<&str> = [name, city, country].into_iter().flatten().collect();
        if !parts.is_empty() {
            variants.push(parts.join(", "));
        }
    }

    variants
}

fn clean_name(name: &str) -> String {
    name.split_whitespace()
        .filter(|w| {
            !GENERIC_LANDMARK_WORDS
                .iter()
                .any(|g| g.eq_ignore_ascii_case(w))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves locations through a [`Geocoder`], trying variants in order.
#[derive(Clone)]
pub struct GeoService {
    geocoder: Arc<dyn Geocoder>,
}

impl GeoService {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self { geocoder }
    }

    pub async fn locate(
        &self,
        name: Option<&str>,
        city: Option<&str>,
        country: Option<&str>,
    ) -> GeoOutcome {
        let variants = query_variants(name, city, country);
        if variants.is_empty() {
            return GeoOutcome::NoLocationData;
        }

        let total = variants.len();
        let mut last_error = None;
        let mut any_answered = false;

        for (i, query) in variants.iter().enumerate() {
            info!(backend = self.geocoder.name(), attempt = i + 1, total, query = %query, "Geocoding");
            match self.geocoder.lookup(query).await {
                Ok(Some(coords)) => {
                    debug!(coords = %coords, place = ?coords.display_name, "Geocoding hit");
                    return GeoOutcome::Found(coords);
                }
                Ok(None) => {
                    any_answered = true;
                    debug!(query = %query, "No geocoding results");
                }
                Err(e) => {
                    warn!(query = %query, error = %e, "Geocoding query failed");
                    last_error = Some(e.to_string());
                }
            }
        }

        match last_error {
            Some(reason) if !any_answered => GeoOutcome::Failed(reason),
            _ => GeoOutcome::NotFound,
        }
    }
}

impl std::fmt::Debug for GeoService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoService")
            .field("geocoder", &self.geocoder.name())
            .finish()
    }
}

/// OpenStreetMap Nominatim search backend.
pub struct NominatimGeocoder {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocodingConfig) -> Result<Self, ToolError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ToolError::Network(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            client,
        })
    }

    fn first_place(places: Vec<NominatimPlace>) -> Option<Coordinates> {
        places.into_iter().next().map(|p| Coordinates {
            lat: p.lat,
            lon: p.lon,
            display_name: p.display_name,
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    fn name(&self) -> &str {
        "nominatim"
    }

    async fn lookup(&self, query: &str) -> Result<Option<Coordinates>, ToolError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| ToolError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::ExecutionFailed {
                tool_name: "nominatim".into(),
                reason: format!("HTTP {status}"),
            });
        }

        let places: Vec<NominatimPlace> =
            response
                .json()
                .await
                .map_err(|e| ToolError::InvalidResponse {
                    service: "nominatim".into(),
                    reason: e.to_string(),
                })?;

        Ok(Self::first_place(places))
    }
}
