use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::models::Coordinate;

pub const DEFAULT_PHOTON_URL: &str = "https://photon.komoot.io/api";

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("geocoding service returned {0}")]
    Status(StatusCode),
}

/// Remote free-text geocoding service
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// First match for `query`, or `None` when the service found nothing
    async fn search(&self, query: &str) -> Result<Option<Coordinate>, GeocodeError>;

    /// Get the name of the geocoding service
    fn provider_name(&self) -> &'static str;
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// GeoJSON order: `[lng, lat]`
    coordinates: Vec<f64>,
}

impl FeatureCollection {
    fn first_coordinate(&self) -> Option<Coordinate> {
        let coords = &self.features.first()?.geometry.coordinates;
        match coords.as_slice() {
            [lng, lat, ..] if lat.is_finite() && lng.is_finite() => Some(Coordinate::new(*lat, *lng)),
            _ => None,
        }
    }
}

/// Photon (OpenStreetMap) geocoder
pub struct PhotonGeocoder {
    client: Client,
    base_url: String,
}

impl PhotonGeocoder {
    pub fn new(base_url: impl Into<String>, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl GeocodingProvider for PhotonGeocoder {
    async fn search(&self, query: &str) -> Result<Option<Coordinate>, GeocodeError> {
        debug!("Geocoding query: {}", query);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", query), ("limit", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status()));
        }

        let body: FeatureCollection = response.json().await?;
        Ok(body.first_coordinate())
    }

    fn provider_name(&self) -> &'static str {
        "Photon"
    }
}
