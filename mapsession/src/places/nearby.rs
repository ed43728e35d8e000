//! Points of interest around a coordinate.
//!
//! # URL Pattern
//!
//! `{base}/pois?request=pois&geojson={point}&buffer={meters}&limit={n}`
//!
//! The point geometry is GeoJSON, so its coordinates are `[lon, lat]`.

use std::future::Future;

use reqwest::Url;
use tracing::debug;

use super::feature::FeatureCollection;
use super::http::AsyncHttpClient;
use super::types::{NearbyError, NearbyPlace, PlaceError, ServiceEndpoint};
use crate::coord::Coordinate;

/// Path of the POI endpoint relative to the service base URL.
const POIS_PATH: &str = "pois";

/// Default search radius around a resolved place.
pub const DEFAULT_NEARBY_RADIUS_METERS: f64 = 1000.0;

/// Default number of nearby places shown.
pub const DEFAULT_NEARBY_LIMIT: usize = 5;

/// Trait for fetching points of interest around a coordinate.
pub trait NearbyPlacesClient: Send + Sync {
    /// Fetches at most `limit` places within `radius_meters` of `center`,
    /// in the order the service ranked them.
    fn fetch_nearby(
        &self,
        center: Coordinate,
        radius_meters: f64,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<NearbyPlace>, NearbyError>> + Send;
}

/// POI client for an openrouteservice-compatible API.
pub struct OrsNearbyClient<C: AsyncHttpClient> {
    http_client: C,
    endpoint: ServiceEndpoint,
}

impl<C: AsyncHttpClient> OrsNearbyClient<C> {
    pub fn new(http_client: C, endpoint: ServiceEndpoint) -> Self {
        Self {
            http_client,
            endpoint,
        }
    }

    fn build_url(&self, center: Coordinate, radius_meters: f64, limit: usize) -> Result<Url, PlaceError> {
        let point = serde_json::json!({
            "type": "Point",
            "coordinates": [center.longitude(), center.latitude()],
        })
        .to_string();

        Url::parse_with_params(
            &self.endpoint.url_for(POIS_PATH),
            &[
                ("request", "pois".to_string()),
                ("geojson", point),
                ("buffer", radius_meters.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .map_err(|e| PlaceError::Service(format!("invalid POI URL: {}", e)))
    }
}

impl<C: AsyncHttpClient> NearbyPlacesClient for OrsNearbyClient<C> {
    async fn fetch_nearby(
        &self,
        center: Coordinate,
        radius_meters: f64,
        limit: usize,
    ) -> Result<Vec<NearbyPlace>, NearbyError> {
        let url = self.build_url(center, radius_meters, limit)?;
        let headers: Vec<(&str, &str)> = self.endpoint.auth_header().into_iter().collect();

        let body = self
            .http_client
            .get_with_headers(url.as_str(), &headers)
            .await?;
        let collection = FeatureCollection::from_slice(&body)?;
        let returned = collection.features.len();

        // Features without a usable point are skipped; order is kept.
        let places: Vec<NearbyPlace> = collection
            .features
            .into_iter()
            .filter_map(|feature| match feature.into_place() {
                Ok(place) => Some(place),
                Err(e) => {
                    debug!(error = %e, "Skipping unusable POI feature");
                    None
                }
            })
            .take(limit)
            .collect();

        debug!(
            center = %center,
            returned,
            kept = places.len(),
            limit,
            "Nearby places decoded"
        );

        Ok(places)
    }
}
