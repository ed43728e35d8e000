//! Free-text place search.
//!
//! # URL Pattern
//!
//! `{base}/geocode/search?text={query}` with the API key in the
//! `Authorization` header. Only the first (most relevant) feature is used.

use std::future::Future;

use reqwest::Url;
use tracing::debug;

use super::feature::FeatureCollection;
use super::http::AsyncHttpClient;
use super::types::{GeocodeError, Place, PlaceError, ServiceEndpoint};

/// Path of the search endpoint relative to the service base URL.
const SEARCH_PATH: &str = "geocode/search";

/// Trait for resolving a search string to a place.
pub trait GeocodeClient: Send + Sync {
    /// Resolves `query` to the best-ranked place.
    ///
    /// The caller filters out empty queries. No retries are attempted.
    fn search(&self, query: &str) -> impl Future<Output = Result<Place, GeocodeError>> + Send;
}

/// Geocoder for an openrouteservice-compatible API.
pub struct OrsGeocodeClient<C: AsyncHttpClient> {
    http_client: C,
    endpoint: ServiceEndpoint,
}

impl<C: AsyncHttpClient> OrsGeocodeClient<C> {
    /// Creates a new geocoder.
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client for making requests
    /// * `endpoint` - Service base URL and API key
    pub fn new(http_client: C, endpoint: ServiceEndpoint) -> Self {
        Self {
            http_client,
            endpoint,
        }
    }

    /// Builds the search URL, percent-encoding the query.
    fn build_url(&self, query: &str) -> Result<Url, PlaceError> {
        Url::parse_with_params(&self.endpoint.url_for(SEARCH_PATH), &[("text", query)])
            .map_err(|e| PlaceError::Service(format!("invalid geocoding URL: {}", e)))
    }
}

impl<C: AsyncHttpClient> GeocodeClient for OrsGeocodeClient<C> {
    async fn search(&self, query: &str) -> Result<Place, GeocodeError> {
        let url = self.build_url(query)?;
        let headers: Vec<(&str, &str)> = self.endpoint.auth_header().into_iter().collect();

        let body = self
            .http_client
            .get_with_headers(url.as_str(), &headers)
            .await?;
        let collection = FeatureCollection::from_slice(&body)?;

        debug!(
            query = query,
            results = collection.features.len(),
            "Geocoding response decoded"
        );

        collection
            .features
            .into_iter()
            .next()
            .ok_or(PlaceError::NoResults)?
            .into_place()
    }
}
