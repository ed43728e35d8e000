//! Place services: geocoding and nearby points of interest.
//!
//! Both services are consumed over HTTP through the [`AsyncHttpClient`]
//! abstraction and answer with GeoJSON feature collections.
//!
//! ```ignore
//! use mapsession::places::{AsyncReqwestClient, OrsGeocodeClient, GeocodeClient, ServiceEndpoint};
//!
//! let http = AsyncReqwestClient::new()?;
//! let endpoint = ServiceEndpoint::new("https://api.openrouteservice.org", Some(key));
//! let geocoder = OrsGeocodeClient::new(http, endpoint);
//! let place = geocoder.search("Brandenburg Gate").await?;
//! ```

mod feature;
mod geocode;
mod http;
mod nearby;
mod types;

pub use geocode::{GeocodeClient, OrsGeocodeClient};
pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use nearby::{
    NearbyPlacesClient, OrsNearbyClient, DEFAULT_NEARBY_LIMIT, DEFAULT_NEARBY_RADIUS_METERS,
};
pub use types::{
    GeocodeError, NearbyError, NearbyPlace, Place, PlaceError, ServiceEndpoint, UNNAMED_PLACE,
};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
