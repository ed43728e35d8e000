//! Geographic coordinate and viewport types.
//!
//! Everything inside the crate uses latitude-first [`Coordinate`]s. The
//! [`MapRegion`] describes what the map widget shows: a center plus the
//! angular span on each axis.

mod types;

pub use types::{Coordinate, CoordError, MapRegion, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

pub(crate) use types::is_valid_delta;
