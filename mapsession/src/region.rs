//! Viewport transforms for zooming, recentering and search results.
//!
//! Every transform is a pure function of its input. There is no minimum or
//! maximum zoom; the only guard is that a span never leaves the positive
//! finite range, in which case the input region is returned unchanged.

use crate::coord::{is_valid_delta, Coordinate, MapRegion};

/// Factor applied to both deltas by one zoom step.
pub const DEFAULT_ZOOM_FACTOR: f64 = 8.0;

/// Wide span used for search results and for the first location fix.
pub const DEFAULT_SEARCH_DELTA: f64 = 0.95;

/// Close span used when recentering on the user.
pub const DEFAULT_USER_DELTA: f64 = 0.009;

/// Span settings used by [`RegionController`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionSpans {
    /// Divisor/multiplier for a single zoom step.
    pub zoom_factor: f64,
    /// Delta of the "wide" view around a search result.
    pub search_delta: f64,
    /// Delta of the "close" view around the user.
    pub user_delta: f64,
}

impl Default for RegionSpans {
    fn default() -> Self {
        Self {
            zoom_factor: DEFAULT_ZOOM_FACTOR,
            search_delta: DEFAULT_SEARCH_DELTA,
            user_delta: DEFAULT_USER_DELTA,
        }
    }
}

/// Derives new viewports from the current one.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionController {
    spans: RegionSpans,
}

impl RegionController {
    /// Creates a controller with custom spans.
    ///
    /// Any unusable span (non-positive, non-finite, or a zoom factor not
    /// greater than 1) falls back to its default.
    pub fn new(spans: RegionSpans) -> Self {
        let defaults = RegionSpans::default();
        let pick = |value: f64, fallback: f64| {
            if is_valid_delta(value) {
                value
            } else {
                fallback
            }
        };

        Self {
            spans: RegionSpans {
                zoom_factor: if spans.zoom_factor.is_finite() && spans.zoom_factor > 1.0 {
                    spans.zoom_factor
                } else {
                    defaults.zoom_factor
                },
                search_delta: pick(spans.search_delta, defaults.search_delta),
                user_delta: pick(spans.user_delta, defaults.user_delta),
            },
        }
    }

    pub fn spans(&self) -> RegionSpans {
        self.spans
    }

    /// Shrinks both spans by the zoom factor.
    pub fn zoom_in(&self, region: &MapRegion) -> MapRegion {
        self.rescale(
            region,
            region.latitude_delta() / self.spans.zoom_factor,
            region.longitude_delta() / self.spans.zoom_factor,
        )
    }

    /// Grows both spans by the zoom factor.
    pub fn zoom_out(&self, region: &MapRegion) -> MapRegion {
        self.rescale(
            region,
            region.latitude_delta() * self.spans.zoom_factor,
            region.longitude_delta() * self.spans.zoom_factor,
        )
    }

    /// Close view centered on the user.
    pub fn recenter_on_user(&self, user_location: Coordinate) -> MapRegion {
        self.centered(user_location, self.spans.user_delta)
    }

    /// Wide view centered on a search result, so nearby context is visible.
    pub fn region_for_search_result(&self, coordinate: Coordinate) -> MapRegion {
        self.centered(coordinate, self.spans.search_delta)
    }

    /// Region seeded from the first location fix.
    ///
    /// Same span as a search result.
    pub fn initial_region(&self, fix: Coordinate) -> MapRegion {
        self.centered(fix, self.spans.search_delta)
    }

    fn rescale(&self, region: &MapRegion, latitude_delta: f64, longitude_delta: f64) -> MapRegion {
        MapRegion::new(region.center(), latitude_delta, longitude_delta).unwrap_or(*region)
    }

    fn centered(&self, center: Coordinate, delta: f64) -> MapRegion {
        MapRegion::from_valid_span(center, delta)
    }
}
