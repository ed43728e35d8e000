//! The map screen's coordinator.
//!
//! `MapSessionController` owns the [`SessionState`] and is driven from a
//! single task. User intents are plain method calls that mutate state
//! synchronously. Network work (geocoding, nearby fetches) runs in spawned
//! tasks whose results come back as completions, applied in arrival order
//! by [`MapSessionController::next_event`] together with location fixes.
//!
//! Overlapping searches are neither queued nor cancelled. Whichever
//! completion arrives last decides the region.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::error::SessionError;
use super::event::SessionEvent;
use super::scene::MapScene;
use super::state::{MapType, SessionState, SELECTED_LOCATION_LABEL};
use crate::config::SessionConfig;
use crate::coord::Coordinate;
use crate::location::{DeviceLocation, LocationTracker, Subscription};
use crate::places::{
    AsyncReqwestClient, GeocodeClient, GeocodeError, NearbyError, NearbyPlace, NearbyPlacesClient,
    OrsGeocodeClient, OrsNearbyClient, Place, PlaceError,
};
use crate::region::RegionController;

/// Controller wired to the HTTP place services.
pub type ServiceSessionController<D> = MapSessionController<
    OrsGeocodeClient<AsyncReqwestClient>,
    OrsNearbyClient<AsyncReqwestClient>,
    D,
>;

/// Result of a spawned service call.
#[derive(Debug)]
enum Completion {
    Geocoded {
        query: String,
        result: Result<Place, GeocodeError>,
    },
    NearbyFetched {
        center: Coordinate,
        result: Result<Vec<NearbyPlace>, NearbyError>,
    },
}

/// Posts exactly one completion for a spawned task.
///
/// If the task ends without delivering (a panicking client, or
/// cancellation) the fallback is posted from `Drop`, so `in_flight` always
/// comes back down.
struct CompletionGuard {
    tx: mpsc::UnboundedSender<Completion>,
    fallback: Option<Completion>,
}

impl CompletionGuard {
    fn new(tx: mpsc::UnboundedSender<Completion>, fallback: Completion) -> Self {
        Self {
            tx,
            fallback: Some(fallback),
        }
    }

    fn deliver(mut self, done: Completion) {
        self.fallback = None;
        let _ = self.tx.send(done);
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if let Some(fallback) = self.fallback.take() {
            let _ = self.tx.send(fallback);
        }
    }
}

/// What woke [`MapSessionController::next_event`].
enum Wake {
    Fix(Option<Coordinate>),
    Completion(Completion),
}

/// Coordinates location, search and nearby lookups for one map screen.
pub struct MapSessionController<G, N, D>
where
    G: GeocodeClient + 'static,
    N: NearbyPlacesClient + 'static,
    D: DeviceLocation,
{
    state: SessionState,
    regions: RegionController,
    nearby_radius_meters: f64,
    nearby_limit: usize,
    geocoder: Arc<G>,
    nearby: Arc<N>,
    tracker: LocationTracker<D>,
    subscription: Option<Subscription>,
    tracking_live: bool,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
    cancellation: CancellationToken,
}

impl<D: DeviceLocation> ServiceSessionController<D> {
    /// Builds a controller that talks to the configured place service.
    pub fn with_service(config: &SessionConfig, device: D) -> Result<Self, PlaceError> {
        let http = AsyncReqwestClient::with_timeout(config.service.timeout)?;
        let endpoint = config.service.endpoint();

        Ok(Self::new(
            config,
            OrsGeocodeClient::new(http.clone(), endpoint.clone()),
            OrsNearbyClient::new(http, endpoint),
            device,
        ))
    }
}

impl<G, N, D> MapSessionController<G, N, D>
where
    G: GeocodeClient + 'static,
    N: NearbyPlacesClient + 'static,
    D: DeviceLocation,
{
    /// Creates a controller with an empty session. Call [`Self::mount`] to
    /// start location tracking.
    pub fn new(config: &SessionConfig, geocoder: G, nearby: N, device: D) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        Self {
            state: SessionState::new(config.map.map_type),
            regions: RegionController::new(config.map.spans()),
            nearby_radius_meters: config.nearby.radius_meters,
            nearby_limit: config.nearby.limit,
            geocoder: Arc::new(geocoder),
            nearby: Arc::new(nearby),
            tracker: LocationTracker::new(device),
            subscription: None,
            tracking_live: false,
            completions_tx,
            completions_rx,
            in_flight: 0,
            cancellation: CancellationToken::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Requests location permission and starts tracking.
    ///
    /// A denied permission is returned for the caller to alert on; the
    /// session stays usable for searching.
    pub async fn mount(&mut self) -> Result<(), SessionError> {
        let subscription = self.tracker.start().await?;
        self.subscription = Some(subscription);
        self.tracking_live = true;
        info!("Map session mounted");
        Ok(())
    }

    /// Releases the location subscription and abandons in-flight requests.
    pub fn unmount(mut self) {
        self.cancellation.cancel();
        if let Some(subscription) = self.subscription.take() {
            self.tracker.stop(subscription);
        }
        info!(abandoned = self.in_flight, "Map session unmounted");
    }

    /// Waits for the next location fix or service completion and applies it.
    ///
    /// Returns `None` once there is nothing left to wait for: tracking is
    /// not running and no request is in flight.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        let wake = tokio::select! {
            fix = next_fix(&mut self.subscription), if self.tracking_live => Wake::Fix(fix),
            Some(done) = self.completions_rx.recv(), if self.in_flight > 0 => Wake::Completion(done),
            else => return None,
        };

        let event = match wake {
            Wake::Fix(Some(location)) => {
                let region_initialized = self.on_location_update(location);
                SessionEvent::LocationUpdated {
                    location,
                    region_initialized,
                }
            }
            Wake::Fix(None) => {
                self.tracking_live = false;
                warn!("Position stream ended");
                SessionEvent::TrackingEnded
            }
            Wake::Completion(done) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.apply(done)
            }
        };

        Some(event)
    }

    // -------------------------------------------------------------------------
    // Intents
    // -------------------------------------------------------------------------

    /// Applies a location fix.
    ///
    /// The first fix seeds the region when none exists; later fixes only
    /// move the user location. Returns true if the region was seeded.
    pub fn on_location_update(&mut self, location: Coordinate) -> bool {
        self.state.user_location = Some(location);

        if self.state.region.is_some() {
            return false;
        }

        self.state.region = Some(self.regions.initial_region(location));
        debug!(location = %location, "Region initialized from first fix");
        true
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.state.search_text = text.into();
    }

    /// Starts geocoding the current search text.
    ///
    /// Empty text is a no-op; anything else is sent as typed. Returns true
    /// if a request was issued.
    pub fn submit_search(&mut self) -> bool {
        if self.state.search_text.is_empty() {
            return false;
        }
        let query = self.state.search_text.clone();

        info!(query = %query, "Submitting search");

        let geocoder = Arc::clone(&self.geocoder);
        let guard = CompletionGuard::new(
            self.completions_tx.clone(),
            Completion::Geocoded {
                query: query.clone(),
                result: Err(PlaceError::Service("search task ended early".into())),
            },
        );
        let cancellation = self.cancellation.clone();
        self.in_flight += 1;

        tokio::spawn(async move {
            let result = tokio::select! {
                _ = cancellation.cancelled() => return,
                result = geocoder.search(&query) => result,
            };
            guard.deliver(Completion::Geocoded { query, result });
        });

        true
    }

    /// Sets the search text and submits it.
    pub fn search_for(&mut self, text: impl Into<String>) -> bool {
        self.set_search_text(text);
        self.submit_search()
    }

    pub fn clear_search(&mut self) {
        self.state.search_text.clear();
    }

    /// Returns false when there is no region to zoom.
    pub fn zoom_in(&mut self) -> bool {
        match self.state.region {
            Some(region) => {
                self.state.region = Some(self.regions.zoom_in(&region));
                true
            }
            None => false,
        }
    }

    /// Returns false when there is no region to zoom.
    pub fn zoom_out(&mut self) -> bool {
        match self.state.region {
            Some(region) => {
                self.state.region = Some(self.regions.zoom_out(&region));
                true
            }
            None => false,
        }
    }

    /// Close view on the user. Returns false before the first fix.
    pub fn recenter_on_user(&mut self) -> bool {
        match self.state.user_location {
            Some(user) => {
                self.state.region = Some(self.regions.recenter_on_user(user));
                true
            }
            None => false,
        }
    }

    /// Opens the detail panel for the marker at the region center.
    ///
    /// The marker only exists while there is a region.
    pub fn marker_tapped(&mut self) -> bool {
        let Some(region) = self.state.region else {
            return false;
        };

        self.state.selected_place = Some(Place::new(SELECTED_LOCATION_LABEL, region.center()));
        self.state.place_detail_visible = true;
        true
    }

    pub fn dismiss_place_detail(&mut self) {
        self.state.place_detail_visible = false;
    }

    pub fn set_map_type(&mut self, map_type: MapType) {
        self.state.map_type = map_type;
    }

    /// Opens the detail panel for the nearby place at `index`.
    ///
    /// Out-of-range indices are ignored.
    pub fn select_nearby(&mut self, index: usize) -> bool {
        let Some(place) = self.state.nearby_places.get(index).cloned() else {
            return false;
        };

        self.state.selected_place = Some(place);
        self.state.place_detail_visible = true;
        true
    }

    // -------------------------------------------------------------------------
    // Views
    // -------------------------------------------------------------------------

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Render snapshot for the map widget.
    pub fn scene(&self) -> MapScene {
        MapScene::from_state(&self.state, self.nearby_radius_meters)
    }

    /// Number of service requests whose completion has not been applied.
    pub fn pending_requests(&self) -> usize {
        self.in_flight
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking_live
    }

    // -------------------------------------------------------------------------
    // Completions
    // -------------------------------------------------------------------------

    fn apply(&mut self, done: Completion) -> SessionEvent {
        match done {
            Completion::Geocoded { query, result } => self.apply_geocoded(query, result),
            Completion::NearbyFetched { center, result } => self.apply_nearby(center, result),
        }
    }

    fn apply_geocoded(&mut self, query: String, result: Result<Place, GeocodeError>) -> SessionEvent {
        match result {
            Ok(place) => {
                let location = place.location();
                info!(query = %query, label = place.label(), location = %location, "Search resolved");

                self.state.region = Some(self.regions.region_for_search_result(location));
                self.state.selected_place = Some(place.clone());
                self.state.searched_place = Some(place.clone());
                self.state.place_detail_visible = true;

                self.spawn_nearby_fetch(location);
                SessionEvent::SearchResolved(place)
            }
            Err(PlaceError::NoResults) => {
                debug!(query = %query, "Search returned no results");
                SessionEvent::SearchNoResults { query }
            }
            Err(e) => {
                warn!(query = %query, error = %e, "Search failed");
                SessionEvent::SearchFailed(e.into())
            }
        }
    }

    fn apply_nearby(
        &mut self,
        center: Coordinate,
        result: Result<Vec<NearbyPlace>, NearbyError>,
    ) -> SessionEvent {
        match result {
            Ok(mut places) => {
                places.truncate(self.nearby_limit);
                debug!(center = %center, count = places.len(), "Nearby places updated");
                let count = places.len();
                self.state.nearby_places = places;
                SessionEvent::NearbyUpdated { count }
            }
            Err(e) => {
                warn!(center = %center, error = %e, "Nearby fetch failed, clearing list");
                self.state.nearby_places.clear();
                SessionEvent::NearbyCleared
            }
        }
    }

    fn spawn_nearby_fetch(&mut self, center: Coordinate) {
        let nearby = Arc::clone(&self.nearby);
        let guard = CompletionGuard::new(
            self.completions_tx.clone(),
            Completion::NearbyFetched {
                center,
                result: Err(PlaceError::Service("nearby task ended early".into())),
            },
        );
        let cancellation = self.cancellation.clone();
        let radius_meters = self.nearby_radius_meters;
        let limit = self.nearby_limit;
        self.in_flight += 1;

        tokio::spawn(async move {
            let result = tokio::select! {
                _ = cancellation.cancelled() => return,
                result = nearby.fetch_nearby(center, radius_meters, limit) => result,
            };
            guard.deliver(Completion::NearbyFetched { center, result });
        });
    }
}

impl<G, N, D> Drop for MapSessionController<G, N, D>
where
    G: GeocodeClient + 'static,
    N: NearbyPlacesClient + 'static,
    D: DeviceLocation,
{
    fn drop(&mut self) {
        self.cancellation.cancel();
    }
}

/// Next fix from the subscription, or never if there is none.
async fn next_fix(subscription: &mut Option<Subscription>) -> Option<Coordinate> {
    match subscription {
        Some(subscription) => subscription.recv().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{LocationError, MockDevice};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[derive(Clone)]
    struct MockGeocoder {
        result: Result<Place, GeocodeError>,
        queries: Arc<Mutex<Vec<String>>>,
    }

    impl MockGeocoder {
        fn resolving(label: &str, lat: f64, lon: f64) -> Self {
            Self::with_result(Ok(Place::new(label, coord(lat, lon))))
        }

        fn with_result(result: Result<Place, GeocodeError>) -> Self {
            Self {
                result,
                queries: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    impl GeocodeClient for MockGeocoder {
        async fn search(&self, query: &str) -> Result<Place, GeocodeError> {
            self.queries.lock().unwrap().push(query.to_string());
            self.result.clone()
        }
    }

    #[derive(Clone)]
    struct MockNearby {
        result: Result<Vec<NearbyPlace>, NearbyError>,
        calls: Arc<Mutex<Vec<(Coordinate, f64, usize)>>>,
    }

    impl MockNearby {
        fn returning(count: usize) -> Self {
            let places = (0..count)
                .map(|i| Place::new(format!("POI {}", i), coord(40.0 + i as f64 * 0.001, -73.0)))
                .collect();
            Self::with_result(Ok(places))
        }

        fn failing() -> Self {
            Self::with_result(Err(PlaceError::Service("HTTP 500".into())))
        }

        fn with_result(result: Result<Vec<NearbyPlace>, NearbyError>) -> Self {
            Self {
                result,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn calls(&self) -> Vec<(Coordinate, f64, usize)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl NearbyPlacesClient for MockNearby {
        async fn fetch_nearby(
            &self,
            center: Coordinate,
            radius_meters: f64,
            limit: usize,
        ) -> Result<Vec<NearbyPlace>, NearbyError> {
            self.calls
                .lock()
                .unwrap()
                .push((center, radius_meters, limit));
            // Deliberately ignores `limit` so the controller's cap is exercised.
            self.result.clone()
        }
    }

    type TestController = MapSessionController<MockGeocoder, MockNearby, MockDevice>;

    fn controller(geocoder: &MockGeocoder, nearby: &MockNearby, device: &MockDevice) -> TestController {
        MapSessionController::new(
            &SessionConfig::default(),
            geocoder.clone(),
            nearby.clone(),
            device.clone(),
        )
    }

    #[tokio::test]
    async fn test_first_fix_seeds_region_once() {
        let device = MockDevice::granted();
        let mut session = controller(
            &MockGeocoder::resolving("x", 0.0, 0.0),
            &MockNearby::returning(0),
            &device,
        );
        session.mount().await.unwrap();

        device.push(51.5, -0.12).await;
        assert_eq!(
            session.next_event().await,
            Some(SessionEvent::LocationUpdated {
                location: coord(51.5, -0.12),
                region_initialized: true,
            })
        );
        let seeded = session.state().region.unwrap();
        assert_eq!(seeded.center(), coord(51.5, -0.12));
        assert_eq!(seeded.latitude_delta(), 0.95);

        device.push(48.85, 2.35).await;
        assert_eq!(
            session.next_event().await,
            Some(SessionEvent::LocationUpdated {
                location: coord(48.85, 2.35),
                region_initialized: false,
            })
        );
        assert_eq!(session.state().region, Some(seeded));
        assert_eq!(session.state().user_location, Some(coord(48.85, 2.35)));
    }

    #[tokio::test]
    async fn test_fix_after_search_keeps_search_region() {
        let geocoder = MockGeocoder::resolving("Here", 40.0, -73.0);
        let mut session = controller(&geocoder, &MockNearby::returning(0), &MockDevice::granted());

        session.search_for("here");
        session.next_event().await;

        assert!(!session.on_location_update(coord(10.0, 10.0)));
        assert_eq!(session.state().region.unwrap().center(), coord(40.0, -73.0));
    }

    #[tokio::test]
    async fn test_empty_search_is_noop() {
        let geocoder = MockGeocoder::resolving("x", 0.0, 0.0);
        let mut session = controller(&geocoder, &MockNearby::returning(0), &MockDevice::granted());
        let before = session.state().clone();

        assert!(!session.submit_search());
        session.set_search_text("coffee");
        session.clear_search();
        assert!(!session.submit_search());

        assert_eq!(session.pending_requests(), 0);
        assert!(geocoder.queries().is_empty());
        assert_eq!(session.state().region, before.region);
        assert_eq!(session.next_event().await, None);
    }

    #[tokio::test]
    async fn test_search_success_updates_state_and_fetches_nearby_once() {
        let geocoder = MockGeocoder::resolving("Somewhere, NY", 40.0, -73.0);
        let nearby = MockNearby::returning(3);
        let mut session = controller(&geocoder, &nearby, &MockDevice::granted());

        assert!(session.search_for(" somewhere "));
        let place = Place::new("Somewhere, NY", coord(40.0, -73.0));
        assert_eq!(
            session.next_event().await,
            Some(SessionEvent::SearchResolved(place.clone()))
        );

        let state = session.state();
        let region = state.region.unwrap();
        assert_eq!(region.center(), coord(40.0, -73.0));
        assert_eq!(region.latitude_delta(), 0.95);
        assert_eq!(state.selected_place, Some(place));
        assert!(state.place_detail_visible);
        assert_eq!(geocoder.queries(), vec![" somewhere ".to_string()]);

        assert_eq!(
            session.next_event().await,
            Some(SessionEvent::NearbyUpdated { count: 3 })
        );
        assert_eq!(nearby.calls(), vec![(coord(40.0, -73.0), 1000.0, 5)]);
        assert_eq!(session.state().nearby_places.len(), 3);
        assert_eq!(session.next_event().await, None);
    }

    #[tokio::test]
    async fn test_nearby_list_is_capped_at_limit() {
        let nearby = MockNearby::returning(9);
        let mut session = controller(
            &MockGeocoder::resolving("x", 40.0, -73.0),
            &nearby,
            &MockDevice::granted(),
        );

        session.search_for("x");
        session.next_event().await;
        assert_eq!(
            session.next_event().await,
            Some(SessionEvent::NearbyUpdated { count: 5 })
        );
        assert_eq!(session.state().nearby_places[0].label(), "POI 0");
        assert_eq!(session.state().nearby_places[4].label(), "POI 4");
    }

    #[tokio::test]
    async fn test_nearby_failure_clears_list_only() {
        let mut session = controller(
            &MockGeocoder::resolving("Target", 40.0, -73.0),
            &MockNearby::failing(),
            &MockDevice::granted(),
        );
        session.state.nearby_places = vec![Place::new("stale", coord(1.0, 1.0))];

        session.search_for("target");
        session.next_event().await;
        let region = session.state().region;
        let selected = session.state().selected_place.clone();

        let event = session.next_event().await.unwrap();
        assert_eq!(event, SessionEvent::NearbyCleared);
        assert!(event.alert_message().is_none());
        assert!(session.state().nearby_places.is_empty());
        assert_eq!(session.state().region, region);
        assert_eq!(session.state().selected_place, selected);
    }

    #[tokio::test]
    async fn test_search_failure_alerts_and_keeps_state() {
        let nearby = MockNearby::returning(1);
        let mut session = controller(
            &MockGeocoder::with_result(Err(PlaceError::Network("timed out".into()))),
            &nearby,
            &MockDevice::granted(),
        );
        session.on_location_update(coord(1.0, 2.0));
        let before = session.state().clone();

        session.search_for("anything");
        let event = session.next_event().await.unwrap();

        assert!(matches!(event, SessionEvent::SearchFailed(_)));
        assert_eq!(event.alert_message().as_deref(), Some("Network error: timed out"));
        assert_eq!(session.state().region, before.region);
        assert_eq!(session.state().selected_place, None);
        assert!(nearby.calls().is_empty());
    }

    #[tokio::test]
    async fn test_no_results_is_silent() {
        let mut session = controller(
            &MockGeocoder::with_result(Err(PlaceError::NoResults)),
            &MockNearby::returning(1),
            &MockDevice::granted(),
        );

        session.search_for("atlantis");
        let event = session.next_event().await.unwrap();
        assert_eq!(
            event,
            SessionEvent::SearchNoResults {
                query: "atlantis".into()
            }
        );
        assert!(event.alert_message().is_none());
        assert!(session.state().region.is_none());
    }

    #[tokio::test]
    async fn test_zoom_and_recenter_require_state() {
        let mut session = controller(
            &MockGeocoder::resolving("x", 0.0, 0.0),
            &MockNearby::returning(0),
            &MockDevice::granted(),
        );

        assert!(!session.zoom_in());
        assert!(!session.zoom_out());
        assert!(!session.recenter_on_user());
        assert!(session.state().region.is_none());

        session.on_location_update(coord(35.0, 139.0));
        assert!(session.zoom_in());
        assert_eq!(session.state().region.unwrap().latitude_delta(), 0.95 / 8.0);
        assert!(session.zoom_out());
        assert_eq!(session.state().region.unwrap().latitude_delta(), 0.95);

        assert!(session.recenter_on_user());
        let region = session.state().region.unwrap();
        assert_eq!(region.center(), coord(35.0, 139.0));
        assert_eq!(region.latitude_delta(), 0.009);
    }

    #[tokio::test]
    async fn test_marker_tap_and_dismiss() {
        let mut session = controller(
            &MockGeocoder::resolving("x", 0.0, 0.0),
            &MockNearby::returning(0),
            &MockDevice::granted(),
        );

        assert!(!session.marker_tapped());
        assert!(!session.state().place_detail_visible);

        session.on_location_update(coord(12.0, 34.0));
        assert!(session.marker_tapped());
        let selected = session.state().selected_place.clone().unwrap();
        assert_eq!(selected.label(), SELECTED_LOCATION_LABEL);
        assert_eq!(selected.location(), coord(12.0, 34.0));
        assert!(session.state().place_detail_visible);

        session.dismiss_place_detail();
        assert!(!session.state().place_detail_visible);
        assert!(session.scene().detail_label.is_none());
    }

    #[tokio::test]
    async fn test_select_nearby() {
        let mut session = controller(
            &MockGeocoder::resolving("Center", 40.0, -73.0),
            &MockNearby::returning(2),
            &MockDevice::granted(),
        );
        session.search_for("center");
        session.next_event().await;
        session.next_event().await;
        session.dismiss_place_detail();

        assert!(!session.select_nearby(7));
        assert!(!session.state().place_detail_visible);

        assert!(session.select_nearby(1));
        assert_eq!(session.scene().detail_label.as_deref(), Some("POI 1"));
    }

    #[tokio::test]
    async fn test_clear_search_and_map_type() {
        let mut session = controller(
            &MockGeocoder::resolving("x", 0.0, 0.0),
            &MockNearby::returning(0),
            &MockDevice::granted(),
        );

        session.set_search_text("coffee");
        assert!(session.scene().show_clear_button);
        session.clear_search();
        assert_eq!(session.state().search_text, "");
        assert!(!session.scene().show_clear_button);

        assert_eq!(session.state().map_type, MapType::Hybrid);
        session.set_map_type(MapType::Terrain);
        assert_eq!(session.scene().map_type, MapType::Terrain);
    }

    #[tokio::test]
    async fn test_permission_denied_is_surfaced_and_search_still_works() {
        let device = MockDevice::denied();
        let mut session = controller(
            &MockGeocoder::resolving("Still works", 1.0, 1.0),
            &MockNearby::returning(0),
            &device,
        );

        let err = session.mount().await.unwrap_err();
        assert_eq!(err, SessionError::Location(LocationError::PermissionDenied));
        assert!(!session.is_tracking());
        assert_eq!(device.opened(), 0);

        assert!(session.search_for("still works"));
        assert!(matches!(
            session.next_event().await,
            Some(SessionEvent::SearchResolved(_))
        ));
    }

    #[tokio::test]
    async fn test_unmount_releases_subscription_once_without_fixes() {
        let device = MockDevice::granted();
        let mut session = controller(
            &MockGeocoder::resolving("x", 0.0, 0.0),
            &MockNearby::returning(0),
            &device,
        );
        session.mount().await.unwrap();
        assert_eq!(device.opened(), 1);

        session.unmount();
        assert_eq!(device.removed(), 1);
    }

    #[tokio::test]
    async fn test_unmount_without_mount_releases_nothing() {
        let device = MockDevice::granted();
        controller(
            &MockGeocoder::resolving("x", 0.0, 0.0),
            &MockNearby::returning(0),
            &device,
        )
        .unmount();
        assert_eq!(device.removed(), 0);
    }

    #[tokio::test]
    async fn test_stream_end_reports_tracking_ended() {
        let device = MockDevice::granted();
        let mut session = controller(
            &MockGeocoder::resolving("x", 0.0, 0.0),
            &MockNearby::returning(0),
            &device,
        );
        session.mount().await.unwrap();

        device.close_stream();
        assert_eq!(session.next_event().await, Some(SessionEvent::TrackingEnded));
        assert!(!session.is_tracking());
        assert_eq!(session.next_event().await, None);

        session.unmount();
        assert_eq!(device.removed(), 1);
    }

    #[tokio::test]
    async fn test_whitespace_search_is_sent_as_typed() {
        let geocoder = MockGeocoder::resolving("x", 0.0, 0.0);
        let mut session = controller(&geocoder, &MockNearby::returning(0), &MockDevice::granted());

        assert!(session.search_for("   "));
        session.next_event().await;
        assert_eq!(geocoder.queries(), vec!["   ".to_string()]);
    }

    /// Resolves each query to `(lat, 0.0)` after a per-query delay.
    struct DelayedGeocoder {
        routes: Vec<(&'static str, u64, f64)>,
    }

    impl GeocodeClient for DelayedGeocoder {
        async fn search(&self, query: &str) -> Result<Place, GeocodeError> {
            let (_, delay_ms, lat) = self
                .routes
                .iter()
                .find(|(q, _, _)| *q == query)
                .copied()
                .ok_or(PlaceError::NoResults)?;
            tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
            Ok(Place::new(query, coord(lat, 0.0)))
        }
    }

    #[tokio::test]
    async fn test_overlapping_searches_last_arrival_wins() {
        let nearby = MockNearby::returning(0);
        let mut session = MapSessionController::new(
            &SessionConfig::default(),
            DelayedGeocoder {
                routes: vec![("slow", 50, 10.0), ("fast", 1, 20.0)],
            },
            nearby.clone(),
            MockDevice::granted(),
        );

        assert!(session.search_for("slow"));
        assert!(session.search_for("fast"));
        assert_eq!(session.pending_requests(), 2);

        let mut resolved = Vec::new();
        while let Some(event) = session.next_event().await {
            if let SessionEvent::SearchResolved(place) = event {
                resolved.push(place.label().to_string());
            }
        }

        // Neither search was dropped; the earlier one landed last.
        assert_eq!(resolved, vec!["fast".to_string(), "slow".to_string()]);
        assert_eq!(session.state().region.unwrap().center(), coord(10.0, 0.0));
        assert_eq!(session.state().selected_place.as_ref().unwrap().label(), "slow");

        let centers: Vec<Coordinate> = nearby.calls().into_iter().map(|(c, _, _)| c).collect();
        assert_eq!(centers, vec![coord(20.0, 0.0), coord(10.0, 0.0)]);
    }

    struct PanickingGeocoder;

    impl GeocodeClient for PanickingGeocoder {
        async fn search(&self, _query: &str) -> Result<Place, GeocodeError> {
            panic!("geocoder blew up")
        }
    }

    struct PanickingNearby;

    impl NearbyPlacesClient for PanickingNearby {
        async fn fetch_nearby(
            &self,
            _center: Coordinate,
            _radius_meters: f64,
            _limit: usize,
        ) -> Result<Vec<NearbyPlace>, NearbyError> {
            panic!("nearby blew up")
        }
    }

    #[tokio::test]
    async fn test_panicking_geocoder_reports_failure() {
        let mut session = MapSessionController::new(
            &SessionConfig::default(),
            PanickingGeocoder,
            MockNearby::returning(0),
            MockDevice::granted(),
        );

        session.search_for("boom");
        let event = tokio::time::timeout(std::time::Duration::from_secs(5), session.next_event())
            .await
            .expect("completion was lost")
            .unwrap();

        assert!(matches!(event, SessionEvent::SearchFailed(_)));
        assert!(event.alert_message().is_some());
        assert_eq!(session.pending_requests(), 0);
        assert!(session.state().region.is_none());
        assert_eq!(session.next_event().await, None);
    }

    #[tokio::test]
    async fn test_panicking_nearby_clears_list() {
        let mut session = MapSessionController::new(
            &SessionConfig::default(),
            MockGeocoder::resolving("Here", 40.0, -73.0),
            PanickingNearby,
            MockDevice::granted(),
        );

        session.search_for("here");
        assert!(matches!(
            session.next_event().await,
            Some(SessionEvent::SearchResolved(_))
        ));
        let event = tokio::time::timeout(std::time::Duration::from_secs(5), session.next_event())
            .await
            .expect("completion was lost");

        assert_eq!(event, Some(SessionEvent::NearbyCleared));
        assert_eq!(session.pending_requests(), 0);
        assert_eq!(session.state().region.unwrap().center(), coord(40.0, -73.0));
    }

    struct DropCounter(Arc<AtomicUsize>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct StallingGeocoder {
        started: Arc<AtomicUsize>,
        dropped: Arc<AtomicUsize>,
    }

    impl GeocodeClient for StallingGeocoder {
        async fn search(&self, _query: &str) -> Result<Place, GeocodeError> {
            self.started.fetch_add(1, Ordering::SeqCst);
            let _guard = DropCounter(Arc::clone(&self.dropped));
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_unmount_abandons_in_flight_search() {
        let started = Arc::new(AtomicUsize::new(0));
        let dropped = Arc::new(AtomicUsize::new(0));
        let mut session = MapSessionController::new(
            &SessionConfig::default(),
            StallingGeocoder {
                started: Arc::clone(&started),
                dropped: Arc::clone(&dropped),
            },
            MockNearby::returning(0),
            MockDevice::granted(),
        );

        session.search_for("slow");
        // Let the spawned request start.
        for _ in 0..100 {
            if started.load(Ordering::SeqCst) == 1 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(started.load(Ordering::SeqCst), 1);
        assert_eq!(session.pending_requests(), 1);

        session.unmount();
        for _ in 0..100 {
            if dropped.load(Ordering::SeqCst) == 1 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(dropped.load(Ordering::SeqCst), 1);
    }
}
