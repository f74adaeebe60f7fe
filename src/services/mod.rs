/// Business logic services layer
use crate::clients::FetchStates;
use crate::domain::{
    parse_feed, OnGroundPolicy, PlaneDetail, PlaneList, PlaneSummary, Provenance, StateVector,
};
use crate::errors::{ApiError, ApiResult};
use crate::geo::rough_location;
use crate::repo::{SnapshotRepo, StateCache};
use crate::utils::format_epoch;
use crate::view::view_comment;
use serde_json::Value;
use tracing::{info, warn};

/// Behavioral knobs for the tracker, independent of transport config
#[derive(Clone, Debug)]
pub struct TrackerSettings {
    pub offline_mode: bool,
    pub save_snapshot: bool,
    pub max_list: usize,
    pub on_ground_policy: OnGroundPolicy,
    pub annotate_fallback: bool,
}

/// Raw feed payload plus where it came from
pub struct StatesPayload {
    pub payload: Value,
    pub provenance: Provenance,
    /// Error code of the failure that forced the snapshot fallback
    pub fallback_reason: Option<String>,
}

/// Flight tracking service: obtains the state feed with fallback and shapes
/// it for the front ends.
pub struct TrackerService<C: FetchStates> {
    client: C,
    cache: StateCache,
    snapshots: SnapshotRepo,
    settings: TrackerSettings,
}

impl<C: FetchStates> TrackerService<C> {
    pub fn new(
        client: C,
        cache: StateCache,
        snapshots: SnapshotRepo,
        settings: TrackerSettings,
    ) -> Self {
        Self {
            client,
            cache,
            snapshots,
            settings,
        }
    }

    /// Obtain the raw feed payload.
    ///
    /// Precedence: offline override, fresh cache, live fetch, snapshot.
    /// Fails only when the live fetch fails and no snapshot exists.
    pub async fn states_with_provenance(&self) -> ApiResult<StatesPayload> {
        if self.settings.offline_mode {
            info!("offline mode: loading states from snapshot");
            let payload = self.snapshots.load()?;
            return Ok(StatesPayload {
                payload,
                provenance: Provenance::Snapshot,
                fallback_reason: None,
            });
        }

        if let Some(payload) = self.cache.get_fresh() {
            return Ok(StatesPayload {
                payload,
                provenance: Provenance::Cache,
                fallback_reason: None,
            });
        }

        match self.client.fetch_states().await {
            Ok(payload) => {
                self.cache.put(payload.clone());
                if self.settings.save_snapshot {
                    if let Err(e) = self.snapshots.save(&payload) {
                        warn!("failed to save snapshot: {e}");
                    }
                }
                Ok(StatesPayload {
                    payload,
                    provenance: Provenance::Live,
                    fallback_reason: None,
                })
            }
            Err(fetch_err) => {
                warn!("live fetch failed ({}), trying snapshot", fetch_err.code());
                match self.snapshots.load() {
                    Ok(payload) => Ok(StatesPayload {
                        payload,
                        provenance: Provenance::Snapshot,
                        fallback_reason: Some(fetch_err.code().to_string()),
                    }),
                    Err(_) => Err(ApiError::Unavailable(format!(
                        "live fetch failed ({}) and no snapshot is available",
                        fetch_err.code()
                    ))),
                }
            }
        }
    }

    /// Candidate list: callsign-bearing states, most recent first
    pub async fn plane_list(&self) -> ApiResult<PlaneList> {
        let states = self.states_with_provenance().await?;
        let vectors = parse_feed(&states.payload);
        let candidates = select_candidates(&vectors, self.settings.max_list);

        let planes = candidates
            .iter()
            .map(|sv| self.summarize(sv))
            .collect::<Vec<_>>();

        let fallback_reason = if self.settings.annotate_fallback {
            states.fallback_reason
        } else {
            None
        };

        Ok(PlaneList {
            source: states.provenance,
            count: planes.len(),
            planes,
            fallback_reason,
        })
    }

    /// Latest state for a callsign; None when no current state matches
    pub async fn find_by_callsign(&self, callsign: &str) -> ApiResult<Option<PlaneDetail>> {
        let wanted = callsign.trim().to_uppercase();
        if wanted.is_empty() {
            return Err(ApiError::InvalidInput("callsign is required".to_string()));
        }

        let states = self.states_with_provenance().await?;
        let vectors = parse_feed(&states.payload);
        // Callsigns are not guaranteed unique; first match in feed order wins
        Ok(vectors
            .iter()
            .find(|sv| sv.normalized_callsign() == wanted)
            .map(|sv| self.project(sv)))
    }

    /// Latest state for an ICAO24 address; None when absent from the feed
    pub async fn find_by_icao24(&self, icao24: &str) -> ApiResult<Option<PlaneDetail>> {
        let wanted = icao24.trim();
        if wanted.is_empty() {
            return Err(ApiError::InvalidInput(
                "icao24 is required. e.g. /track?icao24=4952ca".to_string(),
            ));
        }

        let states = self.states_with_provenance().await?;
        let vectors = parse_feed(&states.payload);
        Ok(vectors
            .iter()
            .find(|sv| sv.icao24.eq_ignore_ascii_case(wanted))
            .map(|sv| self.project(sv)))
    }

    fn summarize(&self, sv: &StateVector) -> PlaneSummary {
        PlaneSummary {
            callsign: sv.normalized_callsign(),
            icao24: sv.icao24.clone(),
            origin_country: sv.origin_country.clone(),
            latitude: sv.latitude,
            longitude: sv.longitude,
            on_ground: self.settings.on_ground_policy.apply(sv.on_ground),
            rough_location: rough_location(
                sv.latitude,
                sv.longitude,
                sv.origin_country.as_deref(),
            ),
            last_contact: format_epoch(sv.last_contact),
        }
    }

    fn project(&self, sv: &StateVector) -> PlaneDetail {
        PlaneDetail {
            callsign: sv.normalized_callsign(),
            icao24: sv.icao24.clone(),
            origin_country: sv.origin_country.clone(),
            latitude: sv.latitude,
            longitude: sv.longitude,
            baro_altitude: sv.baro_altitude,
            geo_altitude: sv.geo_altitude,
            velocity: sv.velocity,
            heading: sv.heading,
            vertical_rate: sv.vertical_rate,
            on_ground: self.settings.on_ground_policy.apply(sv.on_ground),
            time_position: format_epoch(sv.time_position),
            last_contact: format_epoch(sv.last_contact),
            rough_location: rough_location(
                sv.latitude,
                sv.longitude,
                sv.origin_country.as_deref(),
            ),
            comment_text: view_comment(sv.resolved_altitude()).to_string(),
        }
    }
}

/// Filter to callsign-bearing states, order by last_contact descending and
/// truncate. Absent timestamps sort last; the sort is stable, so ties keep
/// feed order.
pub fn select_candidates(states: &[StateVector], max_list: usize) -> Vec<StateVector> {
    let mut candidates: Vec<StateVector> = states
        .iter()
        .filter(|sv| !sv.normalized_callsign().is_empty())
        .cloned()
        .collect();

    candidates.sort_by_key(|sv| std::cmp::Reverse(sv.last_contact.unwrap_or(i64::MIN)));
    candidates.truncate(max_list);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn feed_payload() -> Value {
        json!({
            "time": 1_700_000_200,
            "states": [
                ["aaa111", "",      "Japan",   null, 100, 139.7, 35.6, 1000.0, false, null, null, null, null, null],
                ["bbb222", "AAA1",  "Germany", null, 50,  8.7,   50.1, 2000.0, false, null, null, null, null, 2100.0],
                ["4952ca", " bb2 ", "Portugal", null, 200, -9.13, 38.77, 3000.0, null, 230.5, 45.0, -2.6, null, null],
                ["ddd444", null,    "France",  null, 10,  2.35,  48.85, null,  true,  null, null, null, null, null]
            ]
        })
    }

    struct CountingFetcher {
        calls: AtomicUsize,
        result: Result<Value, &'static str>,
    }

    impl CountingFetcher {
        fn ok(payload: Value) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                result: Ok(payload),
            }
        }

        fn rate_limited() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                result: Err("429"),
            }
        }

        fn count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl FetchStates for &CountingFetcher {
        async fn fetch_states(&self) -> ApiResult<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.result {
                Ok(payload) => Ok(payload.clone()),
                Err(_) => Err(ApiError::RateLimited),
            }
        }
    }

    fn settings() -> TrackerSettings {
        TrackerSettings {
            offline_mode: false,
            save_snapshot: false,
            max_list: 30,
            on_ground_policy: OnGroundPolicy::Preserve,
            annotate_fallback: true,
        }
    }

    fn service_in<'a>(
        dir: &tempfile::TempDir,
        fetcher: &'a CountingFetcher,
        settings: TrackerSettings,
    ) -> TrackerService<&'a CountingFetcher> {
        TrackerService::new(
            fetcher,
            StateCache::new(Duration::from_secs(30)),
            SnapshotRepo::new(dir.path().join("snapshot.json")),
            settings,
        )
    }

    #[test]
    fn test_select_candidates_filters_sorts_truncates() {
        let vectors = parse_feed(&feed_payload());
        let selected = select_candidates(&vectors, 30);

        let names: Vec<String> = selected.iter().map(|sv| sv.normalized_callsign()).collect();
        assert_eq!(names, vec!["BB2".to_string(), "AAA1".to_string()]);
        assert_eq!(selected[0].last_contact, Some(200));
        assert_eq!(selected[1].last_contact, Some(50));
    }

    #[test]
    fn test_select_candidates_truncates_to_max() {
        let vectors = parse_feed(&feed_payload());
        let selected = select_candidates(&vectors, 1);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].normalized_callsign(), "BB2");
    }

    #[test]
    fn test_select_candidates_absent_timestamp_sorts_last() {
        let payload = json!({
            "states": [
                ["aaa111", "NOTIME", "X", null, null],
                ["bbb222", "OLD",    "X", null, 5]
            ]
        });
        let selected = select_candidates(&parse_feed(&payload), 30);
        assert_eq!(selected[0].normalized_callsign(), "OLD");
        assert_eq!(selected[1].normalized_callsign(), "NOTIME");
    }

    #[tokio::test]
    async fn test_live_fetch_then_cache_hit() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = CountingFetcher::ok(feed_payload());
        let service = service_in(&dir, &fetcher, settings());

        let first = service.states_with_provenance().await.unwrap();
        assert_eq!(first.provenance, Provenance::Live);

        let second = service.states_with_provenance().await.unwrap();
        assert_eq!(second.provenance, Provenance::Cache);
        // the second call must not have fetched again
        assert_eq!(fetcher.count(), 1);
    }

    #[tokio::test]
    async fn test_rate_limited_falls_back_to_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = CountingFetcher::rate_limited();
        let service = service_in(&dir, &fetcher, settings());
        service.snapshots.save(&feed_payload()).unwrap();

        let states = service.states_with_provenance().await.unwrap();
        assert_eq!(states.provenance, Provenance::Snapshot);
        assert_eq!(states.fallback_reason.as_deref(), Some("UPSTREAM_429"));
    }

    #[tokio::test]
    async fn test_fetch_failure_without_snapshot_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = CountingFetcher::rate_limited();
        let service = service_in(&dir, &fetcher, settings());

        assert!(matches!(
            service.states_with_provenance().await,
            Err(ApiError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_offline_mode_skips_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = CountingFetcher::ok(feed_payload());
        let service = service_in(
            &dir,
            &fetcher,
            TrackerSettings {
                offline_mode: true,
                ..settings()
            },
        );
        service.snapshots.save(&feed_payload()).unwrap();

        let states = service.states_with_provenance().await.unwrap();
        assert_eq!(states.provenance, Provenance::Snapshot);
        assert_eq!(fetcher.count(), 0);
    }

    #[tokio::test]
    async fn test_save_snapshot_on_live_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = CountingFetcher::ok(feed_payload());
        let service = service_in(
            &dir,
            &fetcher,
            TrackerSettings {
                save_snapshot: true,
                ..settings()
            },
        );

        service.states_with_provenance().await.unwrap();
        assert!(service.snapshots.exists());
        assert_eq!(service.snapshots.load().unwrap(), feed_payload());
    }

    #[tokio::test]
    async fn test_plane_list_shape() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = CountingFetcher::ok(feed_payload());
        let service = service_in(&dir, &fetcher, settings());

        let list = service.plane_list().await.unwrap();
        assert_eq!(list.source, Provenance::Live);
        assert_eq!(list.count, 2);
        assert_eq!(list.planes[0].callsign, "BB2");
        assert_eq!(list.planes[0].rough_location, "western Europe");
        assert_eq!(list.planes[1].callsign, "AAA1");
        assert_eq!(list.planes[1].rough_location, "near Germany");
        assert!(list.fallback_reason.is_none());
    }

    #[tokio::test]
    async fn test_find_by_icao24_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = CountingFetcher::ok(feed_payload());
        let service = service_in(&dir, &fetcher, settings());

        let detail = service
            .find_by_icao24("4952CA")
            .await
            .unwrap()
            .expect("should match the lowercase stored address");
        assert_eq!(detail.icao24, "4952ca");
        assert_eq!(detail.callsign, "BB2");
    }

    #[tokio::test]
    async fn test_find_by_callsign_normalizes_query() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = CountingFetcher::ok(feed_payload());
        let service = service_in(&dir, &fetcher, settings());

        let detail = service.find_by_callsign(" bb2 ").await.unwrap().unwrap();
        assert_eq!(detail.icao24, "4952ca");
        // geo altitude absent, barometric used for the comment; 3000 m is
        // just under 10000 ft, the climbing band
        assert!(detail.comment_text.contains("climbing"));
        assert_eq!(detail.time_position, "N/A");
        // on_ground was null in the feed and the policy preserves it
        assert_eq!(detail.on_ground, None);
    }

    #[tokio::test]
    async fn test_find_by_callsign_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = CountingFetcher::ok(feed_payload());
        let service = service_in(&dir, &fetcher, settings());

        assert!(service.find_by_callsign("ZZZ999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_with_empty_identifier_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = CountingFetcher::ok(feed_payload());
        let service = service_in(&dir, &fetcher, settings());

        assert!(matches!(
            service.find_by_callsign("   ").await,
            Err(ApiError::InvalidInput(_))
        ));
        assert!(matches!(
            service.find_by_icao24("").await,
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_assume_airborne_policy_in_projection() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = CountingFetcher::ok(feed_payload());
        let service = service_in(
            &dir,
            &fetcher,
            TrackerSettings {
                on_ground_policy: OnGroundPolicy::AssumeAirborne,
                ..settings()
            },
        );

        let detail = service.find_by_callsign("BB2").await.unwrap().unwrap();
        assert_eq!(detail.on_ground, Some(false));
    }
}
