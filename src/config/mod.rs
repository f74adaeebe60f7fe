/// Application configuration module
use crate::domain::OnGroundPolicy;
use std::env;

pub const DEFAULT_OPENSKY_URL: &str = "https://opensky-network.org/api/states/all";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub opensky_url: String,
    pub fetch_timeout_secs: u64,
    pub cache_ttl_secs: u64,
    pub snapshot_path: String,
    pub save_snapshot: bool,
    pub offline_mode: bool,
    pub max_list: usize,
    pub cors_allow_origin: String,
    pub bind_addr: String,
    pub track: TrackSettings,
    pub on_ground_policy: OnGroundPolicy,
    pub annotate_fallback: bool,
}

/// CLI polling cadence
#[derive(Clone, Debug)]
pub struct TrackSettings {
    pub interval_secs: u64,
    pub iterations: u32,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let opensky_url =
            env::var("OPENSKY_URL").unwrap_or_else(|_| DEFAULT_OPENSKY_URL.to_string());

        let snapshot_path = env::var("SNAPSHOT_PATH")
            .unwrap_or_else(|_| "opensky_states_snapshot.json".to_string());

        let cors_allow_origin =
            env::var("CORS_ALLOW_ORIGIN").unwrap_or_else(|_| "*".to_string());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let on_ground_policy = match env::var("ON_GROUND_POLICY").ok().as_deref() {
            Some("assume-airborne") => OnGroundPolicy::AssumeAirborne,
            _ => OnGroundPolicy::Preserve,
        };

        let track = TrackSettings {
            interval_secs: env_u64("TRACK_INTERVAL_SECS", 20),
            iterations: env_u64("TRACK_ITERATIONS", 10) as u32,
        };

        Ok(Self {
            opensky_url,
            fetch_timeout_secs: env_u64("FETCH_TIMEOUT_SECS", 15),
            cache_ttl_secs: env_u64("CACHE_TTL_SECS", 30),
            snapshot_path,
            save_snapshot: env_bool("SAVE_SNAPSHOT", false),
            offline_mode: env_bool("OFFLINE_MODE", false),
            max_list: env_u64("MAX_LIST", 30) as usize,
            cors_allow_origin,
            bind_addr,
            track,
            on_ground_policy,
            annotate_fallback: env_bool("ANNOTATE_FALLBACK", false),
        })
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(default)
}
