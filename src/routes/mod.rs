/// Application routes configuration
use crate::clients::FetchStates;
use crate::handlers::{health, list_planes, track_by_callsign, track_by_icao24, AppState};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};

/// Build the application router with all routes
pub fn build_router<C: FetchStates + 'static>(
    state: AppState<C>,
    cors_allow_origin: String,
) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Candidate list
        .route("/planes", get(list_planes::<C>))
        // Single-aircraft lookups
        .route("/track", get(track_by_icao24::<C>))
        .route("/track/:callsign", get(track_by_callsign::<C>))
        .layer(middleware::from_fn_with_state(cors_allow_origin, cors))
        .with_state(state)
}

/// Permissive CORS for browser front ends: answers preflights with 204 and
/// stamps the configured origin on every response.
async fn cors(State(allow_origin): State<String>, req: Request, next: Next) -> Response {
    let headers = |resp: &mut Response| {
        let value = HeaderValue::from_str(&allow_origin)
            .unwrap_or_else(|_| HeaderValue::from_static("*"));
        resp.headers_mut()
            .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        resp.headers_mut().insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, OPTIONS"),
        );
        resp.headers_mut().insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("*"),
        );
    };

    if req.method() == Method::OPTIONS {
        let mut resp = Response::new(Default::default());
        *resp.status_mut() = StatusCode::NO_CONTENT;
        headers(&mut resp);
        return resp;
    }

    let mut resp = next.run(req).await;
    headers(&mut resp);
    resp
}
