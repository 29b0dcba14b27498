#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use cam4_platforms::extractor::{default_client, platforms::cam4::Cam4};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

pub const MASTER_PLAYLIST: &str = "#EXTM3U\n\
#EXT-X-VERSION:3\n\
#EXT-X-STREAM-INF:BANDWIDTH=1200000,RESOLUTION=854x480\n\
480p/playlist.m3u8\n\
#EXT-X-STREAM-INF:BANDWIDTH=3000000,RESOLUTION=1280x720\n\
720p/playlist.m3u8\n";

pub const THUMBNAIL: &[u8] = b"\xFF\xD8\xFF\xE0fake-jpeg";

/// Lightweight HTTP server standing in for the CAM4 API, CDN and relay.
pub struct TestServer {
    base_url: Url,
    pub hits: Arc<Hits>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

#[derive(Default)]
pub struct Hits {
    pub info: AtomicUsize,
    pub stream_info: AtomicUsize,
    pub playlist: AtomicUsize,
    pub relay: AtomicUsize,
}

impl Hits {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
struct AppState {
    base: String,
    hits: Arc<Hits>,
}

impl TestServer {
    pub async fn new() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = Url::parse(&format!("http://{addr}")).unwrap();
        let hits = Arc::new(Hits::default());

        let state = AppState {
            base: base_url.as_str().trim_end_matches('/').to_string(),
            hits: hits.clone(),
        };
        let router = Router::new()
            .route("/api/{username}/info", get(profile_info))
            .route("/api/{username}/streamInfo", get(stream_info))
            .route("/hls/private.m3u8", get(private_playlist))
            .route("/hls/marker.m3u8", get(marker_playlist))
            .route("/hls/badrequest.m3u8", get(bad_request_playlist))
            .route("/hls/garbage.m3u8", get(|| async { "<html>maintenance</html>" }))
            .route("/hls/live/master.m3u8", get(master_playlist))
            .route("/thumbs/{username}", get(thumbnail))
            .route("/relay/v1", post(relay))
            .route("/relay/health", get(|| async { StatusCode::OK }))
            .route("/brokenrelay/v1", post(broken_relay))
            .with_state(state);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server = axum::serve(listener, router).with_graceful_shutdown(async {
            shutdown_rx.await.ok();
        });
        tokio::spawn(async move {
            server.await.unwrap();
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        Self {
            base_url,
            hits,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn url(&self, path: &str) -> String {
        self.base_url.join(path).unwrap().to_string()
    }

    pub fn extras(&self) -> Value {
        json!({
            "api_base_url": self.url("/api"),
            "thumbnail_base_url": self.url("/thumbs"),
        })
    }

    pub fn cam4(&self, username: &str) -> Cam4 {
        self.cam4_with_extras(username, self.extras())
    }

    pub fn cam4_with_extras(&self, username: &str, extras: Value) -> Cam4 {
        Cam4::new(
            format!("https://www.cam4.com/{username}"),
            default_client(),
            None,
            Some(extras),
        )
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }
    }
}

/// Stream metadata served for `username`, `None` for "not streaming" cases.
pub fn stream_metadata(base: &str, username: &str) -> Option<Value> {
    match username {
        "private" => Some(json!({ "cdnURL": format!("{base}/hls/private.m3u8") })),
        "garbage" => Some(json!({ "cdnURL": format!("{base}/hls/garbage.m3u8") })),
        "deadcdn" => Some(json!({ "cdnURL": "http://127.0.0.1:1/hls/down.m3u8" })),
        "marker" => Some(json!({ "cdnURL": format!("{base}/hls/marker.m3u8") })),
        "badrequest" => Some(json!({ "cdnURL": format!("{base}/hls/badrequest.m3u8") })),
        "noplaylist" => Some(json!({ "edgeServer": "edge-7", "cdnURL": "" })),
        "live" => Some(json!({
            "cdnURL": format!("{base}/hls/live/master.m3u8"),
            "edgeServer": "edge-7",
            "streamUUID": "2c7f8b0e",
        })),
        _ => None,
    }
}

async fn profile_info(State(state): State<AppState>, Path(username): Path<String>) -> Response {
    state.hits.info.fetch_add(1, Ordering::SeqCst);
    match username.as_str() {
        "missing" => (StatusCode::NOT_FOUND, "Not Found").into_response(),
        "broken" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        "sleepy" => Json(json!({ "username": "sleepy", "online": false })).into_response(),
        "unknown_state" => Json(json!({ "username": "unknown_state" })).into_response(),
        "nullonline" => Json(json!({ "username": "nullonline", "online": null })).into_response(),
        "badjson" => "{not json".into_response(),
        _ => Json(json!({ "username": username, "online": true })).into_response(),
    }
}

async fn stream_info(State(state): State<AppState>, Path(username): Path<String>) -> Response {
    state.hits.stream_info.fetch_add(1, Ordering::SeqCst);
    match username.as_str() {
        "idle" => StatusCode::NO_CONTENT.into_response(),
        "gone" => StatusCode::NOT_FOUND.into_response(),
        "blank" => (StatusCode::OK, "  ").into_response(),
        "nullish" => (StatusCode::OK, "null").into_response(),
        "emptyobj" => Json(json!({})).into_response(),
        "emptyarr" => Json(json!([])).into_response(),
        name => match stream_metadata(&state.base, name) {
            Some(value) => Json(value).into_response(),
            None => StatusCode::NO_CONTENT.into_response(),
        },
    }
}

async fn private_playlist(State(state): State<AppState>) -> Response {
    state.hits.playlist.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::FORBIDDEN,
        "Your session is NOT ALLOWED to view this stream",
    )
        .into_response()
}

async fn marker_playlist(State(state): State<AppState>) -> Response {
    state.hits.playlist.fetch_add(1, Ordering::SeqCst);
    "#EXTM3U\n# You are not allowed to view this stream\n".into_response()
}

async fn bad_request_playlist(State(state): State<AppState>) -> Response {
    state.hits.playlist.fetch_add(1, Ordering::SeqCst);
    StatusCode::BAD_REQUEST.into_response()
}

async fn master_playlist(State(state): State<AppState>) -> Response {
    state.hits.playlist.fetch_add(1, Ordering::SeqCst);
    MASTER_PLAYLIST.into_response()
}

async fn thumbnail(Path(username): Path<String>) -> Response {
    match username.as_str() {
        "missing" => StatusCode::NOT_FOUND.into_response(),
        _ => THUMBNAIL.to_vec().into_response(),
    }
}

/// Relay answering every profile lookup with an offline performer.
async fn relay(State(state): State<AppState>, Json(payload): Json<Value>) -> Response {
    state.hits.relay.fetch_add(1, Ordering::SeqCst);
    assert_eq!(payload["cmd"], "request.get");
    assert!(payload["maxTimeout"].as_u64().is_some());

    Json(json!({
        "status": "ok",
        "message": "",
        "solution": {
            "url": payload["url"],
            "status": 200,
            "response": "{\"online\": false}",
        }
    }))
    .into_response()
}

async fn broken_relay(State(state): State<AppState>) -> Response {
    state.hits.relay.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "status": "error", "message": "challenge not solved" })).into_response()
}
