mod common;

use cam4_platforms::extractor::{
    ExtractorFactory, default_client,
    error::ExtractorError,
    platforms::cam4::{PerformerStatus, StreamMetadata},
};
use common::{Hits, TestServer, THUMBNAIL, stream_metadata};
use rstest::rstest;
use serde_json::json;

#[tokio::test]
async fn profile_not_found() {
    let server = TestServer::new().await;
    let err = server
        .cam4("missing")
        .check_availability("missing")
        .await
        .unwrap_err();

    assert!(matches!(err, ExtractorError::PerformerNotFound));
    assert_eq!(err.to_string(), "Performer not found");
    assert_eq!(Hits::get(&server.hits.stream_info), 0);
}

#[tokio::test]
async fn performer_offline() {
    let server = TestServer::new().await;
    let err = server
        .cam4("sleepy")
        .check_availability("sleepy")
        .await
        .unwrap_err();

    assert!(matches!(err, ExtractorError::PerformerOffline));
    assert_eq!(err.to_string(), "Performer is currently offline");
    assert_eq!(Hits::get(&server.hits.info), 1);
    assert_eq!(Hits::get(&server.hits.stream_info), 0);
}

#[rstest]
#[case::missing("unknown_state")]
#[case::null("nullonline")]
#[tokio::test]
async fn missing_online_field_means_offline(#[case] username: &str) {
    let server = TestServer::new().await;
    let err = server
        .cam4(username)
        .check_availability(username)
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractorError::PerformerOffline));
    assert_eq!(Hits::get(&server.hits.stream_info), 0);
}

#[rstest]
#[case::no_content("idle")]
#[case::not_found("gone")]
#[case::blank_body("blank")]
#[case::null_body("nullish")]
#[case::empty_object("emptyobj")]
#[case::empty_array("emptyarr")]
#[tokio::test]
async fn online_but_not_streaming(#[case] username: &str) {
    let server = TestServer::new().await;
    let err = server
        .cam4(username)
        .check_availability(username)
        .await
        .unwrap_err();

    assert!(matches!(err, ExtractorError::PerformerNotStreaming));
    assert_eq!(
        err.to_string(),
        "Performer is online but not currently streaming"
    );
    assert_eq!(Hits::get(&server.hits.info), 1);
    assert_eq!(Hits::get(&server.hits.stream_info), 1);
}

#[tokio::test]
async fn streaming_metadata_is_passed_through() {
    let server = TestServer::new().await;
    let base = server.url("/");
    let expected = stream_metadata(base.trim_end_matches('/'), "live").unwrap();

    let metadata = server
        .cam4("live")
        .check_availability("live")
        .await
        .unwrap();

    assert_eq!(metadata, StreamMetadata::new(expected.clone()));
    assert_eq!(metadata.into_value(), expected);
    // Availability alone never touches the CDN.
    assert_eq!(Hits::get(&server.hits.playlist), 0);
}

#[tokio::test]
async fn unexpected_profile_status_propagates() {
    let server = TestServer::new().await;
    let err = server
        .cam4("broken")
        .check_availability("broken")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ExtractorError::UnexpectedStatus { status: 500, .. }
    ));
    assert!(!err.is_expected());
}

#[tokio::test]
async fn malformed_profile_json_propagates() {
    let server = TestServer::new().await;
    let err = server
        .cam4("badjson")
        .check_availability("badjson")
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractorError::JsonError(_)));
}

#[rstest]
#[case("missing", PerformerStatus::NotFound, "Performer not found")]
#[case("sleepy", PerformerStatus::Offline, "Performer is currently offline")]
#[case(
    "idle",
    PerformerStatus::OnlineNotStreaming,
    "Performer is online but not currently streaming"
)]
#[case(
    "noplaylist",
    PerformerStatus::OnlineNotStreaming,
    "Performer is online but not currently streaming"
)]
#[case(
    "private",
    PerformerStatus::PrivateOrAway,
    "Stream not accessible - performer may be in a private show or away"
)]
#[case("garbage", PerformerStatus::PrivateOrAway, "Invalid stream response")]
#[tokio::test]
async fn probe_reports_status(
    #[case] username: &str,
    #[case] status: PerformerStatus,
    #[case] message: &str,
) {
    let server = TestServer::new().await;
    let report = server.cam4(username).probe().await.unwrap();

    assert_eq!(report.username, username);
    assert_eq!(report.status, status);
    assert_eq!(report.error.as_deref(), Some(message));
    assert!(report.stream_url.is_none());
    assert!(!report.is_streaming());
    assert_eq!(
        report.thumbnail_url.is_some(),
        status != PerformerStatus::NotFound
    );
}

#[tokio::test]
async fn unreachable_cdn_is_reported_as_private_or_away() {
    let server = TestServer::new().await;
    let report = server.cam4("deadcdn").probe().await.unwrap();

    assert_eq!(report.status, PerformerStatus::PrivateOrAway);
    assert!(
        report
            .error
            .as_deref()
            .is_some_and(|e| e.starts_with("Error accessing stream: "))
    );
}

#[tokio::test]
async fn probe_reports_streaming() {
    let server = TestServer::new().await;
    let report = server.cam4("live").probe().await.unwrap();

    assert!(report.is_streaming());
    assert_eq!(
        report.stream_url.as_deref(),
        Some(server.url("/hls/live/master.m3u8").as_str())
    );
    assert_eq!(
        report.thumbnail_url.as_deref(),
        Some(server.url("/thumbs/live").as_str())
    );
    assert!(report.error.is_none());

    let availability = report.availability();
    assert!(availability.exists && availability.is_online && availability.is_streaming);
}

#[tokio::test]
async fn missing_playlist_url() {
    let server = TestServer::new().await;
    let cam4 = server.cam4("noplaylist");
    let metadata = cam4.check_availability("noplaylist").await.unwrap();
    let err = cam4.locate_streams(&metadata).await.unwrap_err();

    assert!(matches!(err, ExtractorError::NoPlaylistUrl));
    assert_eq!(
        err.to_string(),
        "Stream info found but no playlist URL available"
    );
}

#[rstest]
#[case::forbidden_with_marker("private")]
#[case::marker_only("marker")]
#[case::bad_request_only("badrequest")]
#[tokio::test]
async fn private_stream_is_not_accessible(#[case] username: &str) {
    let server = TestServer::new().await;
    let err = server
        .cam4(username)
        .resolve(username)
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractorError::StreamNotAccessible));
    assert_eq!(Hits::get(&server.hits.playlist), 1);
}

#[tokio::test]
async fn non_playlist_response_is_rejected() {
    let server = TestServer::new().await;
    let err = server
        .cam4("garbage")
        .resolve("garbage")
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractorError::HlsPlaylistError(msg) if msg == "Invalid stream response"));
}

#[tokio::test]
async fn extract_through_factory() {
    let server = TestServer::new().await;
    let factory = ExtractorFactory::new(default_client());
    let extractor = factory
        .create_extractor("https://www.cam4.com/Live", None, Some(server.extras()))
        .unwrap();

    let media_info = extractor.extract().await.unwrap();

    assert!(media_info.is_live);
    assert_eq!(media_info.title, "live");
    assert_eq!(media_info.artist, "live");
    assert_eq!(media_info.site_url, "https://www.cam4.com");
    assert_eq!(
        media_info.artist_url.as_deref(),
        Some("https://www.cam4.com/live")
    );
    assert_eq!(media_info.streams.len(), 2);
    assert_eq!(media_info.streams[0].quality, "1280x720");
    assert_eq!(media_info.streams[0].bitrate, 3000);
    assert_eq!(
        media_info.streams[0].url,
        server.url("/hls/live/720p/playlist.m3u8")
    );
    assert_eq!(media_info.streams[1].quality, "854x480");
    assert_eq!(
        media_info.extras.as_ref().and_then(|e| e.get("edgeServer")),
        Some(&json!("edge-7"))
    );
    assert!(media_info.headers.is_some());
}

#[tokio::test]
async fn extract_fails_fast_when_offline() {
    let server = TestServer::new().await;
    let factory = ExtractorFactory::new(default_client());
    let extractor = factory
        .create_extractor("https://www.cam4.com/sleepy", None, Some(server.extras()))
        .unwrap();

    let err = extractor.extract().await.unwrap_err();
    assert!(matches!(err, ExtractorError::PerformerOffline));
    assert!(err.is_expected());
}

#[tokio::test]
async fn requests_go_through_relay() {
    let server = TestServer::new().await;
    let mut extras = server.extras();
    extras["flaresolverr_url"] = json!(server.url("/relay"));
    let cam4 = server.cam4_with_extras("anyone", extras);

    assert!(cam4.relay().unwrap().is_available().await);

    // The relay answers offline; the direct API would say online.
    let err = cam4.check_availability("anyone").await.unwrap_err();
    assert!(matches!(err, ExtractorError::PerformerOffline));
    assert_eq!(Hits::get(&server.hits.relay), 1);
    assert_eq!(Hits::get(&server.hits.info), 0);
}

#[tokio::test]
async fn failing_relay_falls_back_to_direct_requests() {
    let server = TestServer::new().await;
    let mut extras = server.extras();
    extras["flaresolverr_url"] = json!(server.url("/brokenrelay"));
    let cam4 = server.cam4_with_extras("live", extras);

    let metadata = cam4.check_availability("live").await.unwrap();
    assert!(metadata.cdn_url().is_some());
    assert_eq!(Hits::get(&server.hits.relay), 2);
    assert_eq!(Hits::get(&server.hits.info), 1);
    assert_eq!(Hits::get(&server.hits.stream_info), 1);
}

#[tokio::test]
async fn thumbnail_is_written_to_disk() {
    let server = TestServer::new().await;
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("thumb.jpg");

    let path = server
        .cam4("live")
        .download_thumbnail(Some(&output))
        .await
        .unwrap();

    assert_eq!(path, output);
    assert_eq!(tokio::fs::read(&output).await.unwrap(), THUMBNAIL);
}

#[tokio::test]
async fn missing_thumbnail_is_an_http_error() {
    let server = TestServer::new().await;
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("thumb.jpg");

    let err = server
        .cam4("missing")
        .download_thumbnail(Some(&output))
        .await
        .unwrap_err();

    assert!(matches!(err, ExtractorError::HttpError(_)));
    assert!(!output.exists());
}
