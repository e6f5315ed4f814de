use super::*;
use crate::config::ServerSettings;

fn client() -> ApiClient {
    let settings = ServerSettings {
        base_url: "http://localhost:5000/".to_string(),
        timeout_secs: 5,
    };
    ApiClient::new(&settings).unwrap()
}

#[test]
fn format_duration_pads_seconds_not_minutes() {
    assert_eq!(format_duration(75.0), "1:15");
    assert_eq!(format_duration(9.0), "0:09");
    assert_eq!(format_duration(200.0), "3:20");
    assert_eq!(format_duration(60.0), "1:00");
    assert_eq!(format_duration(3599.0), "59:59");
    assert_eq!(format_duration(3600.0), "60:00");
}

#[test]
fn format_duration_renders_missing_values_as_zero() {
    assert_eq!(format_duration(0.0), "0:00");
    assert_eq!(format_duration(-3.0), "0:00");
    assert_eq!(format_duration(f64::NAN), "0:00");
    assert_eq!(format_duration(f64::INFINITY), "0:00");
}

#[test]
fn format_duration_floors_fractional_seconds() {
    assert_eq!(format_duration(75.9), "1:15");
    assert_eq!(format_duration(0.4), "0:00");
}

#[test]
fn base_url_drops_trailing_slash() {
    assert_eq!(client().base_url(), "http://localhost:5000");
}

#[test]
fn audio_url_points_at_the_stream_endpoint() {
    assert_eq!(
        client().audio_url(42),
        "http://localhost:5000/api/songs/42/audio"
    );
}

#[test]
fn download_url_encodes_the_title_query() {
    assert_eq!(
        client().download_url("abc-123", "My Song"),
        "http://localhost:5000/download/abc-123?title=My%20Song"
    );
}

#[test]
fn track_deserializes_with_server_defaults() {
    let t: Track = serde_json::from_str(
        r#"{"id": 7, "title": "Song", "artist": "Someone", "duration": 200,
            "file_size": 123456, "created_at": "2025-01-01T00:00:00"}"#,
    )
    .unwrap();
    assert_eq!(t.id, 7);
    assert_eq!(t.duration, 200);
    assert_eq!(t.file_size, Some(123456));

    // Minimal record: artist and duration fall back to server defaults.
    let t: Track = serde_json::from_str(r#"{"id": 1, "title": "Bare"}"#).unwrap();
    assert_eq!(t.artist, "Unknown Artist");
    assert_eq!(t.duration, 0);
    assert_eq!(t.file_size, None);
    assert_eq!(t.created_at, None);
}

#[test]
fn convert_response_success_unwraps_to_result() {
    let resp: ConvertResponse = serde_json::from_str(
        r#"{"success": true, "file_id": "f1", "title": "X", "safe_title": "X",
            "duration": 200}"#,
    )
    .unwrap();

    let result = resp.into_result().unwrap();
    assert_eq!(result.file_id, "f1");
    assert_eq!(result.title, "X");
    assert_eq!(result.duration, 200);
    assert_eq!(result.artist, None);
}

#[test]
fn convert_response_failure_carries_server_message_verbatim() {
    let resp: ConvertResponse =
        serde_json::from_str(r#"{"success": false, "error": "Video is age-restricted"}"#).unwrap();

    let err = resp.into_result().unwrap_err();
    assert!(matches!(&err, ApiError::Api(msg) if msg == "Video is age-restricted"));
    assert_eq!(err.user_message(), "Video is age-restricted");
    assert!(!err.is_transport());
}

#[test]
fn convert_response_success_without_file_id_is_an_error() {
    let resp: ConvertResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
    assert!(resp.into_result().is_err());
}

#[test]
fn status_response_uses_fallback_when_error_missing() {
    let resp: StatusResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
    let err = resp.into_result("Failed to delete song").unwrap_err();
    assert_eq!(err.user_message(), "Failed to delete song");
}

#[test]
fn transport_errors_surface_a_generic_message() {
    let err = ApiError::Io(std::io::Error::other("disk on fire"));
    assert!(err.is_transport());
    assert_eq!(err.user_message(), "Network error. Please try again.");
}

#[test]
fn save_request_omits_absent_optionals() {
    let result = ConversionResult {
        file_id: "f1".to_string(),
        title: "X".to_string(),
        artist: None,
        duration: 200,
        youtube_url: None,
        safe_title: "X".to_string(),
    };
    let body = serde_json::to_string(&SaveRequest::from(&result)).unwrap();
    assert!(!body.contains("artist"));
    assert!(!body.contains("youtube_url"));
    assert!(body.contains("\"file_id\":\"f1\""));
}
