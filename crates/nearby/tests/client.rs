//! Integration tests for `NearbyClient` against a fake transport and a
//! scripted location provider.

mod common;

use std::time::Duration;

use common::{
    FakeTransport, ScriptedLocation, client, client_with, coord, registered_client,
};
use nearby::prelude::*;
use serde_json::json;

// =========================================================================
// Register
// =========================================================================

#[tokio::test]
async fn test_register_binds_user_on_success() {
    let transport = FakeTransport::new();
    transport.reply(r#"{"id":42,"username":"nik","likes_received":0}"#);
    let client = client(&transport, &ScriptedLocation::new());

    let profile = client.register().await.unwrap();
    assert_eq!(profile.id, UserId(42));
    assert_eq!(profile.display_name(), "@nik");

    let session = client.session().await;
    assert_eq!(session.user_id(), Some(UserId(42)));
    assert_eq!(session.phase(), SessionPhase::Registered);

    let req = transport.last_request();
    assert_eq!(req.method, Method::Post);
    assert_eq!(req.path, "/api/register");
    assert_eq!(req.identity, None);
    assert_eq!(transport.last_body(), json!({"init_data": "abc123"}));
}

#[tokio::test]
async fn test_register_failure_leaves_session_unregistered() {
    let transport = FakeTransport::new();
    transport.fail(401, "Invalid init data HMAC");
    let client = client(&transport, &ScriptedLocation::new());

    let err = client.register().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RemoteError);
    assert!(err.to_string().contains("Invalid init data HMAC"));
    assert_eq!(client.session().await.user_id(), None);
}

#[tokio::test]
async fn test_register_network_failure_leaves_session_unregistered() {
    let transport = FakeTransport::new();
    transport.offline();
    let client = client(&transport, &ScriptedLocation::new());

    let err = client.register().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NetworkError);
    assert_eq!(client.session().await.phase(), SessionPhase::Anonymous);
}

#[tokio::test]
async fn test_register_without_credential_sends_nothing() {
    let transport = FakeTransport::new();
    let client = NearbyClientBuilder::new().build_with_transport(
        transport.clone(),
        ScriptedLocation::new(),
        StaticCredential::missing(),
    );

    let err = client.register().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingCredential);
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_register_twice_is_rejected_locally() {
    let transport = FakeTransport::new();
    let client =
        registered_client(&transport, &ScriptedLocation::new(), ClientConfig::default()).await;

    let err = client.register().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyRegistered);
    assert_eq!(transport.request_count(), 1);
    assert_eq!(client.session().await.user_id(), Some(UserId(42)));
}

#[tokio::test]
async fn test_concurrent_registers_for_same_user_both_succeed() {
    let transport = FakeTransport::new();
    transport.reply(r#"{"id":42,"username":"nik"}"#);
    transport.reply(r#"{"id":42,"username":"nik"}"#);
    let client = client(&transport, &ScriptedLocation::new());

    let (a, b) = tokio::join!(client.register(), client.register());
    assert_eq!(a.unwrap().id, UserId(42));
    assert_eq!(b.unwrap().id, UserId(42));
    assert_eq!(transport.request_count(), 2);
    assert_eq!(client.session().await.user_id(), Some(UserId(42)));
}

#[tokio::test]
async fn test_concurrent_register_as_different_user_is_rejected() {
    let transport = FakeTransport::new();
    transport.reply(r#"{"id":42}"#);
    transport.reply(r#"{"id":43}"#);
    let client = client(&transport, &ScriptedLocation::new());

    let (a, b) = tokio::join!(client.register(), client.register());
    assert_eq!(a.unwrap().id, UserId(42));
    assert_eq!(b.unwrap_err().kind(), ErrorKind::AlreadyRegistered);
    assert_eq!(client.session().await.user_id(), Some(UserId(42)));
}

#[tokio::test]
async fn test_register_rejects_malformed_response() {
    let transport = FakeTransport::new();
    transport.reply(r#"{"username":"no id here"}"#);
    let client = client(&transport, &ScriptedLocation::new());

    let err = client.register().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    assert_eq!(client.session().await.user_id(), None);
}

#[cfg(feature = "http")]
#[test]
fn test_bad_identity_header_is_a_config_error() {
    let config = ClientConfig::default().identity_header("bad header");
    let Err(err) = NearbyClientBuilder::new()
        .config(config)
        .build(NoLocation, StaticCredential::new("abc123"))
    else {
        panic!("a header name with a space must be rejected");
    };
    assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    assert!(!err.is_recoverable());
}

// =========================================================================
// Authentication precondition
// =========================================================================

#[tokio::test]
async fn test_authenticated_operations_short_circuit_when_unregistered() {
    let transport = FakeTransport::new();
    let location = ScriptedLocation::at(55.75, 37.61);
    let client = client(&transport, &location);

    assert_eq!(
        client.heartbeat().await.unwrap_err().kind(),
        ErrorKind::NotRegistered
    );
    assert_eq!(
        client.discover_nearby().await.unwrap_err().kind(),
        ErrorKind::NotRegistered
    );
    assert_eq!(
        client.discover_nearby_with_fix().await.unwrap_err().kind(),
        ErrorKind::NotRegistered
    );
    assert_eq!(
        client.like(UserId(7)).await.unwrap_err().kind(),
        ErrorKind::NotRegistered
    );
    assert_eq!(
        client.profile(UserId(7)).await.unwrap_err().kind(),
        ErrorKind::NotRegistered
    );

    assert_eq!(transport.request_count(), 0);
    assert_eq!(location.calls(), 0);
}

// =========================================================================
// Heartbeat
// =========================================================================

#[tokio::test]
async fn test_heartbeat_stores_exactly_the_submitted_coordinate() {
    let transport = FakeTransport::new();
    let location = ScriptedLocation::at(55.75, 37.61);
    let client = registered_client(&transport, &location, ClientConfig::default()).await;

    transport.reply(r#"{"likes_received":0}"#);
    let report = client.heartbeat().await.unwrap();
    assert_eq!(report.coordinate, coord(55.75, 37.61));
    assert_eq!(report.likes_received, 0);

    let req = transport.last_request();
    assert_eq!(req.path, "/api/heartbeat");
    assert_eq!(req.identity.as_deref(), Some("42"));
    assert_eq!(transport.last_body(), json!({"lat": 55.75, "lon": 37.61}));

    let session = client.session().await;
    assert_eq!(session.last_coordinate(), Some(coord(55.75, 37.61)));
    assert_eq!(session.phase(), SessionPhase::Located);
}

#[tokio::test]
async fn test_heartbeat_updates_cached_like_count() {
    let transport = FakeTransport::new();
    let location = ScriptedLocation::at(55.75, 37.61);
    let client = registered_client(&transport, &location, ClientConfig::default()).await;

    transport.reply(r#"{"id":42,"tg_id":"1001","likes_received":4}"#);
    client.heartbeat().await.unwrap();
    let session = client.session().await;
    assert_eq!(session.profile().map(|p| p.likes_received), Some(4));
}

#[tokio::test]
async fn test_heartbeat_location_failure_sends_nothing() {
    let transport = FakeTransport::new();
    let location = ScriptedLocation::new();
    location.then_fail(LocationError::PermissionDenied("User denied Geolocation".into()));
    let client = registered_client(&transport, &location, ClientConfig::default()).await;

    let err = client.heartbeat().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LocationUnavailable);
    assert!(err.to_string().contains("User denied Geolocation"));
    assert_eq!(transport.request_count(), 1, "only the register call");
    assert_eq!(client.session().await.last_coordinate(), None);
}

#[tokio::test]
async fn test_rejected_heartbeat_keeps_previous_coordinate() {
    let transport = FakeTransport::new();
    let location = ScriptedLocation::at(55.75, 37.61);
    location.then_at(10.0, 10.0);
    let client = registered_client(&transport, &location, ClientConfig::default()).await;

    transport.reply(r#"{"likes_received":0}"#);
    client.heartbeat().await.unwrap();

    transport.fail(500, "Internal Server Error");
    let err = client.heartbeat().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RemoteError);
    assert_eq!(
        client.session().await.last_coordinate(),
        Some(coord(55.75, 37.61))
    );
}

#[tokio::test(start_paused = true)]
async fn test_heartbeat_times_out_with_configured_timeout() {
    /// Never answers.
    struct Silent;

    impl LocationProvider for Silent {
        async fn locate(&self, _options: &LocateOptions) -> Result<Coordinate, LocationError> {
            std::future::pending().await
        }
    }

    let transport = FakeTransport::new();
    transport.reply(r#"{"id":42}"#);
    let config = ClientConfig::default().locate_timeout(Duration::from_secs(10));
    let client = NearbyClientBuilder::new().config(config).build_with_transport(
        transport.clone(),
        Silent,
        StaticCredential::new("abc123"),
    );
    client.register().await.unwrap();

    let err = client.heartbeat().await.unwrap_err();
    assert!(matches!(
        err,
        NearbyError::Location(LocationError::Timeout(d)) if d == Duration::from_secs(10)
    ));
    assert_eq!(transport.request_count(), 1);
}

// =========================================================================
// Discover-Nearby
// =========================================================================

#[tokio::test]
async fn test_discover_without_fix_needs_fix() {
    let transport = FakeTransport::new();
    let location = ScriptedLocation::new();
    let client = registered_client(&transport, &location, ClientConfig::default()).await;

    let discovery = client.discover_nearby().await.unwrap();
    assert_eq!(discovery, Discovery::NeedsFix);
    assert_eq!(transport.request_count(), 1);
    assert_eq!(location.calls(), 0);
}

#[tokio::test]
async fn test_discover_queries_last_coordinate() {
    let transport = FakeTransport::new();
    let location = ScriptedLocation::at(55.75, 37.61);
    let client = registered_client(&transport, &location, ClientConfig::default()).await;
    transport.reply(r#"{"likes_received":0}"#);
    client.heartbeat().await.unwrap();

    transport.reply(r#"[{"id":7,"distance_m":120,"likes_received":3}]"#);
    let Discovery::Found(snapshot) = client.discover_nearby().await.unwrap() else {
        panic!("expected a snapshot");
    };
    assert_eq!(snapshot.origin, coord(55.75, 37.61));
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.users[0].id, UserId(7));
    assert_eq!(snapshot.users[0].distance_m, 120.0);
    assert_eq!(snapshot.users[0].likes_received, 3);

    let req = transport.last_request();
    assert_eq!(req.method, Method::Get);
    assert_eq!(req.path, "/api/nearby");
    assert_eq!(
        req.query,
        vec![
            ("lat".to_string(), "55.75".to_string()),
            ("lon".to_string(), "37.61".to_string()),
        ]
    );
    assert_eq!(req.identity.as_deref(), Some("42"));
    assert_eq!(req.body, None);
}

#[tokio::test]
async fn test_empty_nearby_is_not_an_error() {
    let transport = FakeTransport::new();
    let location = ScriptedLocation::at(55.75, 37.61);
    let client = registered_client(&transport, &location, ClientConfig::default()).await;
    transport.reply(r#"{"likes_received":0}"#);
    client.heartbeat().await.unwrap();

    transport.reply("[]");
    let discovery = client.discover_nearby().await.unwrap();
    assert!(matches!(discovery, Discovery::Found(ref s) if s.is_empty()));
}

#[tokio::test]
async fn test_discover_replaces_previous_snapshot() {
    let transport = FakeTransport::new();
    let location = ScriptedLocation::at(55.75, 37.61);
    let client = registered_client(&transport, &location, ClientConfig::default()).await;
    transport.reply(r#"{"likes_received":0}"#);
    client.heartbeat().await.unwrap();

    transport.reply(r#"[{"id":7,"distance_m":12.5},{"id":8,"distance_m":40.0}]"#);
    let first = client.discover_nearby_with_fix().await.unwrap();
    transport.reply(r#"[{"id":9,"distance_m":3.0}]"#);
    let second = client.discover_nearby_with_fix().await.unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 1);
    assert_eq!(second.users[0].id, UserId(9));
}

#[tokio::test]
async fn test_discover_with_fix_chains_heartbeat() {
    let transport = FakeTransport::new();
    let location = ScriptedLocation::at(55.75, 37.61);
    let client = registered_client(&transport, &location, ClientConfig::default()).await;

    transport.reply(r#"{"likes_received":1}"#);
    transport.reply(r#"[{"id":7,"distance_m":120,"likes_received":3}]"#);
    let snapshot = client.discover_nearby_with_fix().await.unwrap();
    assert_eq!(snapshot.len(), 1);

    let paths: Vec<String> = transport.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(paths, ["/api/register", "/api/heartbeat", "/api/nearby"]);
    assert_eq!(location.calls(), 1);
}

#[tokio::test]
async fn test_discover_with_fix_surfaces_location_error_unchanged() {
    let transport = FakeTransport::new();
    let location = ScriptedLocation::new();
    location.then_fail(LocationError::Unsupported);
    let client = registered_client(&transport, &location, ClientConfig::default()).await;

    let err = client.discover_nearby_with_fix().await.unwrap_err();
    assert!(matches!(err, NearbyError::Location(LocationError::Unsupported)));
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_nearby_avatar_is_optional() {
    let transport = FakeTransport::new();
    let location = ScriptedLocation::at(1.0, 1.0);
    let client = registered_client(&transport, &location, ClientConfig::default()).await;
    transport.reply("{}");
    client.heartbeat().await.unwrap();

    transport.reply(
        r#"[{"id":7,"distance_m":1,"photo_url":null},{"id":8,"distance_m":2,"photo_url":"https://cdn/8.jpg"}]"#,
    );
    let snapshot = client.discover_nearby_with_fix().await.unwrap();
    assert_eq!(snapshot.users[0].avatar(), None);
    assert_eq!(snapshot.users[1].avatar(), Some("https://cdn/8.jpg"));
}

// =========================================================================
// Like
// =========================================================================

#[tokio::test]
async fn test_like_returns_message_and_leaves_session_alone() {
    let transport = FakeTransport::new();
    let location = ScriptedLocation::at(55.75, 37.61);
    let client = registered_client(&transport, &location, ClientConfig::default()).await;
    transport.reply(r#"{"likes_received":0}"#);
    client.heartbeat().await.unwrap();
    let before = client.session().await;

    transport.reply(r#"{"ok":true,"message":"Liked!"}"#);
    let result = client.like(UserId(7)).await.unwrap();
    assert_eq!(result.message, "Liked!");
    assert_eq!(client.session().await, before);

    let req = transport.last_request();
    assert_eq!(req.path, "/api/like");
    assert_eq!(req.identity.as_deref(), Some("42"));
    assert_eq!(
        transport.last_body(),
        json!({"target_user_id": 7, "lat": 55.75, "lon": 37.61})
    );
}

#[tokio::test]
async fn test_like_without_fix_omits_location() {
    let transport = FakeTransport::new();
    let client =
        registered_client(&transport, &ScriptedLocation::new(), ClientConfig::default()).await;

    transport.reply(r#"{"ok":true,"message":"Like counted"}"#);
    client.like(UserId(7)).await.unwrap();
    assert_eq!(transport.last_body(), json!({"target_user_id": 7}));
}

#[tokio::test]
async fn test_like_with_empty_message_gets_default() {
    let transport = FakeTransport::new();
    let client =
        registered_client(&transport, &ScriptedLocation::new(), ClientConfig::default()).await;

    transport.reply("");
    let result = client.like(UserId(7)).await.unwrap();
    assert_eq!(result.message, DEFAULT_LIKE_MESSAGE);
    assert!(!result.message.is_empty());
}

#[tokio::test]
async fn test_repeated_like_surfaces_service_rejection() {
    let transport = FakeTransport::new();
    let client =
        registered_client(&transport, &ScriptedLocation::new(), ClientConfig::default()).await;

    transport.reply(r#"{"ok":true,"message":"Like counted"}"#);
    transport.fail(429, "Repeat like available in ~280 s.");
    assert!(client.like(UserId(7)).await.is_ok());

    let err = client.like(UserId(7)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RemoteError);
    assert!(err.to_string().contains("Repeat like available"));
    assert!(err.is_recoverable());
    assert_eq!(client.session().await.user_id(), Some(UserId(42)));
}

#[tokio::test]
async fn test_concurrent_likes_both_complete() {
    let transport = FakeTransport::new();
    let client =
        registered_client(&transport, &ScriptedLocation::new(), ClientConfig::default()).await;

    transport.reply(r#"{"message":"first"}"#);
    transport.reply(r#"{"message":"second"}"#);
    let (a, b) = tokio::join!(client.like(UserId(7)), client.like(UserId(7)));

    let mut messages = vec![a.unwrap().message, b.unwrap().message];
    messages.sort();
    assert_eq!(messages, ["first", "second"]);
    assert_eq!(transport.request_count(), 3);
}

// =========================================================================
// Leaderboard / Profile
// =========================================================================

#[tokio::test]
async fn test_leaderboard_needs_no_registration_and_ranks_by_position() {
    let transport = FakeTransport::new();
    let client = client(&transport, &ScriptedLocation::new());

    transport.reply(
        r#"[{"user":{"id":42},"likes_received":5},{"user":{"id":7},"likes_received":3}]"#,
    );
    let board = client.leaderboard().await.unwrap();
    assert_eq!(board.entries.len(), 2);
    assert_eq!((board.entries[0].rank, board.entries[0].user.id), (1, UserId(42)));
    assert_eq!((board.entries[1].rank, board.entries[1].user.id), (2, UserId(7)));

    let req = transport.last_request();
    assert_eq!(req.path, "/api/leaderboard");
    assert_eq!(req.identity, None);
    assert!(req.query.is_empty());
}

#[tokio::test]
async fn test_leaderboard_sends_identity_and_limit_when_available() {
    let transport = FakeTransport::new();
    let config = ClientConfig::default().leaderboard_limit(Some(10));
    let client = registered_client(&transport, &ScriptedLocation::new(), config).await;

    transport.reply("[]");
    let board = client.leaderboard().await.unwrap();
    assert!(board.is_empty());

    let req = transport.last_request();
    assert_eq!(req.identity.as_deref(), Some("42"));
    assert_eq!(req.query, vec![("limit".to_string(), "10".to_string())]);
}

#[tokio::test]
async fn test_profile_reports_relationship() {
    let transport = FakeTransport::new();
    let client =
        registered_client(&transport, &ScriptedLocation::new(), ClientConfig::default()).await;

    transport.reply(
        r#"{"user":{"id":7,"username":"anya","likes_received":3},
            "you_liked_them":true,"they_liked_you":false,
            "last_location":{"lat":55.7501,"lon":37.6102}}"#,
    );
    let profile = client.profile(UserId(7)).await.unwrap();
    assert!(profile.you_liked_them);
    assert!(!profile.they_liked_you);
    assert!(!profile.is_mutual());
    assert_eq!(profile.last_location, Some(coord(55.7501, 37.6102)));
    assert!(profile.recent_likes.is_empty());

    let req = transport.last_request();
    assert_eq!(req.method, Method::Get);
    assert_eq!(req.path, "/api/profile/7");
    assert_eq!(req.identity.as_deref(), Some("42"));
}

#[tokio::test]
async fn test_profile_not_found_is_remote_error() {
    let transport = FakeTransport::new();
    let client =
        registered_client(&transport, &ScriptedLocation::new(), ClientConfig::default()).await;

    transport.fail(404, r#"{"detail":"Not found"}"#);
    let err = client.profile(UserId(999)).await.unwrap_err();
    let NearbyError::Transport(TransportError::Remote { status, body }) = err else {
        panic!("expected a remote error");
    };
    assert_eq!(status, 404);
    assert_eq!(body, r#"{"detail":"Not found"}"#);
}

// =========================================================================
// End-to-end scenario
// =========================================================================

#[tokio::test]
async fn test_full_session_scenario() {
    let transport = FakeTransport::new();
    let location = ScriptedLocation::at(55.75, 37.61);
    let client = client_with(&transport, &location, ClientConfig::default());

    transport.reply(r#"{"id":42,"username":"nik","likes_received":0}"#);
    client.register().await.unwrap();
    assert_eq!(client.session().await.user_id(), Some(UserId(42)));

    transport.reply(r#"{"likes_received":0}"#);
    client.heartbeat().await.unwrap();
    assert_eq!(
        client.session().await.last_coordinate(),
        Some(coord(55.75, 37.61))
    );

    transport.reply(r#"[{"id":7,"distance_m":120,"likes_received":3}]"#);
    let snapshot = client.discover_nearby_with_fix().await.unwrap();
    assert_eq!(snapshot.len(), 1);

    let before = client.session().await;
    transport.reply(r#"{"message":"Liked!"}"#);
    assert_eq!(client.like(UserId(7)).await.unwrap().message, "Liked!");
    assert_eq!(client.session().await, before);

    transport.reply(
        r#"[{"user":{"id":42},"likes_received":5},{"user":{"id":7},"likes_received":3}]"#,
    );
    let board = client.leaderboard().await.unwrap();
    assert_eq!(board.top().map(|e| e.user.id), Some(UserId(42)));
    assert_eq!(board.entries[1].rank, 2);
}
