//! Session flows against a mocked bridge and discovery service.

use std::time::Duration;

use hue_voice_rs::{BridgeSession, ClientConfig, Error, ErrorKind, StateDelta};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

const TOKEN: &str = "83b7780291a6ceffbe0bd049104df";

fn config_for(server: &ServerGuard) -> ClientConfig {
    ClientConfig::default()
        .with_discovery_url(&format!("{}/", server.url()))
        .with_device_type("hue-voice-rs#test")
        .with_timeout(Duration::from_secs(2))
}

/// A session already paired with the mock bridge.
fn paired_session(server: &ServerGuard) -> BridgeSession {
    let mut session = BridgeSession::new(config_for(server)).unwrap();
    session.set_bridge_address(&server.host_with_port());
    session.set_access_token(TOKEN);
    session
}

async fn mock_lights(server: &mut ServerGuard, body: serde_json::Value) -> mockito::Mock {
    server
        .mock("GET", format!("/api/{}/lights", TOKEN).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

#[tokio::test]
async fn test_discover_takes_first_bridge() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[{"id": "001788fffe100491", "internalipaddress": "192.168.2.23"},
                {"id": "001788fffe09a168", "internalipaddress": "192.168.88.252"}]"#,
        )
        .create_async()
        .await;

    let mut session = BridgeSession::new(config_for(&server)).unwrap();
    let bridge = session.discover().await.unwrap();

    assert_eq!(bridge.address, "192.168.2.23");
    assert_eq!(session.bridge_address(), Some("192.168.2.23"));
    assert_eq!(session.last_error(), None);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_discover_empty_list() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let mut session = BridgeSession::new(config_for(&server)).unwrap();
    let err = session.discover().await.unwrap_err();

    assert!(matches!(err, Error::NoBridgeFound));
    assert_eq!(err.kind(), ErrorKind::Decode);
    assert_eq!(session.bridge_address(), None);
    assert_eq!(session.last_error(), Some("no bridge found on the network"));
}

#[tokio::test]
async fn test_discover_rate_limited() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/")
        .with_status(429)
        .with_body("Too Many Requests")
        .create_async()
        .await;

    let mut session = BridgeSession::new(config_for(&server)).unwrap();
    let err = session.discover().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Decode);
    assert_eq!(session.bridge_address(), None);
    assert!(session.last_error().unwrap().contains("429"));
}

#[tokio::test]
async fn test_register_success() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api")
        .match_body(Matcher::Json(json!({"devicetype": "hue-voice-rs#test"})))
        .with_status(200)
        .with_body(json!([{"success": {"username": TOKEN}}]).to_string())
        .create_async()
        .await;

    let mut session = BridgeSession::new(config_for(&server)).unwrap();
    session.set_bridge_address(&server.host_with_port());
    session.register().await.unwrap();

    assert_eq!(session.access_token(), Some(TOKEN));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_register_link_button_not_pressed() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api")
        .with_status(200)
        .with_body(
            r#"[{"error": {"type": 101, "address": "", "description": "link button not pressed"}}]"#,
        )
        .create_async()
        .await;

    let mut session = BridgeSession::new(config_for(&server)).unwrap();
    session.set_bridge_address(&server.host_with_port());
    let err = session.register().await.unwrap_err();

    assert!(err.is_link_button_not_pressed());
    assert!(!session.is_registered());
    assert_eq!(session.last_error(), Some("link button not pressed"));
}

#[tokio::test]
async fn test_register_distinguishes_bad_replies() {
    let mut empty_bridge = Server::new_async().await;
    let _mock = empty_bridge
        .mock("POST", "/api")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;
    let mut odd_bridge = Server::new_async().await;
    let _mock = odd_bridge
        .mock("POST", "/api")
        .with_status(200)
        .with_body(r#"[{"status": "ok"}]"#)
        .create_async()
        .await;

    let mut session = BridgeSession::new(config_for(&empty_bridge)).unwrap();
    session.set_bridge_address(&empty_bridge.host_with_port());
    let empty = session.register().await.unwrap_err();
    let empty_message = session.last_error().map(String::from);

    session.set_bridge_address(&odd_bridge.host_with_port());
    let neither = session.register().await.unwrap_err();

    assert!(matches!(empty, Error::EmptyReply));
    assert!(matches!(neither, Error::UnexpectedReply(_)));
    assert_ne!(empty_message.as_deref(), session.last_error());
}

#[tokio::test]
async fn test_register_network_failure() {
    let server = Server::new_async().await;
    let mut session = BridgeSession::new(config_for(&server)).unwrap();
    session.set_bridge_address("127.0.0.1:1");

    let err = session.register().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(session.last_error().is_some());
}

#[tokio::test]
async fn test_refresh_lights_sorted() {
    let mut server = Server::new_async().await;
    let mock = mock_lights(
        &mut server,
        json!({
            "2": {"name": "Hall", "state": {"on": false, "bri": 50}},
            "1": {"name": "Desk", "state": {"on": true, "bri": 100}}
        }),
    )
    .await;

    let mut session = paired_session(&server);
    let lights = session.refresh_lights().await.unwrap();

    let ids: Vec<&str> = lights.iter().map(|l| l.id()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert!(lights[0].state().is_on());
    assert_eq!(lights[1].state().brightness().unwrap().value(), 50);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_refresh_lights_empty() {
    let mut server = Server::new_async().await;
    let _lights = mock_lights(&mut server, json!({})).await;

    let mut session = paired_session(&server);
    assert!(session.refresh_lights().await.unwrap().is_empty());
    assert_eq!(session.last_error(), None);
}

#[tokio::test]
async fn test_refresh_lights_replaces_cache() {
    let mut server = Server::new_async().await;
    let _lights = mock_lights(
        &mut server,
        json!({"1": {"state": {"on": true}}, "2": {"state": {"on": true}}}),
    )
    .await;

    let mut session = paired_session(&server);
    session.refresh_lights().await.unwrap();
    assert_eq!(session.lights().len(), 2);

    let mut replaced = Server::new_async().await;
    let _lights = mock_lights(&mut replaced, json!({"3": {"state": {"on": false}}})).await;
    session.set_bridge_address(&replaced.host_with_port());
    session.refresh_lights().await.unwrap();

    let ids: Vec<&str> = session.lights().iter().map(|l| l.id()).collect();
    assert_eq!(ids, vec!["3"]);
}

#[tokio::test]
async fn test_preconditions_send_nothing() {
    let mut server = Server::new_async().await;
    let any = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let put = server
        .mock("PUT", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let mut session = BridgeSession::new(config_for(&server)).unwrap();
    session.set_bridge_address(&server.host_with_port());

    let err = session.refresh_lights().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Precondition);
    let err = session
        .set_light("1", &StateDelta::new(false))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Precondition);

    any.assert_async().await;
    put.assert_async().await;
}

#[tokio::test]
async fn test_set_light_power_only_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", format!("/api/{}/lights/1/state", TOKEN).as_str())
        .match_body(Matcher::JsonString(r#"{"on": false}"#.to_string()))
        .with_status(200)
        .with_body(r#"[{"success": {"/lights/1/state/on": false}}]"#)
        .create_async()
        .await;

    let mut session = paired_session(&server);
    let ack = session.set_light("1", &StateDelta::new(false)).await.unwrap();

    assert_eq!(ack.applied, vec!["/lights/1/state/on"]);
    assert!(ack.is_clean());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_set_light_partial_failure_is_success() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("PUT", format!("/api/{}/lights/1/state", TOKEN).as_str())
        .with_status(200)
        .with_body(
            r#"[{"success": {"/lights/1/state/on": true}},
                {"error": {"type": 7, "address": "/lights/1/state/hue",
                           "description": "invalid value, 70000, for parameter, hue"}}]"#,
        )
        .create_async()
        .await;

    let mut session = paired_session(&server);
    let ack = session.set_light("1", &StateDelta::new(true)).await.unwrap();

    assert_eq!(ack.warnings.len(), 1);
    assert_eq!(session.last_error(), None);
}

#[tokio::test]
async fn test_set_light_server_error_status_is_success() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", format!("/api/{}/lights/1/state", TOKEN).as_str())
        .with_status(500)
        .with_body(r#"[{"success": {"/lights/1/state/on": true}}]"#)
        .create_async()
        .await;

    let mut session = paired_session(&server);
    let ack = session.set_light("1", &StateDelta::new(true)).await.unwrap();

    assert_eq!(ack.applied, vec!["/lights/1/state/on"]);
    assert_eq!(session.last_error(), None);
    let history = session.history().await;
    assert!(history.last_error().unwrap().contains("500"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_set_light_garbled_ack_is_success() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("PUT", format!("/api/{}/lights/4/state", TOKEN).as_str())
        .with_status(200)
        .with_body("not json at all")
        .create_async()
        .await;

    let mut session = paired_session(&server);
    let ack = session.set_light("4", &StateDelta::new(true)).await.unwrap();
    assert!(ack.applied.is_empty());
}

#[tokio::test]
async fn test_voice_command_targets_first_light() {
    let mut server = Server::new_async().await;
    let _lights = mock_lights(
        &mut server,
        json!({
            "2": {"state": {"on": false, "bri": 10}},
            "1": {"state": {"on": false, "bri": 10, "hue": 100, "sat": 10}}
        }),
    )
    .await;
    let put = server
        .mock("PUT", format!("/api/{}/lights/1/state", TOKEN).as_str())
        .match_body(Matcher::Json(
            json!({"on": true, "hue": 65280, "sat": 254, "bri": 254}),
        ))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let mut session = paired_session(&server);
    session.refresh_lights().await.unwrap();
    let delta = session
        .apply_voice_command("could you turn red please")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(delta.get_hue().unwrap().value(), 65280);
    let light = session.light("1").unwrap();
    assert!(light.state().is_on());
    assert_eq!(light.state().hue().unwrap().value(), 65280);
    assert!(!session.light("2").unwrap().state().is_on());
    put.assert_async().await;
}

#[tokio::test]
async fn test_power_command_does_not_resend_cached_color() {
    let mut server = Server::new_async().await;
    let _lights = mock_lights(
        &mut server,
        json!({"1": {"state": {"on": false, "bri": 10, "hue": 100, "sat": 10}}}),
    )
    .await;
    let put = server
        .mock("PUT", format!("/api/{}/lights/1/state", TOKEN).as_str())
        .match_body(Matcher::JsonString(r#"{"on": true, "bri": 254}"#.to_string()))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let mut session = paired_session(&server);
    session.refresh_lights().await.unwrap();
    session.apply_voice_command("turn on").await.unwrap().unwrap();

    let state = session.light("1").unwrap().state();
    assert!(state.is_on());
    assert_eq!(state.hue().unwrap().value(), 100);
    put.assert_async().await;
}

#[tokio::test]
async fn test_voice_command_to_all_lights() {
    let mut server = Server::new_async().await;
    let _lights = mock_lights(
        &mut server,
        json!({"1": {"state": {"on": true}}, "2": {"state": {"on": true}}}),
    )
    .await;
    let mut puts = Vec::new();
    for id in ["1", "2"] {
        puts.push(
            server
                .mock("PUT", format!("/api/{}/lights/{}/state", TOKEN, id).as_str())
                .match_body(Matcher::Json(json!({"on": false, "bri": 254})))
                .with_status(200)
                .with_body("[]")
                .create_async()
                .await,
        );
    }

    let mut session = paired_session(&server);
    session.refresh_lights().await.unwrap();
    session
        .apply_voice_command_to_all("turn off")
        .await
        .unwrap()
        .unwrap();

    assert!(session.lights().iter().all(|l| !l.state().is_on()));
    for put in puts {
        put.assert_async().await;
    }
}

#[tokio::test]
async fn test_error_is_overwritten_then_cleared() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/")
        .with_status(500)
        .create_async()
        .await;

    let mut session = BridgeSession::new(config_for(&server)).unwrap();
    session.register().await.unwrap_err();
    let first = session.last_error().map(String::from);

    session.discover().await.unwrap_err();
    let second = session.last_error().map(String::from);
    assert_ne!(first, second);
    assert_eq!(second.as_deref(), Some("unexpected http status 500 for discover"));

    let mut bridge = Server::new_async().await;
    let _lights = mock_lights(&mut bridge, json!({})).await;
    session.set_bridge_address(&bridge.host_with_port());
    session.set_access_token(TOKEN);
    session.refresh_lights().await.unwrap();
    assert_eq!(session.last_error(), None);
}

#[tokio::test]
async fn test_history_hides_token() {
    let mut server = Server::new_async().await;
    let _lights = mock_lights(&mut server, json!({"1": {"state": {"on": true}}})).await;

    let mut session = paired_session(&server);
    session.refresh_lights().await.unwrap();

    let history = session.history().await;
    assert_eq!(history.summary().send_count, 1);
    assert_eq!(history.summary().receive_count, 1);
    let dump = serde_json::to_string(history.entries()).unwrap();
    assert!(!dump.contains(TOKEN));

    let diag = session.diagnostics().await;
    assert_eq!(diag["registered"], json!(true));
    assert_eq!(diag["history"]["total_entries"], json!(2));
    assert_eq!(diag["history"]["requests"]["getLights"], json!(1));
}
