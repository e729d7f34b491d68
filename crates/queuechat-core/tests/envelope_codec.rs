//! Envelope codec tests: round-trips, render formats, and degradation.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::json;

use queuechat_core::protocol::envelope::{decode, encode, Decoded, Envelope};

#[test]
fn message_send_round_trip() {
    let sent = Envelope::MessageSend {
        message: "hello".to_string(),
    };
    let wire = encode(&sent).unwrap();
    match decode(&wire) {
        Decoded::Frame(Envelope::MessageSend { message }) => assert_eq!(message, "hello"),
        other => panic!("expected MESSAGE_SEND frame, got {other:?}"),
    }
}

#[test]
fn encode_produces_type_payload_shape() {
    let wire = encode(&Envelope::MessageSend {
        message: "hi".to_string(),
    })
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&wire).unwrap();
    assert_eq!(value, json!({"type": "MESSAGE_SEND", "payload": {"message": "hi"}}));

    let wire = encode(&Envelope::ServerStatusRequest {}).unwrap();
    let value: serde_json::Value = serde_json::from_str(&wire).unwrap();
    assert_eq!(value, json!({"type": "SERVERSTATUS_REQUEST", "payload": {}}));
}

#[test]
fn non_json_passes_through_unchanged() {
    let decoded = decode("not json");
    assert_eq!(decoded, Decoded::Raw("not json".to_string()));
    assert_eq!(decoded.render(), "not json");
}

#[test]
fn message_receive_renders_author_and_timestamp() {
    let decoded = decode(
        r#"{"type":"MESSAGE_RECEIVE","payload":{"nickname":"ann","message":"hi","timestamp":"12:00"}}"#,
    );
    assert_eq!(decoded.render(), "ann@12:00: hi");
}

#[test]
fn message_receive_tolerates_missing_author_fields() {
    let decoded = decode(r#"{"type":"MESSAGE_RECEIVE","payload":{"message":"hi"}}"#);
    assert_eq!(decoded.render(), "unknown: hi");
}

#[test]
fn server_status_response_renders_count() {
    let decoded = decode(r#"{"type":"SERVERSTATUS_RESPONSE","payload":{"clientCount":3}}"#);
    assert_eq!(decoded.render(), "[server] 3 client(s) connected");
}

#[test]
fn system_message_renders_with_tag() {
    let decoded = decode(
        r#"{"type":"SYSTEM_MESSAGE_RECEIVE","payload":{"message":"maintenance soon","timestamp":"12:00"}}"#,
    );
    assert_eq!(decoded.render(), "[system@12:00] maintenance soon");
}

#[test]
fn unknown_type_tag_falls_back_to_structured_display() {
    let decoded = decode(r#"{"type":"NOPE","payload":{"x":1}}"#);
    let Decoded::Unrecognized(value) = &decoded else {
        panic!("expected unrecognized frame, got {decoded:?}");
    };
    assert_eq!(value["type"], "NOPE");
    assert!(decoded.render().contains("NOPE"));
}

#[test]
fn incomplete_payload_falls_back_to_structured_display() {
    // MESSAGE_RECEIVE without its required message field.
    let decoded = decode(r#"{"type":"MESSAGE_RECEIVE","payload":{"nickname":"ann"}}"#);
    assert!(matches!(decoded, Decoded::Unrecognized(_)));
}

#[test]
fn json_scalar_passes_through() {
    let decoded = decode("42");
    assert_eq!(decoded, Decoded::Raw("42".to_string()));
}
