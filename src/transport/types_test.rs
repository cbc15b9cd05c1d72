use super::*;

#[test]
fn status_error_includes_body_when_present() {
    let err = TransportError::Status { status: 500, body: Some("{\"error\":\"no key\"}".into()) };
    assert_eq!(err.to_string(), "HTTP 500: {\"error\":\"no key\"}");
}

#[test]
fn status_error_without_body_is_code_only() {
    let err = TransportError::Status { status: 503, body: None };
    assert_eq!(err.to_string(), "HTTP 503");

    let blank = TransportError::Status { status: 502, body: Some("  ".into()) };
    assert_eq!(blank.to_string(), "HTTP 502");
}

#[test]
fn message_serializes_with_lowercase_role() {
    let json = serde_json::to_value(Message::user("hi")).unwrap();
    assert_eq!(json, serde_json::json!({ "role": "user", "content": "hi" }));

    let json = serde_json::to_value(Message::assistant("yo")).unwrap();
    assert_eq!(json["role"], "assistant");
}

#[test]
fn chat_request_wire_shape() {
    let request = ChatRequest {
        model: "claude-sonnet-4-20250514".into(),
        max_tokens: 1024,
        messages: vec![Message::user("a"), Message::assistant("b")],
    };
    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "model": "claude-sonnet-4-20250514",
            "max_tokens": 1024,
            "messages": [
                { "role": "user", "content": "a" },
                { "role": "assistant", "content": "b" }
            ]
        })
    );
}

#[test]
fn role_as_str_matches_wire_name() {
    assert_eq!(Role::User.as_str(), "user");
    assert_eq!(Role::Assistant.as_str(), "assistant");
}
