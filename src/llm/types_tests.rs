//! Unit tests for chat-completion wire types.

use super::*;
use serde_json::json;

#[test]
fn test_message_system() {
    let msg = Message::system("You are a facility advisor");
    assert_eq!(msg.role, MessageRole::System);
    assert_eq!(msg.text(), Some("You are a facility advisor"));
}

#[test]
fn test_message_assistant() {
    let msg = Message::assistant("Check the filter first.");
    assert_eq!(msg.role, MessageRole::Assistant);
    assert_eq!(msg.text(), Some("Check the filter first."));
}

#[test]
fn test_text_message_serializes_as_string() {
    let value = serde_json::to_value(Message::user("Why is AHU-2 noisy?")).unwrap();
    assert_eq!(value, json!({"role": "user", "content": "Why is AHU-2 noisy?"}));
}

#[test]
fn test_parts_message_serialization() {
    let msg = Message::user_parts(vec![
        ContentPart::text("Analyze these 1 photo(s)"),
        ContentPart::image("data:image/png;base64,AAAA"),
    ]);
    assert_eq!(msg.text(), None);

    let value = serde_json::to_value(&msg).unwrap();
    assert_eq!(
        value,
        json!({
            "role": "user",
            "content": [
                {"type": "text", "text": "Analyze these 1 photo(s)"},
                {"type": "image_url", "image_url": {"url": "data:image/png;base64,AAAA"}}
            ]
        })
    );
}

#[test]
fn test_parts_message_deserialization() {
    let msg: Message = serde_json::from_value(json!({
        "role": "user",
        "content": [{"type": "image_url", "image_url": {"url": "data:image/jpeg;base64,/9j/"}}]
    }))
    .unwrap();
    assert_eq!(
        msg.content,
        MessageContent::Parts(vec![ContentPart::image("data:image/jpeg;base64,/9j/")])
    );
}

#[test]
fn test_chat_request_defaults() {
    let req = ChatCompletionRequest::new("google/gemini-2.5-flash", vec![Message::user("hi")]);
    assert_eq!(req.temperature, 0.7);
    assert_eq!(req.max_tokens, 2000);

    let value = serde_json::to_value(&req).unwrap();
    assert_eq!(value["model"], "google/gemini-2.5-flash");
    assert_eq!(value["max_tokens"], 2000);
}

#[test]
fn test_chat_request_builders() {
    let req = ChatCompletionRequest::new("m", vec![])
        .with_temperature(0.2)
        .with_max_tokens(512);
    assert_eq!(req.temperature, 0.2);
    assert_eq!(req.max_tokens, 512);
}

#[test]
fn test_response_first_content() {
    let resp: ChatCompletionResponse = serde_json::from_value(json!({
        "choices": [
            {"message": {"role": "assistant", "content": "first"}, "finish_reason": "stop"},
            {"message": {"role": "assistant", "content": "second"}}
        ],
        "model": "google/gemini-2.5-flash",
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    }))
    .unwrap();
    assert_eq!(resp.first_content(), Some("first"));
    assert_eq!(resp.usage.unwrap().total_tokens, Some(15));
}

#[test]
fn test_response_null_content_reads_as_empty() {
    let resp: ChatCompletionResponse =
        serde_json::from_value(json!({"choices": [{"message": {"content": null}}]})).unwrap();
    assert_eq!(resp.first_content(), Some(""));
}

#[test]
fn test_response_without_choices() {
    let resp: ChatCompletionResponse = serde_json::from_value(json!({})).unwrap();
    assert!(resp.choices.is_empty());
    assert_eq!(resp.first_content(), None);
}
