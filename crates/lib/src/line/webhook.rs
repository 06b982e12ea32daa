//! Inbound webhook payload: `{ "events": [ { "replyToken", "message": { "text" } } ] }`.
//!
//! Only the fields the bot uses are modeled; everything else in a LINE event is ignored.

use serde::Deserialize;
use serde_json::Value;

/// Webhook POST body. `events` may be absent, null, or not an array (e.g. the console's verify
/// call); entries are decoded one by one so a malformed event cannot reject its siblings.
#[derive(Debug, Default, Deserialize)]
pub struct WebhookBody {
    #[serde(default)]
    pub events: Option<Value>,
}

impl WebhookBody {
    /// Events that decode; entries with wrong-typed fields (or null entries) are skipped.
    pub fn into_events(self) -> Vec<WebhookEvent> {
        let Some(Value::Array(entries)) = self.events else {
            return Vec::new();
        };
        entries
            .into_iter()
            .enumerate()
            .filter_map(|(i, entry)| match serde_json::from_value(entry) {
                Ok(event) => Some(event),
                Err(e) => {
                    log::debug!("webhook: skipping event {}: {}", i, e);
                    None
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(default)]
    pub reply_token: Option<String>,
    #[serde(default)]
    pub message: Option<EventMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventMessage {
    /// Present for text messages only.
    #[serde(default)]
    pub text: Option<String>,
}

/// A text event the bot can answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub message_text: String,
    pub reply_token: String,
}

impl WebhookEvent {
    /// Text and reply token, or None when either is missing or empty.
    pub fn inbound(&self) -> Option<InboundEvent> {
        let text = self.message.as_ref()?.text.as_deref()?;
        let token = self.reply_token.as_deref()?;
        if text.is_empty() || token.is_empty() {
            return None;
        }
        Some(InboundEvent {
            message_text: text.to_string(),
            reply_token: token.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_line_text_event() {
        let body: WebhookBody = serde_json::from_str(
            r#"{
                "destination": "U123",
                "events": [{
                    "type": "message",
                    "replyToken": "nHuyWiB7yP5Zw52FIkcQobQuGDXCTA",
                    "source": {"type": "user", "userId": "U4af"},
                    "timestamp": 1462629479859,
                    "message": {"type": "text", "id": "325708", "text": "ดูคอร์สทั้งหมด"}
                }]
            }"#,
        )
        .unwrap();
        let events = body.into_events();
        assert_eq!(events.len(), 1);
        let inbound = events[0].inbound().unwrap();
        assert_eq!(inbound.message_text, "ดูคอร์สทั้งหมด");
        assert_eq!(inbound.reply_token, "nHuyWiB7yP5Zw52FIkcQobQuGDXCTA");
    }

    #[test]
    fn missing_or_null_events() {
        let body: WebhookBody = serde_json::from_str(r#"{}"#).unwrap();
        assert!(body.into_events().is_empty());
        let body: WebhookBody = serde_json::from_str(r#"{"events": null}"#).unwrap();
        assert!(body.into_events().is_empty());
        let body: WebhookBody = serde_json::from_str(r#"{"events": 5}"#).unwrap();
        assert!(body.into_events().is_empty());
    }

    #[test]
    fn malformed_event_does_not_drop_siblings() {
        let body: WebhookBody = serde_json::from_str(
            r#"{"events": [
                {"replyToken": "good", "message": {"text": "bread"}},
                {"replyToken": "bad", "message": {"type": "text", "text": 123}},
                {"replyToken": 42, "message": {"text": "bread"}},
                null,
                {"replyToken": "good-2", "message": {"text": "cake"}}
            ]}"#,
        )
        .unwrap();
        let tokens: Vec<String> = body
            .into_events()
            .iter()
            .filter_map(WebhookEvent::inbound)
            .map(|e| e.reply_token)
            .collect();
        assert_eq!(tokens, vec!["good", "good-2"]);
    }

    #[test]
    fn non_text_events_are_not_inbound() {
        let sticker: WebhookEvent = serde_json::from_str(
            r#"{"replyToken": "t", "message": {"type": "sticker", "packageId": "1"}}"#,
        )
        .unwrap();
        assert!(sticker.inbound().is_none());
        let follow: WebhookEvent =
            serde_json::from_str(r#"{"type": "follow", "replyToken": "t"}"#).unwrap();
        assert!(follow.inbound().is_none());
        let no_token: WebhookEvent =
            serde_json::from_str(r#"{"message": {"text": "hi"}}"#).unwrap();
        assert!(no_token.inbound().is_none());
        let empty_text: WebhookEvent =
            serde_json::from_str(r#"{"replyToken": "t", "message": {"text": ""}}"#).unwrap();
        assert!(empty_text.inbound().is_none());
    }
}
