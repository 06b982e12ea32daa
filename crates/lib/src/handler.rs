//! Per-event handling: fetch catalog, classify, reply. Each event is independent; a batch is
//! fanned out to one task per event and failures are logged per event.

use crate::card::CardComposer;
use crate::catalog::{fetch_active_catalog, CatalogStore};
use crate::config::FeatureFlags;
use crate::dispatcher::ReplyDispatcher;
use crate::line::{LineError, QuickReply, ReplyChannel, WebhookEvent};
use crate::matcher::{Intent, IntentMatcher, LIST_ALL_TRIGGER};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

pub const NOT_FOUND_TEXT: &str = "ไม่พบคอร์สที่เกี่ยวข้องค่ะ";

pub const NOT_FOUND_QUICK_REPLY_TEXT: &str = "ไม่พบคอร์สที่เกี่ยวข้อง ลองเลือกจากเมนูด้านล่างนะคะ 👇";

/// Suggestion chips attached to the not-found reply.
pub const SUGGESTIONS: [&str; 3] = [LIST_ALL_TRIGGER, "หมวดหมู่ เบเกอรี่", "หมวดหมู่ เค้ก"];

/// Short, log-safe prefix of a reply token.
fn token_tag(reply_token: &str) -> String {
    reply_token.chars().take(8).collect()
}

pub struct EventHandler {
    store: Arc<dyn CatalogStore>,
    matcher: IntentMatcher,
    dispatcher: ReplyDispatcher,
}

impl EventHandler {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        channel: Arc<dyn ReplyChannel>,
        flags: FeatureFlags,
        pacing: Duration,
    ) -> Self {
        Self {
            store,
            matcher: IntentMatcher::new(flags),
            dispatcher: ReplyDispatcher::new(channel, CardComposer::new(&flags), pacing),
        }
    }

    /// Handle one webhook event. Events without text or reply token are ignored.
    pub async fn handle_event(&self, event: &WebhookEvent) -> Result<(), LineError> {
        let Some(inbound) = event.inbound() else {
            return Ok(());
        };
        let text = inbound.message_text.to_lowercase();
        let token = inbound.reply_token.as_str();

        let catalog = fetch_active_catalog(self.store.as_ref()).await;
        let intent = self.matcher.classify(&text, &catalog);
        log::debug!("event {}: {}", token_tag(token), intent_label(&intent));

        match intent {
            Intent::ShowItems(items) => self.dispatcher.send_catalog(token, &items).await,
            Intent::Prompt(reply) => self.dispatcher.send_text(token, &reply).await,
            Intent::NotFoundWithQuickReply => {
                self.dispatcher
                    .send_text_with_quick_reply(
                        token,
                        NOT_FOUND_QUICK_REPLY_TEXT,
                        QuickReply::from_phrases(&SUGGESTIONS),
                    )
                    .await
            }
            Intent::NotFoundPlain => self.dispatcher.send_text(token, NOT_FOUND_TEXT).await,
        }
    }

    /// Spawn one task per event. Errors are logged inside each task and never surface to the caller.
    pub fn handle_batch(self: &Arc<Self>, events: Vec<WebhookEvent>) -> Vec<JoinHandle<()>> {
        events
            .into_iter()
            .map(|event| {
                let handler = Arc::clone(self);
                tokio::spawn(async move {
                    if let Err(e) = handler.handle_event(&event).await {
                        let tag = event
                            .reply_token
                            .as_deref()
                            .map(token_tag)
                            .unwrap_or_default();
                        log::warn!("event {}: reply failed: {}", tag, e);
                    }
                })
            })
            .collect()
    }
}

fn intent_label(intent: &Intent) -> String {
    match intent {
        Intent::ShowItems(items) => format!("showing {} course(s)", items.len()),
        Intent::Prompt(_) => "prompt".to_string(),
        Intent::NotFoundWithQuickReply => "not found (quick reply)".to_string(),
        Intent::NotFoundPlain => "not found".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogDocument, CatalogError, CatalogItem};
    use crate::line::{EventMessage, Message};
    use crate::matcher::CATEGORY_MISSING_TEXT;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    struct FixedStore(Vec<CatalogDocument>);

    #[async_trait]
    impl CatalogStore for FixedStore {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn fetch_documents(&self) -> Result<Vec<CatalogDocument>, CatalogError> {
            Ok(self.0.clone())
        }
    }

    /// Records replies; fails any reply whose token starts with "bad".
    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<(String, Vec<Message>)>>,
    }

    #[async_trait]
    impl ReplyChannel for Recorder {
        async fn reply(&self, reply_token: &str, messages: Vec<Message>) -> Result<(), LineError> {
            if reply_token.starts_with("bad") {
                return Err(LineError::Api("reply failed: 400 Invalid reply token".into()));
            }
            self.sent.lock().await.push((reply_token.to_string(), messages));
            Ok(())
        }
    }

    fn catalog() -> Vec<CatalogDocument> {
        vec![
            CatalogDocument {
                item: CatalogItem {
                    id: "bread".into(),
                    title: "Bread Baking".into(),
                    keywords: "bread,baking".into(),
                    category: "bakery".into(),
                    ..Default::default()
                },
                active: true,
            },
            CatalogDocument {
                item: CatalogItem {
                    id: "retired".into(),
                    title: "Bread Masterclass".into(),
                    keywords: "bread".into(),
                    category: "bakery".into(),
                    ..Default::default()
                },
                active: false,
            },
        ]
    }

    fn setup(flags: FeatureFlags) -> (Arc<EventHandler>, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let handler = EventHandler::new(
            Arc::new(FixedStore(catalog())),
            recorder.clone(),
            flags,
            Duration::from_millis(1),
        );
        (Arc::new(handler), recorder)
    }

    fn event(text: Option<&str>, token: Option<&str>) -> WebhookEvent {
        WebhookEvent {
            reply_token: token.map(String::from),
            message: Some(EventMessage {
                text: text.map(String::from),
            }),
        }
    }

    #[tokio::test]
    async fn list_all_sends_only_active_cards() {
        let (handler, recorder) = setup(FeatureFlags::default());
        handler
            .handle_event(&event(Some("ดูคอร์สทั้งหมด"), Some("t1")))
            .await
            .unwrap();
        let sent = recorder.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1[0].card_count(), 1);
    }

    #[tokio::test]
    async fn text_is_lowercased_before_matching() {
        let (handler, recorder) = setup(FeatureFlags::default());
        handler
            .handle_event(&event(Some("BREAD"), Some("t1")))
            .await
            .unwrap();
        assert_eq!(recorder.sent.lock().await[0].1[0].card_count(), 1);
    }

    #[tokio::test]
    async fn missing_fields_are_ignored() {
        let (handler, recorder) = setup(FeatureFlags::default());
        handler.handle_event(&event(None, Some("t1"))).await.unwrap();
        handler.handle_event(&event(Some("bread"), None)).await.unwrap();
        handler.handle_event(&WebhookEvent::default()).await.unwrap();
        assert!(recorder.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn category_prompt_is_plain_text() {
        let (handler, recorder) = setup(FeatureFlags::default());
        handler
            .handle_event(&event(Some("หมวดหมู่"), Some("t1")))
            .await
            .unwrap();
        let sent = recorder.sent.lock().await;
        assert_eq!(sent[0].1, vec![Message::text(CATEGORY_MISSING_TEXT)]);
    }

    #[tokio::test]
    async fn not_found_with_quick_reply() {
        let (handler, recorder) = setup(FeatureFlags::default());
        handler.handle_event(&event(Some("zzz"), Some("t1"))).await.unwrap();
        let sent = recorder.sent.lock().await;
        assert_eq!(
            sent[0].1,
            vec![Message::text_with_quick_reply(
                NOT_FOUND_QUICK_REPLY_TEXT,
                QuickReply::from_phrases(&SUGGESTIONS)
            )]
        );
    }

    #[tokio::test]
    async fn not_found_plain() {
        let (handler, recorder) = setup(FeatureFlags {
            quick_reply: false,
            ..FeatureFlags::default()
        });
        handler.handle_event(&event(Some("zzz"), Some("t1"))).await.unwrap();
        assert_eq!(
            recorder.sent.lock().await[0].1,
            vec![Message::text(NOT_FOUND_TEXT)]
        );
    }

    #[tokio::test]
    async fn batch_failure_does_not_affect_siblings() {
        let (handler, recorder) = setup(FeatureFlags::default());
        let handles = handler.handle_batch(vec![
            event(Some("bread"), Some("bad-token")),
            event(Some("bread"), Some("good-1")),
            event(None, Some("good-2")),
            event(Some("zzz"), Some("good-3")),
        ]);
        for h in handles {
            h.await.expect("task does not panic");
        }
        let mut tokens: Vec<String> = recorder
            .sent
            .lock()
            .await
            .iter()
            .map(|(t, _)| t.clone())
            .collect();
        tokens.sort();
        assert_eq!(tokens, vec!["good-1", "good-3"]);
    }

    #[test]
    fn token_tag_is_char_safe() {
        assert_eq!(token_tag("abcdefghijkl"), "abcdefgh");
        assert_eq!(token_tag("สวัสดีครับผม"), "สวัสดีคร");
        assert_eq!(token_tag(""), "");
    }
}
