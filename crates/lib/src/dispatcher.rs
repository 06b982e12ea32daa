//! Reply dispatch: course cards go out as carousels of at most 12, one reply call per
//! carousel, paced to stay under the platform rate limit.

use crate::card::CardComposer;
use crate::catalog::CatalogItem;
use crate::line::{LineError, Message, QuickReply, ReplyChannel};
use std::sync::Arc;
use std::time::Duration;

/// Platform limit on bubbles per carousel.
pub const MAX_CARDS_PER_MESSAGE: usize = 12;

pub const DEFAULT_PACING: Duration = Duration::from_secs(1);

pub const CAROUSEL_ALT_TEXT: &str = "แนะนำคอร์สเรียน";

/// Sends replies through a [`ReplyChannel`].
pub struct ReplyDispatcher {
    channel: Arc<dyn ReplyChannel>,
    composer: CardComposer,
    pacing: Duration,
}

impl ReplyDispatcher {
    pub fn new(channel: Arc<dyn ReplyChannel>, composer: CardComposer, pacing: Duration) -> Self {
        Self {
            channel,
            composer,
            pacing,
        }
    }

    /// One carousel message per chunk of up to [`MAX_CARDS_PER_MESSAGE`] items, order preserved.
    pub fn carousel_messages(&self, items: &[CatalogItem]) -> Vec<Message> {
        items
            .chunks(MAX_CARDS_PER_MESSAGE)
            .map(|chunk| {
                let cards = chunk.iter().map(|item| self.composer.compose(item)).collect();
                Message::carousel(CAROUSEL_ALT_TEXT, cards)
            })
            .collect()
    }

    /// Send every carousel sequentially, sleeping the pacing interval between sends (not after
    /// the last). Stops at the first failed send.
    pub async fn send_catalog(&self, reply_token: &str, items: &[CatalogItem]) -> Result<(), LineError> {
        let messages = self.carousel_messages(items);
        let total = messages.len();
        for (i, message) in messages.into_iter().enumerate() {
            log::debug!(
                "sending carousel {}/{} ({} card(s))",
                i + 1,
                total,
                message.card_count()
            );
            self.channel.reply(reply_token, vec![message]).await?;
            if i + 1 < total {
                tokio::time::sleep(self.pacing).await;
            }
        }
        Ok(())
    }

    pub async fn send_text(&self, reply_token: &str, text: &str) -> Result<(), LineError> {
        self.channel.reply(reply_token, vec![Message::text(text)]).await
    }

    pub async fn send_text_with_quick_reply(
        &self,
        reply_token: &str,
        text: &str,
        quick_reply: QuickReply,
    ) -> Result<(), LineError> {
        self.channel
            .reply(reply_token, vec![Message::text_with_quick_reply(text, quick_reply)])
            .await
    }
}
