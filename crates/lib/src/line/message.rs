//! Outbound reply messages: plain text (optionally with quick-reply chips) and flex carousels.

use crate::line::flex::{Action, Bubble, Carousel};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    Text {
        text: String,
        #[serde(rename = "quickReply", skip_serializing_if = "Option::is_none")]
        quick_reply: Option<QuickReply>,
    },
    Flex {
        #[serde(rename = "altText")]
        alt_text: String,
        contents: Carousel,
    },
}

impl Message {
    pub fn text(text: impl Into<String>) -> Self {
        Message::Text {
            text: text.into(),
            quick_reply: None,
        }
    }

    pub fn text_with_quick_reply(text: impl Into<String>, quick_reply: QuickReply) -> Self {
        Message::Text {
            text: text.into(),
            quick_reply: Some(quick_reply),
        }
    }

    /// Flex message wrapping a carousel of the given bubbles.
    pub fn carousel(alt_text: impl Into<String>, bubbles: Vec<Bubble>) -> Self {
        Message::Flex {
            alt_text: alt_text.into(),
            contents: Carousel::new(bubbles),
        }
    }

    /// Number of bubbles for flex messages, 0 for text.
    pub fn card_count(&self) -> usize {
        match self {
            Message::Flex { contents, .. } => contents.contents.len(),
            Message::Text { .. } => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickReply {
    pub items: Vec<QuickReplyItem>,
}

impl QuickReply {
    /// One chip per phrase; tapping a chip sends the phrase as a message.
    pub fn from_phrases(phrases: &[&str]) -> Self {
        Self {
            items: phrases.iter().map(|p| QuickReplyItem::message(p)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickReplyItem {
    #[serde(rename = "type")]
    pub typ: String,
    pub action: Action,
}

impl QuickReplyItem {
    pub fn message(phrase: &str) -> Self {
        Self {
            typ: "action".to_string(),
            action: Action::Message {
                label: phrase.to_string(),
                text: phrase.to_string(),
            },
        }
    }
}
