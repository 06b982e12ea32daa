//! LINE Messaging API channel: webhook payloads in, reply messages out.
//!
//! The gateway parses webhook deliveries into [`WebhookBody`]; replies go through a
//! [`ReplyChannel`], implemented for the real API by [`LineClient`].

mod channel;
mod client;
mod flex;
mod message;
mod webhook;

pub use channel::{LineError, ReplyChannel};
pub use client::LineClient;
pub use flex::{Action, Bubble, BubbleStyles, Carousel, FlexComponent, SectionStyle};
pub use message::{Message, QuickReply, QuickReplyItem};
pub use webhook::{EventMessage, InboundEvent, WebhookBody, WebhookEvent};
