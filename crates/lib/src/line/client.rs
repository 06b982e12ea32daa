//! LINE reply API client: POST /v2/bot/message/reply with a bearer channel access token.

use crate::line::channel::{LineError, ReplyChannel};
use crate::line::message::Message;
use async_trait::async_trait;
use serde::Serialize;

const LINE_API_BASE: &str = "https://api.line.me";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: Vec<Message>,
}

/// Reply client. Without a token every reply is a logged no-op.
#[derive(Clone)]
pub struct LineClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl LineClient {
    pub fn new(token: Option<String>, base_url: Option<String>) -> Self {
        let base_url = base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| LINE_API_BASE.to_string());
        Self {
            base_url,
            token,
            client: reqwest::Client::new(),
        }
    }

    /// True when a channel access token is configured.
    pub fn is_enabled(&self) -> bool {
        self.token.is_some()
    }
}

#[async_trait]
impl ReplyChannel for LineClient {
    async fn reply(&self, reply_token: &str, messages: Vec<Message>) -> Result<(), LineError> {
        let Some(ref token) = self.token else {
            log::warn!("LINE_TOKEN is not set; cannot send reply message");
            return Ok(());
        };
        let url = format!("{}/v2/bot/message/reply", self.base_url);
        let body = ReplyRequest {
            reply_token,
            messages,
        };
        let res = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(LineError::Api(format!("reply failed: {} {}", status, body)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_token_is_a_no_op() {
        let client = LineClient::new(None, Some("http://127.0.0.1:1".to_string()));
        assert!(!client.is_enabled());
        client
            .reply("token", vec![Message::text("hello")])
            .await
            .expect("no-op reply succeeds");
    }

    #[tokio::test]
    async fn api_error_carries_status() {
        let app = axum::Router::new().fallback(|| async {
            (axum::http::StatusCode::BAD_REQUEST, "Invalid reply token")
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        let client = LineClient::new(Some("t".to_string()), Some(format!("http://{}/", addr)));
        match client.reply("r", vec![Message::text("x")]).await {
            Err(LineError::Api(msg)) => {
                assert!(msg.contains("400"));
                assert!(msg.contains("Invalid reply token"));
            }
            other => panic!("expected api error, got {:?}", other),
        }
    }

    #[test]
    fn request_body_shape() {
        let body = ReplyRequest {
            reply_token: "rt",
            messages: vec![Message::text("hi")],
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["replyToken"], "rt");
        assert_eq!(v["messages"][0]["type"], "text");
        assert_eq!(v["messages"][0]["text"], "hi");
    }
}
