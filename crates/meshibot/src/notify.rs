// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP reply sink.
//!
//! Rendered replies are POSTed as JSON to a configured endpoint together
//! with the reply address from the inbound event. The endpoint owns the
//! chat-platform specifics (message formats, signatures, retry policy).

use std::time::Duration;

use async_trait::async_trait;
use meshibot_core::{MeshibotError, NotificationSink, OutboundNotification};
use serde::Serialize;
use tracing::debug;

/// JSON body POSTed to the reply endpoint.
#[derive(Debug, Serialize)]
struct ReplyRequest<'a> {
    reply_to: &'a str,
    message: &'a OutboundNotification,
}

/// Notification sink delivering replies over HTTP.
#[derive(Debug, Clone)]
pub struct HttpReplySink {
    client: reqwest::Client,
    reply_url: String,
}

impl HttpReplySink {
    pub fn new(reply_url: String) -> Result<Self, MeshibotError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| MeshibotError::Notify {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { client, reply_url })
    }
}

#[async_trait]
impl NotificationSink for HttpReplySink {
    async fn send(
        &self,
        reply_to: &str,
        message: &OutboundNotification,
    ) -> Result<(), MeshibotError> {
        let body = ReplyRequest { reply_to, message };
        let response = self
            .client
            .post(&self.reply_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| MeshibotError::Notify {
                message: format!("reply delivery failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MeshibotError::Notify {
                message: format!("reply endpoint returned {status}"),
                source: None,
            });
        }
        debug!(reply_to, "reply delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn posts_reply_with_address_and_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/reply"))
            .and(body_partial_json(serde_json::json!({
                "reply_to": "rt-123",
                "message": {"kind": "text", "text": "こんにちは"}
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let sink = HttpReplySink::new(format!("{}/reply", server.uri())).unwrap();
        sink.send(
            "rt-123",
            &OutboundNotification::Text {
                text: "こんにちは".into(),
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn non_success_status_is_a_notify_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/reply"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let sink = HttpReplySink::new(format!("{}/reply", server.uri())).unwrap();
        let result = sink
            .send(
                "rt-123",
                &OutboundNotification::Text { text: "x".into() },
            )
            .await;
        assert!(matches!(result, Err(MeshibotError::Notify { .. })));
    }
}
