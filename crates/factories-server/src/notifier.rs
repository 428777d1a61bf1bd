//! HTTP change notifier — fire-and-forget POSTs to the fan-out relay.
//!
//! The relay exposes `POST /emit` with `{"event": <name>, "data": <payload>}`
//! and broadcasts the event to every connected subscriber. Delivery is
//! advisory; subscribers refetch rather than trusting the payload.

use std::time::Duration;

use async_trait::async_trait;
use factories_core::ports::ChangeNotifier;
use reqwest::Client;

pub const DEFAULT_NOTIFY_URL: &str = "http://127.0.0.1:4000";

/// Cap per-publish wait so a dead relay cannot stall request handling.
const EMIT_TIMEOUT: Duration = Duration::from_secs(2);

pub struct HttpNotifier {
    client: Client,
    emit_url: String,
}

impl HttpNotifier {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            emit_url: format!("{}/emit", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl ChangeNotifier for HttpNotifier {
    async fn publish(&self, event: &str, payload: serde_json::Value) -> anyhow::Result<()> {
        let resp = self
            .client
            .post(&self.emit_url)
            .timeout(EMIT_TIMEOUT)
            .json(&serde_json::json!({ "event": event, "data": payload }))
            .send()
            .await?;
        resp.error_for_status()?;
        tracing::debug!(event, "change notification published");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_url_strips_trailing_slash() {
        let n = HttpNotifier::new("http://relay:4000/");
        assert_eq!(n.emit_url, "http://relay:4000/emit");
    }

    #[tokio::test]
    async fn unreachable_relay_reports_error() {
        // Reserved TEST-NET address; nothing listens there.
        let n = HttpNotifier::new("http://192.0.2.1:1");
        let result = n
            .publish("factories-updated", serde_json::json!({ "id": 1 }))
            .await;
        assert!(result.is_err());
    }
}
