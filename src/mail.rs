use anyhow::Context;
use axum::async_trait;
use serde::Serialize;

/// Outbound mail collaborator. The caller never consumes a delivery status
/// beyond logging; failures must not fail the surrounding operation.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Serialize)]
struct OutboundMail<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

/// Mailer that posts JSON to an HTTP mail relay.
#[derive(Clone)]
pub struct RelayMailer {
    http: reqwest::Client,
    relay_url: String,
    from: String,
}

impl RelayMailer {
    pub fn new(relay_url: &str, from: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            relay_url: relay_url.to_string(),
            from: from.to_string(),
        }
    }
}

#[async_trait]
impl Mailer for RelayMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        let response = self
            .http
            .post(&self.relay_url)
            .json(&OutboundMail {
                from: &self.from,
                to,
                subject,
                body,
            })
            .send()
            .await
            .context("mail relay request")?;

        if !response.status().is_success() {
            anyhow::bail!("mail relay returned {}", response.status());
        }
        Ok(())
    }
}

/// Mailer that drops everything; used by `AppState::fake`.
#[derive(Clone)]
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outbound_mail_serializes_all_fields() {
        let mail = OutboundMail {
            from: "no-reply@helpnet.local",
            to: "a@x.com",
            subject: "Reset your password",
            body: "hello",
        };
        let json = serde_json::to_string(&mail).unwrap();
        assert!(json.contains("no-reply@helpnet.local"));
        assert!(json.contains("a@x.com"));
        assert!(json.contains("Reset your password"));
    }
}
