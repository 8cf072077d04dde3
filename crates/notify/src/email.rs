use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::outcome::ChannelOutcome;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";
/// Template key shipped in the sample .env; treated the same as no key.
const PLACEHOLDER_API_KEY: &str = "re_xxxxxxxxxxxxxxxxxxxxxxxxxx";

#[derive(Debug, Serialize)]
pub struct Attachment {
    pub filename: String,
    /// Base64 of the file body, as the provider expects.
    pub content: String,
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
    pub disposition: &'static str,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<Attachment>,
}

/// Transactional email over the Resend REST API.
#[derive(Debug, Clone)]
pub struct EmailChannel {
    api_key: Option<String>,
    from: String,
    http: Client,
}

impl EmailChannel {
    pub fn new(api_key: Option<String>, from: String, http: Client) -> Self {
        Self {
            api_key,
            from,
            http,
        }
    }

    fn usable_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }

    pub async fn send(
        &self,
        to: &str,
        subject: &str,
        html: &str,
        attachments: Vec<Attachment>,
    ) -> ChannelOutcome {
        let Some(api_key) = self.usable_key() else {
            return ChannelOutcome::skipped("Email no configurado");
        };

        let request = SendRequest {
            from: &self.from,
            to,
            subject,
            html,
            attachments,
        };

        let response = self
            .http
            .post(RESEND_ENDPOINT)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => {
                let message_id = response
                    .json::<Value>()
                    .await
                    .ok()
                    .and_then(|body| body.get("id").and_then(Value::as_str).map(String::from));
                ChannelOutcome::sent(message_id)
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                ChannelOutcome::failed(format!("Resend respondió {status}: {body}"))
            }
            Err(err) => ChannelOutcome::failed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_is_a_skip_not_a_failure() {
        let channel = EmailChannel::new(None, "tickets@example.com".into(), Client::new());
        let outcome = channel.send("a@b.ec", "hola", "<p>hola</p>", vec![]).await;
        assert!(matches!(outcome, ChannelOutcome::Skipped { .. }));
    }

    #[tokio::test]
    async fn placeholder_key_is_a_skip() {
        let channel = EmailChannel::new(
            Some(PLACEHOLDER_API_KEY.into()),
            "tickets@example.com".into(),
            Client::new(),
        );
        let outcome = channel.send("a@b.ec", "hola", "<p>hola</p>", vec![]).await;
        assert!(matches!(outcome, ChannelOutcome::Skipped { .. }));
    }
}
