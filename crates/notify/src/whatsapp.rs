use models::contact::to_international_whatsapp;
use reqwest::Client;
use serde_json::Value;

use crate::outcome::ChannelOutcome;

/// Template SID shipped in the sample .env; treated the same as no SID.
const PLACEHOLDER_SID: &str = "ACxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx";

/// WhatsApp messages over the Twilio REST API.
///
/// The channel only fires when explicitly enabled AND real credentials are
/// present; anything else is reported as skipped.
#[derive(Debug, Clone)]
pub struct WhatsAppChannel {
    enabled: bool,
    account_sid: Option<String>,
    auth_token: Option<String>,
    from: Option<String>,
    http: Client,
}

impl WhatsAppChannel {
    pub fn new(
        enabled: bool,
        account_sid: Option<String>,
        auth_token: Option<String>,
        from: Option<String>,
        http: Client,
    ) -> Self {
        Self {
            enabled,
            account_sid,
            auth_token,
            from,
            http,
        }
    }

    fn credentials(&self) -> Option<(&str, &str, &str)> {
        let sid = self
            .account_sid
            .as_deref()
            .filter(|sid| !sid.is_empty() && *sid != PLACEHOLDER_SID)?;
        let token = self.auth_token.as_deref().filter(|t| !t.is_empty())?;
        let from = self.from.as_deref().filter(|f| !f.is_empty())?;
        Some((sid, token, from))
    }

    pub async fn send(&self, to_local_number: &str, body: String) -> ChannelOutcome {
        if !self.enabled {
            return ChannelOutcome::skipped("WhatsApp desactivado por configuración");
        }
        let Some((sid, token, from)) = self.credentials() else {
            return ChannelOutcome::skipped("WhatsApp no configurado");
        };

        let to = format!("whatsapp:{}", to_international_whatsapp(to_local_number));
        let url = format!("https://api.twilio.com/2010-04-01/Accounts/{sid}/Messages.json");
        let form = [("From", from), ("To", to.as_str()), ("Body", body.as_str())];

        let response = self
            .http
            .post(&url)
            .basic_auth(sid, Some(token))
            .form(&form)
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => {
                let message_id = response
                    .json::<Value>()
                    .await
                    .ok()
                    .and_then(|body| body.get("sid").and_then(Value::as_str).map(String::from));
                ChannelOutcome::sent(message_id)
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                ChannelOutcome::failed(format!("Twilio respondió {status}: {body}"))
            }
            Err(err) => ChannelOutcome::failed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_flag_wins_over_credentials() {
        let channel = WhatsAppChannel::new(
            false,
            Some("AC123".into()),
            Some("token".into()),
            Some("whatsapp:+14155238886".into()),
            Client::new(),
        );
        let outcome = channel.send("0991234567", "hola".into()).await;
        assert!(matches!(outcome, ChannelOutcome::Skipped { .. }));
    }

    #[tokio::test]
    async fn placeholder_sid_is_a_skip() {
        let channel = WhatsAppChannel::new(
            true,
            Some(PLACEHOLDER_SID.into()),
            Some("token".into()),
            Some("whatsapp:+14155238886".into()),
            Client::new(),
        );
        let outcome = channel.send("0991234567", "hola".into()).await;
        assert!(matches!(outcome, ChannelOutcome::Skipped { .. }));
    }
}
