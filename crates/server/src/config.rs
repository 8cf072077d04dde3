use std::env;

use notify::NotifyConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {0}")]
    InvalidVar(&'static str),
}

/// Everything the process reads from the environment, resolved once at
/// startup and passed into construction.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub cors_origin: String,
    pub festival_database_url: String,
    pub escaperoom_database_url: String,
    pub notify: NotifyConfig,
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match optional("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar("PORT"))?,
            None => 3000,
        };

        Ok(Self {
            port,
            cors_origin: optional("CORS_ORIGIN")
                .unwrap_or_else(|| "http://localhost:5173".to_string()),
            festival_database_url: required("FESTIVAL_DATABASE_URL")?,
            escaperoom_database_url: required("ESCAPEROOM_DATABASE_URL")?,
            notify: NotifyConfig {
                resend_api_key: optional("RESEND_API_KEY"),
                from_email: optional("FROM_EMAIL")
                    .unwrap_or_else(|| "onboarding@resend.dev".to_string()),
                whatsapp_enabled: optional("WHATSAPP_ENABLED")
                    .map(|value| value == "true")
                    .unwrap_or(false),
                twilio_account_sid: optional("TWILIO_ACCOUNT_SID"),
                twilio_auth_token: optional("TWILIO_AUTH_TOKEN"),
                twilio_whatsapp_from: optional("TWILIO_WHATSAPP_FROM"),
            },
        })
    }
}
