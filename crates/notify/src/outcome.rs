use serde::Serialize;

/// What happened to one delivery attempt on one channel.
///
/// Channels never fail the request that triggered them: misconfiguration is
/// a `Skipped`, a provider error is a `Failed`, and both only surface here.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChannelOutcome {
    Sent {
        #[serde(skip_serializing_if = "Option::is_none")]
        message_id: Option<String>,
    },
    Skipped {
        reason: String,
    },
    Failed {
        error: String,
    },
}

impl ChannelOutcome {
    pub fn sent(message_id: Option<String>) -> Self {
        Self::Sent { message_id }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }
}

/// Per-channel outcomes for one recipient.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationReport {
    pub email: ChannelOutcome,
    pub whatsapp: ChannelOutcome,
}

impl NotificationReport {
    /// Structured side-channel: callers that do not inspect the report at
    /// least leave a trace of what each channel did.
    pub fn log(&self, context: &str) {
        for (channel, outcome) in [("email", &self.email), ("whatsapp", &self.whatsapp)] {
            match outcome {
                ChannelOutcome::Sent { message_id } => {
                    log::info!("{context}: {channel} sent (id: {message_id:?})");
                }
                ChannelOutcome::Skipped { reason } => {
                    log::info!("{context}: {channel} skipped ({reason})");
                }
                ChannelOutcome::Failed { error } => {
                    log::warn!("{context}: {channel} failed ({error})");
                }
            }
        }
    }
}
