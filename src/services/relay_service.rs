use crate::config::Config;
use crate::domain::phone::{normalize_phone, whatsapp_link, whatsapp_link_with_text};
use crate::domain::submission::Submission;
use crate::error::AppError;
use crate::services::provider::{NotificationProvider, ProviderError, ProviderReceipt};
use crate::services::render;
use opentelemetry::{KeyValue, global, metrics::Counter};
use std::sync::Arc;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

#[derive(Clone, Debug)]
struct Metrics {
    submissions_total: Counter<u64>,
    delivered_total: Counter<u64>,
    fallback_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("nabla-relay");
        Self {
            submissions_total: meter
                .u64_counter("relay_submissions_total")
                .with_description("Submissions accepted for relay")
                .build(),
            delivered_total: meter
                .u64_counter("relay_delivered_total")
                .with_description("Notifications accepted by the provider")
                .build(),
            fallback_total: meter
                .u64_counter("relay_fallback_total")
                .with_description("Provider rejections answered with a fallback response")
                .build(),
        }
    }
}

/// Terminal result of one relay attempt. `Fallback` is a first-class outcome:
/// the submission was received even though delivery failed.
#[derive(Debug, Clone)]
pub enum RelayOutcome {
    Delivered {
        message_id: i64,
        /// WhatsApp link enriched with the pre-filled welcome text.
        whatsapp_link: String,
        timestamp: String,
        phone: String,
        message_length: usize,
    },
    Fallback {
        description: String,
        /// Plain link, no welcome text.
        whatsapp_link: String,
    },
}

#[derive(Clone, Debug)]
pub struct RelayService {
    provider: Arc<dyn NotificationProvider>,
    expose_faults: bool,
    metrics: Metrics,
}

impl RelayService {
    #[must_use]
    pub fn new(provider: Arc<dyn NotificationProvider>, config: &Config) -> Self {
        Self { provider, expose_faults: config.server.dev_mode, metrics: Metrics::new() }
    }

    /// Relays one validated submission: configuration check, phone
    /// normalization, rendering, a single dispatch attempt, outcome
    /// classification. Exactly one provider call, never retried.
    ///
    /// # Errors
    /// `AppError::Configuration` when credentials are missing;
    /// `AppError::Internal` for transport faults or unreadable replies.
    pub async fn handle(&self, submission: &Submission) -> Result<RelayOutcome, AppError> {
        if !self.provider.is_configured() {
            return Err(AppError::Configuration);
        }

        let phone = normalize_phone(&submission.customer.whatsapp);
        let link = whatsapp_link(&phone);
        let sent_at = OffsetDateTime::now_utc();
        let text = render::notification_text(submission, &phone, &link, sent_at);

        let kind = submission.kind.as_str();
        self.metrics.submissions_total.add(1, &[KeyValue::new("kind", kind)]);
        tracing::info!(
            kind,
            customer = %submission.customer.name,
            message_length = text.chars().count(),
            "Relaying submission"
        );

        match self.provider.send_text(&text).await {
            Ok(ProviderReceipt::Accepted { message_id }) => {
                self.metrics.delivered_total.add(1, &[KeyValue::new("kind", kind)]);
                tracing::info!(message_id, "Provider accepted notification");
                let welcome = render::welcome_text(submission);
                Ok(RelayOutcome::Delivered {
                    message_id,
                    whatsapp_link: whatsapp_link_with_text(&phone, &welcome),
                    timestamp: OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default(),
                    phone,
                    message_length: text.chars().count(),
                })
            }
            Ok(ProviderReceipt::Rejected { description }) => {
                self.metrics.fallback_total.add(1, &[KeyValue::new("kind", kind)]);
                tracing::error!(
                    kind,
                    customer = %submission.customer.name,
                    error = %description,
                    "Provider rejected notification, answering with fallback"
                );
                Ok(RelayOutcome::Fallback { description, whatsapp_link: link })
            }
            Err(ProviderError::NotConfigured) => Err(AppError::Configuration),
            Err(ProviderError::Transport(e)) => Err(self.internal(&e)),
        }
    }

    fn internal(&self, fault: &anyhow::Error) -> AppError {
        AppError::Internal { error: fault.to_string(), stack: self.expose_faults.then(|| format!("{fault:?}")) }
    }
}
