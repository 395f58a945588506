//! Alert delivery via SMTP.

use async_trait::async_trait;
use firewall_core::{Alert, Config};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;

use super::AlertNotifier;
use crate::error::{ServiceError, ServiceResult};

/// Alert notifier sending plain-text mail to a fixed recipient list
#[derive(Clone)]
pub struct EmailNotifier {
    mailer: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
    recipients: Vec<Mailbox>,
}

impl EmailNotifier {
    /// Create the notifier from config. Fails if SMTP host, sender or
    /// recipients are missing or unparsable.
    pub fn from_config(config: &Config) -> ServiceResult<Self> {
        let host = config
            .smtp_host
            .as_deref()
            .ok_or_else(|| ServiceError::Config("SMTP_HOST not configured".to_string()))?;
        let from: Mailbox = config
            .smtp_from
            .as_deref()
            .ok_or_else(|| ServiceError::Config("SMTP_FROM not configured".to_string()))?
            .parse()
            .map_err(|e| ServiceError::Config(format!("Invalid SMTP_FROM: {}", e)))?;
        let recipients = parse_recipients(&config.alert_recipients)?;
        let port = config.smtp_port;

        let credentials = match (config.smtp_user.as_deref(), config.smtp_password.as_deref()) {
            (Some(u), Some(p)) => Some(Credentials::new(u.to_string(), p.to_string())),
            _ => None,
        };

        let mailer = if config.smtp_tls {
            let b = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .map_err(|e| ServiceError::Config(format!("Invalid SMTP relay: {}", e)))?
                .port(port);
            let b = match credentials {
                Some(c) => b.credentials(c),
                None => b,
            };
            tracing::info!(
                host = %host,
                port = port,
                "Email notifier initialized (SMTP with STARTTLS)"
            );
            b.build()
        } else {
            let b = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(port);
            let b = match credentials {
                Some(c) => b.credentials(c),
                None => b,
            };
            tracing::info!(host = %host, port = port, "Email notifier initialized (SMTP)");
            b.build()
        };

        Ok(Self {
            mailer: Arc::new(mailer),
            from,
            recipients,
        })
    }

    fn build_message(&self, alert: &Alert) -> ServiceResult<Message> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(alert.subject.as_str());
        for mb in &self.recipients {
            builder = builder.to(mb.clone());
        }
        builder
            .header(ContentType::TEXT_PLAIN)
            .body(alert.body.clone())
            .map_err(|e| ServiceError::Notification(e.to_string()))
    }
}

fn parse_recipients(addresses: &[String]) -> ServiceResult<Vec<Mailbox>> {
    let recipients = addresses
        .iter()
        .map(|s| {
            s.parse::<Mailbox>()
                .map_err(|e| ServiceError::Config(format!("Invalid recipient {}: {}", s, e)))
        })
        .collect::<ServiceResult<Vec<_>>>()?;

    if recipients.is_empty() {
        return Err(ServiceError::Config(
            "ALERT_RECIPIENTS must contain at least one address".to_string(),
        ));
    }
    Ok(recipients)
}

#[async_trait]
impl AlertNotifier for EmailNotifier {
    async fn publish(&self, alert: &Alert) -> ServiceResult<()> {
        let email = self.build_message(alert)?;

        self.mailer.send(email).await.map_err(|e| {
            tracing::error!(error = %e, "Alert email failed");
            ServiceError::Notification(e.to_string())
        })?;

        tracing::info!(count = self.recipients.len(), "Quarantine alert email sent");
        Ok(())
    }
}
