//! Notification fan-out.
//!
//! The invariant: the database insert happens first and alone decides
//! success. Push, WhatsApp, and email delivery afterwards are best-effort;
//! a dead push service must never lose a notification.

use sqlx::PgPool;

use dukkan_core::{NotificationChannel, UserId};

use crate::db::{NotificationAdminRepository, RepositoryError};
use crate::db::notifications::NotificationInput;
use crate::services::push::{BROADCAST_CHANNEL, PushClient, user_channel};
use crate::services::{EmailService, WhatsappClient};

/// Outcome of a fan-out, for the operator's feedback.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FanoutReport {
    /// Notifications inserted durably.
    pub inserted: u64,
    /// Whether the push publish succeeded.
    pub push_delivered: bool,
    /// External sends attempted (WhatsApp + email).
    pub external_sent: u64,
    /// External sends that failed.
    pub external_failed: u64,
}

/// Coordinates durable inserts with best-effort delivery channels.
pub struct Notifier<'a> {
    pool: &'a PgPool,
    push: &'a PushClient,
    whatsapp: Option<&'a WhatsappClient>,
    email: Option<&'a EmailService>,
}

impl<'a> Notifier<'a> {
    /// Create a new notifier.
    #[must_use]
    pub const fn new(
        pool: &'a PgPool,
        push: &'a PushClient,
        whatsapp: Option<&'a WhatsappClient>,
        email: Option<&'a EmailService>,
    ) -> Self {
        Self {
            pool,
            push,
            whatsapp,
            email,
        }
    }

    /// Notify a single customer: durable insert, then push on their
    /// channel, then the requested external channel.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` only when the durable insert fails;
    /// delivery failures are reported in the [`FanoutReport`].
    pub async fn notify_user(
        &self,
        user_id: UserId,
        input: &NotificationInput,
    ) -> Result<FanoutReport, RepositoryError> {
        let repo = NotificationAdminRepository::new(self.pool);
        let notification_id = repo.insert(user_id, input).await?;

        let payload = serde_json::json!({
            "notification_id": notification_id,
            "title": input.title,
            "body": input.body,
            "link": input.link,
        });

        let push_delivered = match self
            .push
            .publish(&user_channel(user_id), "notification", &payload)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(%user_id, error = %e, "push delivery failed");
                false
            }
        };

        let mut report = FanoutReport {
            inserted: 1,
            push_delivered,
            external_sent: 0,
            external_failed: 0,
        };

        let recipient = repo.recipient(user_id).await?;
        self.deliver_external(&recipient.email, recipient.phone.as_deref(), input, &mut report)
            .await;

        Ok(report)
    }

    /// Broadcast to every customer: one bulk insert, one push on the
    /// broadcast channel, then per-customer external delivery.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` only when the durable insert fails.
    pub async fn broadcast(
        &self,
        input: &NotificationInput,
    ) -> Result<FanoutReport, RepositoryError> {
        let repo = NotificationAdminRepository::new(self.pool);
        let inserted = repo.insert_broadcast(input).await?;

        let payload = serde_json::json!({
            "title": input.title,
            "body": input.body,
            "link": input.link,
        });

        let push_delivered = match self
            .push
            .publish(BROADCAST_CHANNEL, "notification", &payload)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "broadcast push delivery failed");
                false
            }
        };

        let mut report = FanoutReport {
            inserted,
            push_delivered,
            external_sent: 0,
            external_failed: 0,
        };

        if matches!(
            input.channel,
            NotificationChannel::Whatsapp | NotificationChannel::Email
        ) {
            for recipient in repo.recipients().await? {
                self.deliver_external(
                    &recipient.email,
                    recipient.phone.as_deref(),
                    input,
                    &mut report,
                )
                .await;
            }
        }

        Ok(report)
    }

    /// Deliver over the external channel the input asks for, if that
    /// client is configured and the customer is reachable.
    async fn deliver_external(
        &self,
        email: &str,
        phone: Option<&str>,
        input: &NotificationInput,
        report: &mut FanoutReport,
    ) {
        match input.channel {
            NotificationChannel::Whatsapp => {
                let (Some(client), Some(phone)) = (self.whatsapp, phone) else {
                    return;
                };
                report.external_sent += 1;
                let message = format!("{}\n{}", input.title, input.body);
                if let Err(e) = client.send_text(phone, &message).await {
                    report.external_failed += 1;
                    tracing::warn!(error = %e, "whatsapp delivery failed");
                }
            }
            NotificationChannel::Email => {
                let Some(client) = self.email else { return };
                report.external_sent += 1;
                if let Err(e) = client.send_text(email, &input.title, &input.body).await {
                    report.external_failed += 1;
                    tracing::warn!(error = %e, "email delivery failed");
                }
            }
            NotificationChannel::InApp | NotificationChannel::Push => {}
        }
    }
}
