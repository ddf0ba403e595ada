#[cfg(test)]
#[path = "email_test.rs"]
mod tests;

use async_trait::async_trait;
use serde::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::DeskError;
use crate::domain::models::DeskResult;
use crate::domain::models::Notification;
use crate::domain::models::NotificationChannel;
use crate::domain::models::Notifier;

#[derive(Debug, Serialize)]
struct EmailRequest<'a> {
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

/// Hands notifications to an HTTP mail relay.
pub struct EmailNotifier {
    url: String,
    token: String,
    to: String,
    client: reqwest::Client,
}

impl Default for EmailNotifier {
    fn default() -> EmailNotifier {
        return EmailNotifier::new(
            &Config::get(ConfigKey::EmailUrl),
            &Config::get(ConfigKey::EmailToken),
            &Config::get(ConfigKey::EmailTo),
        );
    }
}

impl EmailNotifier {
    pub fn new(url: &str, token: &str, to: &str) -> EmailNotifier {
        return EmailNotifier {
            url: url.to_string(),
            token: token.to_string(),
            to: to.to_string(),
            client: reqwest::Client::new(),
        };
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn channel(&self) -> NotificationChannel {
        return NotificationChannel::Email;
    }

    #[allow(clippy::implicit_return)]
    async fn send(&self, notification: &Notification) -> DeskResult<()> {
        let req = EmailRequest {
            to: &self.to,
            subject: &notification.title,
            body: &notification.body,
        };

        let mut builder = self.client.post(&self.url).json(&req);
        if !self.token.is_empty() {
            builder = builder.bearer_auth(&self.token);
        }

        let res = builder.send().await?;
        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "Email relay rejected notification");
            return Err(DeskError::TransientNetwork(format!(
                "Email relay returned status {}",
                res.status().as_u16()
            )));
        }

        tracing::debug!(to = %self.to, subject = %notification.title, "Email sent");
        return Ok(());
    }
}
