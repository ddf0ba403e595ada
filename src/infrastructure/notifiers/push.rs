use async_trait::async_trait;
use owo_colors::OwoColorize;
use owo_colors::Stream;

use crate::domain::models::DeskResult;
use crate::domain::models::Notification;
use crate::domain::models::NotificationChannel;
use crate::domain::models::Notifier;

/// Writes triggered alerts straight to the terminal.
#[derive(Default)]
pub struct PushNotifier {}

impl PushNotifier {
    pub fn render(notification: &Notification) -> String {
        return format!(
            "{} {}",
            notification
                .title
                .if_supports_color(Stream::Stdout, |title| return title.bold().yellow().to_string()),
            notification.body
        );
    }
}

#[async_trait]
impl Notifier for PushNotifier {
    fn channel(&self) -> NotificationChannel {
        return NotificationChannel::Push;
    }

    #[allow(clippy::implicit_return)]
    async fn send(&self, notification: &Notification) -> DeskResult<()> {
        tracing::info!(title = %notification.title, "Push notification");
        println!("{}", PushNotifier::render(notification));
        return Ok(());
    }
}
