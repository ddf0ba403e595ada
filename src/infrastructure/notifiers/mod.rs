#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

mod email;
mod push;

use anyhow::bail;
use anyhow::Result;
pub use email::*;
pub use push::*;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::NotifierBox;
use crate::domain::services::validation::validate_email;

pub struct NotifierManager {}

impl NotifierManager {
    /// Push is always available. Email joins once a relay URL is configured.
    pub fn get() -> Result<Vec<NotifierBox>> {
        let mut notifiers: Vec<NotifierBox> = vec![Box::<PushNotifier>::default()];

        let email_url = Config::get(ConfigKey::EmailUrl);
        if email_url.is_empty() {
            return Ok(notifiers);
        }

        if !email_url.starts_with("http://") && !email_url.starts_with("https://") {
            bail!(format!("Email URL must be http(s), got '{email_url}'"));
        }
        let email_to = Config::get(ConfigKey::EmailTo);
        if email_to.is_empty() {
            bail!("Email URL is set but no recipient was configured with --email-to");
        }
        validate_email(&email_to)?;

        notifiers.push(Box::<EmailNotifier>::default());
        return Ok(notifiers);
    }
}
