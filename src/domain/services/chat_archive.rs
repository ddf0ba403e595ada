#[cfg(test)]
#[path = "chat_archive_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use chrono::DateTime;
use chrono::Local;
use chrono::SecondsFormat;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ArchivedSession;
use crate::domain::models::ChatMessage;
use crate::domain::models::ChatSession;
use crate::domain::models::SessionKey;

/// YAML archive of chat sessions, one file per filing.
pub struct ChatArchive {
    pub dir: path::PathBuf,
}

impl Default for ChatArchive {
    fn default() -> ChatArchive {
        let dir = path::PathBuf::from(Config::get(ConfigKey::DataDir)).join("sessions");
        return ChatArchive::new(dir);
    }
}

impl ChatArchive {
    pub fn new(dir: path::PathBuf) -> ChatArchive {
        return ChatArchive { dir };
    }

    fn get_file_path(&self, key: &SessionKey) -> path::PathBuf {
        return self.dir.join(format!("{}.yaml", key.footprint()));
    }

    /// Archived sessions oldest first, trimmed to their opening question.
    pub async fn list(&self) -> Result<Vec<ArchivedSession>> {
        let mut sessions: Vec<ArchivedSession> = vec![];
        if !self.dir.exists() {
            return Ok(sessions);
        }

        let mut dir = fs::read_dir(&self.dir).await?;
        while let Some(file) = dir.next_entry().await? {
            let payload = fs::read_to_string(file.path()).await?;
            let mut archived: ArchivedSession = match serde_yaml::from_str(&payload) {
                Ok(archived) => archived,
                Err(err) => {
                    tracing::warn!(path = ?file.path(), error = %err, "Skipping unreadable session");
                    continue;
                }
            };

            archived.session.messages = archived
                .session
                .messages
                .iter()
                .find(|message| return message.is_user())
                .cloned()
                .into_iter()
                .collect::<Vec<ChatMessage>>();
            sessions.push(archived);
        }

        sessions.sort_by_cached_key(|archived| {
            return DateTime::parse_from_rfc3339(&archived.timestamp).ok();
        });

        return Ok(sessions);
    }

    pub async fn load(&self, key: &SessionKey) -> Result<Option<ChatSession>> {
        let file_path = self.get_file_path(key);
        if !file_path.exists() {
            return Ok(None);
        }

        let payload = fs::read_to_string(file_path).await?;
        let archived: ArchivedSession = serde_yaml::from_str(&payload)?;

        return Ok(Some(archived.session));
    }

    pub async fn save(&self, key: &SessionKey, session: &ChatSession) -> Result<()> {
        let archived = ArchivedSession {
            key: key.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
            session: session.clone(),
        };

        let payload = serde_yaml::to_string(&archived)?;

        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).await?;
        }

        let mut file = fs::File::create(self.get_file_path(key)).await?;
        file.write_all(payload.as_bytes()).await?;

        return Ok(());
    }

    pub async fn delete(&self, key: &SessionKey) -> Result<()> {
        let file_path = self.get_file_path(key);
        if !file_path.exists() {
            return Ok(());
        }

        fs::remove_file(file_path).await?;
        return Ok(());
    }

    pub async fn delete_all(&self) -> Result<()> {
        if !self.dir.exists() {
            return Ok(());
        }

        fs::remove_dir_all(&self.dir).await?;
        return Ok(());
    }
}
