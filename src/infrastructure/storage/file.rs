#[cfg(test)]
#[path = "file_test.rs"]
mod tests;

use std::fs;
use std::io;
use std::path;

use crate::configuration::Config;
use crate::domain::models::DeskError;
use crate::domain::models::DeskResult;
use crate::domain::models::Storage;

/// Stores every key as its own file under the data directory.
pub struct FileStorage {
    pub dir: path::PathBuf,
}

impl Default for FileStorage {
    fn default() -> FileStorage {
        return FileStorage::new(Config::data_dir().join("storage"));
    }
}

impl FileStorage {
    pub fn new(dir: path::PathBuf) -> FileStorage {
        return FileStorage { dir };
    }

    fn get_file_path(&self, key: &str) -> DeskResult<path::PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| return c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(DeskError::Validation(format!(
                "storage key '{key}' may only contain letters, digits, '-' and '_'"
            )));
        }

        return Ok(self.dir.join(key));
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> DeskResult<Option<String>> {
        let file_path = self.get_file_path(key)?;
        match fs::read_to_string(file_path) {
            Ok(val) => return Ok(Some(val)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> DeskResult<()> {
        let file_path = self.get_file_path(key)?;
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }

        fs::write(file_path, value)?;
        return Ok(());
    }

    fn remove(&self, key: &str) -> DeskResult<()> {
        let file_path = self.get_file_path(key)?;
        if !file_path.exists() {
            return Ok(());
        }

        fs::remove_file(file_path)?;
        return Ok(());
    }
}
