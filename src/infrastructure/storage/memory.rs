use dashmap::DashMap;

use crate::domain::models::DeskResult;
use crate::domain::models::Storage;

/// Process local storage. Nothing survives the process.
#[derive(Default)]
pub struct MemoryStorage {
    values: DashMap<String, String>,
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> DeskResult<Option<String>> {
        return Ok(self.values.get(key).map(|val| return val.to_string()));
    }

    fn set(&self, key: &str, value: &str) -> DeskResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        return Ok(());
    }

    fn remove(&self, key: &str) -> DeskResult<()> {
        self.values.remove(key);
        return Ok(());
    }
}
