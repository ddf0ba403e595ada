use super::DeskResult;

/// Synchronous string key-value storage that outlives the process.
pub trait Storage {
    fn get(&self, key: &str) -> DeskResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> DeskResult<()>;
    fn remove(&self, key: &str) -> DeskResult<()>;
}

pub type StorageBox = Box<dyn Storage + Send + Sync>;
