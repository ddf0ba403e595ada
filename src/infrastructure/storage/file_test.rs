use anyhow::Result;
use uuid::Uuid;

use super::FileStorage;
use crate::domain::models::DeskError;
use crate::domain::models::Storage;

fn storage() -> FileStorage {
    let dir = std::env::temp_dir()
        .join("filingsdesk-tests")
        .join(Uuid::new_v4().to_string());
    return FileStorage::new(dir);
}

#[test]
fn it_reads_what_it_writes() -> Result<()> {
    let storage = storage();
    assert_eq!(storage.get("alerts")?, None);

    storage.set("alerts", "[]")?;
    assert_eq!(storage.get("alerts")?.as_deref(), Some("[]"));

    storage.set("alerts", "[1]")?;
    assert_eq!(storage.get("alerts")?.as_deref(), Some("[1]"));

    std::fs::remove_dir_all(&storage.dir)?;
    return Ok(());
}

#[test]
fn it_removes_keys() -> Result<()> {
    let storage = storage();
    storage.remove("theme")?;

    storage.set("theme", "dark")?;
    storage.remove("theme")?;
    assert_eq!(storage.get("theme")?, None);

    std::fs::remove_dir_all(&storage.dir)?;
    return Ok(());
}

#[test]
fn it_rejects_path_like_keys() {
    let storage = storage();
    for key in ["", "../etc", "a/b", "a.b"] {
        assert!(
            matches!(storage.get(key), Err(DeskError::Validation(_))),
            "{key}"
        );
    }
}
