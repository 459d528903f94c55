use crate::storage::{InMemoryStorage, OnDiskStorage};
use tempfile::TempDir;

#[actix_rt::test]
async fn should_save_and_read_value_on_disk() {
    let dir = TempDir::new().unwrap();
    let storage = OnDiskStorage::create(dir.path());

    storage.save("auth", "auth_code", "123456").await.unwrap();

    assert_eq!(
        storage.get("auth", "auth_code").await.unwrap(),
        Some("123456".to_string())
    );
    assert!(dir.path().join("auth").join("auth_code").exists());
}

#[actix_rt::test]
async fn should_overwrite_value_on_disk() {
    let dir = TempDir::new().unwrap();
    let storage = OnDiskStorage::create(dir.path());

    storage.save("auth", "auth_code", "a-much-longer-code").await.unwrap();
    storage.save("auth", "auth_code", "short").await.unwrap();

    assert_eq!(
        storage.get("auth", "auth_code").await.unwrap(),
        Some("short".to_string())
    );
}

#[actix_rt::test]
async fn should_return_none_for_missing_key_on_disk() {
    let dir = TempDir::new().unwrap();
    let storage = OnDiskStorage::create(dir.path().join("not-created-yet"));

    assert_eq!(storage.get("auth", "auth_code").await.unwrap(), None);
}

#[actix_rt::test]
async fn should_delete_value_on_disk_and_tolerate_missing_key() {
    let dir = TempDir::new().unwrap();
    let storage = OnDiskStorage::create(dir.path());

    storage.save("auth", "auth_code", "123456").await.unwrap();
    storage.delete("auth", "auth_code").await.unwrap();
    storage.delete("auth", "auth_code").await.unwrap();

    assert_eq!(storage.get("auth", "auth_code").await.unwrap(), None);
}

#[test]
fn should_save_read_and_delete_value_in_memory() {
    let storage = InMemoryStorage::new();

    storage.save("auth", "auth_code", "123456");
    assert_eq!(storage.get("auth", "auth_code"), Some("123456".to_string()));
    assert_eq!(storage.get("other", "auth_code"), None);

    storage.delete("auth", "auth_code");
    storage.delete("auth", "auth_code");
    assert_eq!(storage.get("auth", "auth_code"), None);
}
