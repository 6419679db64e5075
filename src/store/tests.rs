use super::*;
use crate::error::RandviewError;
use tempfile::tempdir;

fn link(s: &str) -> Link {
    Link::parse(&format!("https://{}.example", s)).unwrap()
}

async fn exercise_url_store<S: UrlStore>(store: &S) {
    let scope = OwnerScope::Local;
    assert!(store.list(&scope).await.unwrap().is_empty());

    store.create(&scope, link("a")).await.unwrap();
    store.create(&scope, link("b")).await.unwrap();
    assert_eq!(store.list(&scope).await.unwrap(), vec![link("a"), link("b")]);

    let err = store.create(&scope, link("a")).await.unwrap_err();
    assert!(matches!(err, RandviewError::DuplicateUrl(_)));
    assert_eq!(store.list(&scope).await.unwrap(), vec![link("a"), link("b")]);

    // Replace keeps position
    store.replace(&scope, &link("a"), link("c")).await.unwrap();
    assert_eq!(store.list(&scope).await.unwrap(), vec![link("c"), link("b")]);

    // Editing an entry to itself is fine, into another entry is not
    store.replace(&scope, &link("c"), link("c")).await.unwrap();
    let err = store.replace(&scope, &link("c"), link("b")).await.unwrap_err();
    assert!(matches!(err, RandviewError::DuplicateUrl(_)));
    let err = store.replace(&scope, &link("zzz"), link("d")).await.unwrap_err();
    assert!(matches!(err, RandviewError::UrlNotFound(_)));
    assert_eq!(store.list(&scope).await.unwrap(), vec![link("c"), link("b")]);

    assert!(store.remove(&scope, &link("c")).await.unwrap());
    assert!(!store.remove(&scope, &link("c")).await.unwrap());
    assert_eq!(store.list(&scope).await.unwrap(), vec![link("b")]);
}

async fn exercise_scopes<S: UrlStore + HistoryStore>(store: &S) {
    let alice = OwnerScope::user("alice").unwrap();
    let bob = OwnerScope::user("bob").unwrap();

    store.create(&alice, link("a")).await.unwrap();
    store.create(&alice, link("shared")).await.unwrap();
    store.create(&bob, link("shared")).await.unwrap();
    store.create(&bob, link("b")).await.unwrap();
    store.create(&OwnerScope::Local, link("l")).await.unwrap();

    // Same URL under different owners is not a duplicate
    assert_eq!(store.list(&bob).await.unwrap(), vec![link("shared"), link("b")]);

    let all = store.list(&OwnerScope::All).await.unwrap();
    assert_eq!(all, vec![link("a"), link("shared"), link("b"), link("l")]);

    let err = store.create(&OwnerScope::All, link("x")).await.unwrap_err();
    assert!(matches!(err, RandviewError::ReadOnlyScope));
    let err = store.remove(&OwnerScope::All, &link("a")).await.unwrap_err();
    assert!(matches!(err, RandviewError::ReadOnlyScope));

    // Histories are kept per scope
    store.save(&alice, &[link("a")]).await.unwrap();
    store.save(&OwnerScope::All, &[link("b"), link("a")]).await.unwrap();
    assert_eq!(store.load(&alice).await.unwrap(), vec![link("a")]);
    assert!(store.load(&bob).await.unwrap().is_empty());
    assert_eq!(
        store.load(&OwnerScope::All).await.unwrap(),
        vec![link("b"), link("a")]
    );
}

#[tokio::test]
async fn test_memory_store_urls() {
    exercise_url_store(&MemoryStore::default()).await;
}

#[tokio::test]
async fn test_memory_store_scopes() {
    exercise_scopes(&MemoryStore::default()).await;
}

#[tokio::test]
async fn test_memory_store_clones_share_data() {
    let store = MemoryStore::seeded(&OwnerScope::Local, vec![link("a")])
        .await
        .unwrap();
    let other = store.clone();
    other.create(&OwnerScope::Local, link("b")).await.unwrap();
    assert_eq!(
        store.list(&OwnerScope::Local).await.unwrap(),
        vec![link("a"), link("b")]
    );
}

#[tokio::test]
async fn test_file_store_urls() {
    let dir = tempdir().unwrap();
    exercise_url_store(&FileStore::new(dir.path())).await;
}

#[tokio::test]
async fn test_file_store_scopes() {
    let dir = tempdir().unwrap();
    exercise_scopes(&FileStore::new(dir.path())).await;
}

#[tokio::test]
async fn test_file_store_persists_across_instances() {
    let dir = tempdir().unwrap();
    let scope = OwnerScope::user("carol").unwrap();

    let store = FileStore::new(dir.path());
    store.create(&scope, link("a")).await.unwrap();
    store.save(&scope, &[link("a")]).await.unwrap();
    assert!(store.last_updated(&scope).await.unwrap().is_some());
    assert!(store.last_updated(&OwnerScope::All).await.unwrap().is_none());

    let reopened = FileStore::new(dir.path());
    assert_eq!(reopened.list(&scope).await.unwrap(), vec![link("a")]);
    assert_eq!(reopened.load(&scope).await.unwrap(), vec![link("a")]);
    assert!(dir.path().join("urls").join("carol.json").exists());
    assert!(!dir.path().join("urls").join("carol.json.tmp").exists());
}

#[tokio::test]
async fn test_file_store_missing_directory_reads_empty() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path().join("does-not-exist"));
    assert!(store.list(&OwnerScope::All).await.unwrap().is_empty());
    assert!(store.load(&OwnerScope::Local).await.unwrap().is_empty());
    assert!(store.last_updated(&OwnerScope::Local).await.unwrap().is_none());
}

#[tokio::test]
async fn test_file_store_corrupt_document_is_unavailable() {
    let dir = tempdir().unwrap();
    let urls_dir = dir.path().join("urls");
    std::fs::create_dir_all(&urls_dir).unwrap();
    std::fs::write(urls_dir.join("local.json"), "{ not json").unwrap();

    let store = FileStore::new(dir.path());
    let err = store.list(&OwnerScope::Local).await.unwrap_err();
    assert!(matches!(err, RandviewError::SourceUnavailable(_)));

    // The broken list is left alone on a failed write attempt
    let err = store.create(&OwnerScope::Local, link("a")).await.unwrap_err();
    assert!(matches!(err, RandviewError::SourceUnavailable(_)));
    assert_eq!(
        std::fs::read_to_string(urls_dir.join("local.json")).unwrap(),
        "{ not json"
    );
}

#[test]
fn test_owner_ids() {
    assert!(OwnerScope::user("alice-01_x").is_ok());
    for bad in ["", "local", "_all", "../etc", "a b", "a/b"] {
        assert!(
            matches!(OwnerScope::user(bad), Err(RandviewError::InvalidOwner(_))),
            "{:?} should be rejected",
            bad
        );
    }
    assert_eq!(OwnerScope::All.history_key(), "_all");
    assert_eq!(OwnerScope::Local.history_key(), "local");
    assert!(OwnerScope::All.is_read_only());
    assert!(!OwnerScope::Local.is_read_only());
}

#[tokio::test]
async fn test_memory_snapshot_of_aggregate_scope() {
    let store = MemoryStore::snapshot(
        &OwnerScope::All,
        vec![link("a"), link("b")],
        vec![link("a")],
    );
    assert_eq!(
        store.list(&OwnerScope::All).await.unwrap(),
        vec![link("a"), link("b")]
    );
    assert_eq!(store.load(&OwnerScope::All).await.unwrap(), vec![link("a")]);

    let alice = OwnerScope::user("alice").unwrap();
    let store = MemoryStore::snapshot(&alice, vec![link("c")], Vec::new());
    assert_eq!(store.list(&alice).await.unwrap(), vec![link("c")]);
    assert!(store.list(&OwnerScope::Local).await.unwrap().is_empty());
}
