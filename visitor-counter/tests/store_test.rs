use {
    std::collections::HashMap,
    aws_sdk_dynamodb::types::AttributeValue,
    visitor_counter::{
        CounterStore,
        error::StoreError,
        store::{SqliteStore, count_from_attributes},
    },
};

#[tokio::test]
async fn sqlite_keys_are_independent() {
    let store = SqliteStore::in_memory().unwrap()
        .with_count("other", 7).unwrap();

    assert_eq!(1, store.increment("resume").await.unwrap());
    assert_eq!(2, store.increment("resume").await.unwrap());
    assert_eq!(8, store.increment("other").await.unwrap());
    assert_eq!(Some(2), store.get("resume").unwrap());
}

#[tokio::test]
async fn sqlite_count_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("counter.sqlite");

    {
        let store = SqliteStore::new(&path).unwrap();
        store.increment("resume").await.unwrap();
        store.increment("resume").await.unwrap();
    }

    let store = SqliteStore::new(&path).unwrap();
    assert_eq!(3, store.increment("resume").await.unwrap());
}

#[tokio::test]
async fn sqlite_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("nested").join("counter.sqlite");

    let store = SqliteStore::new(&path).unwrap();

    assert_eq!(1, store.increment("resume").await.unwrap());
    assert!(path.exists());
}

#[tokio::test(flavor = "current_thread")]
async fn sqlite_increments_interleave_on_single_thread() {
    let store = SqliteStore::in_memory().unwrap();

    let (first, second) = tokio::join!(store.increment("resume"), store.increment("resume"));

    let mut counts = vec![first.unwrap(), second.unwrap()];
    counts.sort();
    assert_eq!(vec![1, 2], counts);
}

#[test]
fn dynamodb_updated_attributes() {
    let attributes = HashMap::from([("count".to_owned(), AttributeValue::N("12".to_owned()))]);
    assert_eq!(12, count_from_attributes(Some(&attributes)).unwrap());
}

#[test]
fn dynamodb_missing_attributes() {
    match count_from_attributes(None) {
        Err(StoreError::MalformedResponse { .. }) => {},
        other => panic!("expected malformed response, got: {other:?}"),
    }

    let attributes = HashMap::from([("visits".to_owned(), AttributeValue::N("12".to_owned()))]);
    match count_from_attributes(Some(&attributes)) {
        Err(StoreError::MalformedResponse { .. }) => {},
        other => panic!("expected malformed response, got: {other:?}"),
    }
}

#[test]
fn dynamodb_non_numeric_count() {
    let attributes = HashMap::from([("count".to_owned(), AttributeValue::S("12".to_owned()))]);
    match count_from_attributes(Some(&attributes)) {
        Err(StoreError::MalformedResponse { .. }) => {},
        other => panic!("expected malformed response, got: {other:?}"),
    }

    let attributes = HashMap::from([("count".to_owned(), AttributeValue::N("-1".to_owned()))]);
    match count_from_attributes(Some(&attributes)) {
        Err(StoreError::MalformedResponse { .. }) => {},
        other => panic!("expected malformed response, got: {other:?}"),
    }
}
