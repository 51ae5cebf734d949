use {
    futures::{future::{self, BoxFuture}, FutureExt},
    visitor_counter::{
        BoxedCounterStore,
        CounterHandler,
        CounterStore,
        error::StoreError,
        store::SqliteStore,
    },
};

pub const TEST_KEY: &str = "resume";

/// Store that rejects every update, like an unreachable table would.
pub struct FailingStore;

impl CounterStore for FailingStore {
    fn increment<'a>(&'a self, _key: &'a str) -> BoxFuture<'a, Result<u64, StoreError>> {
        future::ready(Err(StoreError::Unavailable { reason: "connection refused".to_owned() })).boxed()
    }
}

pub fn sqlite_handler() -> (SqliteStore, CounterHandler) {
    let store = SqliteStore::in_memory().unwrap();
    let handler = CounterHandler::new(BoxedCounterStore::new(store.clone()), TEST_KEY);
    (store, handler)
}

pub fn failing_handler() -> CounterHandler {
    CounterHandler::new(BoxedCounterStore::new(FailingStore), TEST_KEY)
}
