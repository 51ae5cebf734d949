use {
    serde_json::Value,
    tracing::{info, error},
    visitor_counter_core::{InvocationResponse, CountBody},
    crate::{
        error::CounterError,
        store::{BoxedCounterStore, CounterStore},
    },
};

/// Increments the counter record on every invocation and returns the new count.
#[derive(Clone)]
pub struct CounterHandler {
    store: BoxedCounterStore,
    key: String,
}

impl CounterHandler {
    pub fn new(store: BoxedCounterStore, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Event contents are ignored, any invocation counts as a visit.
    pub async fn handle(&self, _event: Value) -> Result<InvocationResponse, CounterError> {
        let count = match self.store.increment(&self.key).await {
            Ok(v) => v,
            Err(err) => {
                error!("failed to increment counter {:?}: {err:?}", self.key);
                return Err(err.into());
            }
        };
        info!("counter {:?} incremented to {count}", self.key);

        Ok(InvocationResponse::json(&CountBody::new(count))?)
    }
}
