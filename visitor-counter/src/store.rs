use {
    std::{collections::HashMap, fs, path::Path, sync::{Arc, Mutex}},
    futures::{future::BoxFuture, FutureExt},
    rusqlite::{Connection, OptionalExtension},
    tracing::info,
    aws_sdk_dynamodb::{
        Client,
        error::DisplayErrorContext,
        types::{AttributeValue, ReturnValue},
    },
    crate::error::{StoreError, SqliteStoreConnectionError},
};

pub const KEY_ATTRIBUTE: &str = "id";
pub const COUNT_ATTRIBUTE: &str = "count";

/// Atomic increment-and-fetch on a single counter record.
///
/// Implementations must create the record with a count of zero before incrementing when it
/// does not exist yet, and must not lose updates when called concurrently.
pub trait CounterStore {
    fn increment<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<u64, StoreError>>;
}

#[derive(Clone)]
pub struct BoxedCounterStore {
    inner: Arc<dyn CounterStore + Send + Sync>,
}

impl BoxedCounterStore {
    pub fn new<T: CounterStore + Send + Sync + 'static>(inner: T) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }
}

impl CounterStore for BoxedCounterStore {
    fn increment<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<u64, StoreError>> {
        self.inner.increment(key)
    }
}

#[derive(Clone)]
pub struct DynamoDbStore {
    client: Client,
    table: String,
}

impl DynamoDbStore {
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    /// Builds a client from the default credential and region chain of the environment.
    pub async fn from_env(table: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let table = table.into();
        info!("created dynamodb client for table {table:?}");
        Self::new(Client::new(&config), table)
    }
}

impl CounterStore for DynamoDbStore {
    fn increment<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<u64, StoreError>> {
        async move {
            let output = self.client.update_item()
                .table_name(&self.table)
                .key(KEY_ATTRIBUTE, AttributeValue::S(key.to_owned()))
                .update_expression("SET #c = if_not_exists(#c, :start) + :inc")
                .expression_attribute_names("#c", COUNT_ATTRIBUTE)
                .expression_attribute_values(":inc", AttributeValue::N("1".to_owned()))
                .expression_attribute_values(":start", AttributeValue::N("0".to_owned()))
                .return_values(ReturnValue::UpdatedNew)
                .send()
                .await
                .map_err(|err| StoreError::Unavailable { reason: DisplayErrorContext(&err).to_string() })?;

            count_from_attributes(output.attributes())
        }.boxed()
    }
}

/// Reads the updated count out of the attributes returned by an `UPDATED_NEW` update.
pub fn count_from_attributes(attributes: Option<&HashMap<String, AttributeValue>>) -> Result<u64, StoreError> {
    let value = attributes
        .and_then(|attributes| attributes.get(COUNT_ATTRIBUTE))
        .ok_or_else(|| StoreError::MalformedResponse { reason: format!("response has no \"{COUNT_ATTRIBUTE}\" attribute") })?;

    let number = value.as_n()
        .map_err(|other| StoreError::MalformedResponse { reason: format!("expected numeric attribute, got: {other:?}") })?;

    number.parse::<u64>()
        .map_err(|err| StoreError::MalformedResponse { reason: format!("failed to parse count {number:?}: {err:?}") })
}

/// Local store, used when running outside of the function platform.
#[derive(Clone)]
pub struct SqliteStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, SqliteStoreConnectionError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(SqliteStoreConnectionError::FailedToCreateDirectory)?;
        }

        Self::from_connection(
            Connection::open(path)
                .map_err(SqliteStoreConnectionError::ConnectionOpenError)?
        )
    }

    pub fn in_memory() -> Result<Self, SqliteStoreConnectionError> {
        Self::from_connection(
            Connection::open_in_memory()
                .map_err(SqliteStoreConnectionError::ConnectionOpenError)?
        )
    }

    fn from_connection(connection: Connection) -> Result<Self, SqliteStoreConnectionError> {
        connection.execute("create table if not exists counters (id text primary key, count integer not null)", ())
            .map_err(SqliteStoreConnectionError::DatabaseInitError)?;
        Ok(Self { connection: Arc::new(Mutex::new(connection)) })
    }

    pub fn get(&self, key: &str) -> Result<Option<u64>, StoreError> {
        let connection = self.connection.lock()
            .map_err(|err| StoreError::InternalError { description: format!("failed to acquire sqlite connection: {err:?}") })?;
        let count: Option<i64> = connection.query_row("select count from counters where id = ?1", [key], |row| row.get(0))
            .optional()
            .map_err(|err| StoreError::InternalError { description: format!("failed to execute sqlite query: {err:?}") })?;

        count.map(count_from_sqlite).transpose()
    }

    pub fn set(&self, key: &str, count: u64) -> Result<(), StoreError> {
        let count = i64::try_from(count)
            .map_err(|err| StoreError::InternalError { description: format!("count does not fit into sqlite integer: {err:?}") })?;
        let connection = self.connection.lock()
            .map_err(|err| StoreError::InternalError { description: format!("failed to acquire sqlite connection: {err:?}") })?;
        connection.execute("insert or replace into counters (id, count) values (?1, ?2)", (key, count))
            .map_err(|err| StoreError::InternalError { description: format!("failed to execute sqlite query: {err:?}") })
            .map(|_| ())
    }

    pub fn with_count(self, key: &str, count: u64) -> Result<Self, StoreError> {
        self.set(key, count)?;
        Ok(self)
    }

    fn increment_blocking(&self, key: &str) -> Result<u64, StoreError> {
        let connection = self.connection.lock()
            .map_err(|err| StoreError::InternalError { description: format!("failed to acquire sqlite connection: {err:?}") })?;
        let count: i64 = connection.query_row(
            "insert into counters (id, count) values (?1, 1) on conflict (id) do update set count = count + 1 returning count",
            [key],
            |row| row.get(0),
        ).map_err(|err| StoreError::InternalError { description: format!("failed to execute sqlite query: {err:?}") })?;

        count_from_sqlite(count)
    }
}

impl CounterStore for SqliteStore {
    fn increment<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<u64, StoreError>> {
        let store = self.clone();
        let key = key.to_owned();
        async move {
            tokio::task::spawn_blocking(move || store.increment_blocking(&key)).await
                .map_err(|err| StoreError::InternalError { description: format!("sqlite increment task failed: {err:?}") })?
        }.boxed()
    }
}

fn count_from_sqlite(count: i64) -> Result<u64, StoreError> {
    u64::try_from(count)
        .map_err(|err| StoreError::MalformedResponse { reason: format!("stored count is negative: {count} ({err:?})") })
}
