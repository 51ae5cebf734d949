use {
    std::{env, path::PathBuf},
    serde::Deserialize,
    tokio::fs,
    crate::{
        error::{ConfigLoadError, SqliteStoreConnectionError},
        store::{BoxedCounterStore, DynamoDbStore, SqliteStore},
    },
};

pub const DEFAULT_TABLE_NAME: &str = "visitor-count";
pub const DEFAULT_COUNTER_KEY: &str = "resume";
pub const DEFAULT_HTTP_PORT: u16 = 8080;

pub const ENV_TABLE_NAME: &str = "COUNTER_TABLE_NAME";
pub const ENV_COUNTER_KEY: &str = "COUNTER_KEY";

#[derive(Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct CounterConfig {
    #[serde(skip_deserializing)]
    pub config_path: Option<PathBuf>,

    #[serde(default = "default_counter_key")]
    pub key: String,
    pub store: StoreConfig,
    pub http: Option<HttpConfig>,
}

#[derive(Deserialize, Debug, Clone, Eq, PartialEq)]
#[serde(tag = "type")]
pub enum StoreConfig {
    #[serde(rename = "dynamodb")]
    DynamoDb {
        #[serde(default = "default_table_name")]
        table: String,
    },
    /// Local store, in-memory when `path` is not set.
    #[serde(rename = "sqlite")]
    Sqlite {
        path: Option<String>,
    },
}

#[derive(Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct HttpConfig {
    pub port: Option<u16>,
}

impl CounterConfig {
    pub fn new(store: StoreConfig) -> Self {
        Self {
            config_path: None,
            key: default_counter_key(),
            store,
            http: None,
        }
    }

    /// Configuration used inside the function platform, where only environment variables are available.
    pub fn from_env() -> Self {
        Self::from_vars(|name| env::var(name).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let table = var(ENV_TABLE_NAME)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_table_name);
        let key = var(ENV_COUNTER_KEY)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_counter_key);

        Self::new(StoreConfig::DynamoDb { table }).with_key(key)
    }

    pub async fn load(file_path: PathBuf) -> Result<Self, ConfigLoadError> {
        let content = fs::read(&file_path).await
            .map_err(ConfigLoadError::FailedToRead)?;
        let mut config = Self::parse(&content)?;
        config.config_path = Some(file_path);
        Ok(config)
    }

    pub fn parse(content: &[u8]) -> Result<Self, ConfigLoadError> {
        serde_yml::from_slice(content)
            .map_err(|err| ConfigLoadError::FailedToParse { reason: err.to_string() })
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn http_port(&self) -> u16 {
        self.http.as_ref()
            .and_then(|v| v.port)
            .unwrap_or(DEFAULT_HTTP_PORT)
    }
}

fn default_table_name() -> String {
    DEFAULT_TABLE_NAME.to_owned()
}

fn default_counter_key() -> String {
    DEFAULT_COUNTER_KEY.to_owned()
}

pub async fn store_from_config(config: &StoreConfig) -> Result<BoxedCounterStore, SqliteStoreConnectionError> {
    Ok(match config {
        StoreConfig::DynamoDb { table } => BoxedCounterStore::new(DynamoDbStore::from_env(table.clone()).await),
        StoreConfig::Sqlite { path: Some(path) } => BoxedCounterStore::new(SqliteStore::new(path)?),
        StoreConfig::Sqlite { path: None } => BoxedCounterStore::new(SqliteStore::in_memory()?),
    })
}
