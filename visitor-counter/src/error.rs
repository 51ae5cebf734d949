use {
    thiserror::Error,
    visitor_counter_core::EnvelopeError,
};

#[derive(Error, Debug)]
pub enum StoreError {
    /// Store could not be reached or rejected the update (connectivity, throttling, permissions).
    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },

    /// Update went through, but the store did not return a usable count.
    #[error("malformed store response: {reason}")]
    MalformedResponse { reason: String },

    /// Failure inside a local store implementation.
    #[error("internal store error: {description}")]
    InternalError { description: String },
}

#[derive(Error, Debug)]
pub enum CounterError {
    #[error("failed to increment counter: {0}")]
    Store(#[from] StoreError),

    #[error("failed to build response: {reason}")]
    Serialization { reason: String },
}

impl From<EnvelopeError> for CounterError {
    fn from(err: EnvelopeError) -> Self {
        Self::Serialization { reason: err.to_string() }
    }
}

#[derive(Error, Debug)]
pub enum SqliteStoreConnectionError {
    #[error("failed to open connection: {0:?}")]
    ConnectionOpenError(rusqlite::Error),

    #[error("failed to init database: {0:?}")]
    DatabaseInitError(rusqlite::Error),

    #[error("failed to create directory for database file: {0:?}")]
    FailedToCreateDirectory(std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0:?}")]
    FailedToRead(std::io::Error),

    #[error("failed to parse config file: {reason}")]
    FailedToParse { reason: String },
}

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("failed to bind listener: {0:?}")]
    FailedToBind(std::io::Error),

    #[error("failed to accept connection: {0:?}")]
    FailedToAccept(std::io::Error),
}
