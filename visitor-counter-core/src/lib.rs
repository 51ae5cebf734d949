use {
    std::collections::BTreeMap,
    serde::{Serialize, Deserialize},
    thiserror::Error,
};

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Response envelope returned to the function platform.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct InvocationResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl InvocationResponse {
    pub fn new() -> Self {
        Self {
            status_code: 200,
            headers: BTreeMap::new(),
            body: String::new(),
        }
    }

    pub fn status(mut self, status_code: u16) -> Self {
        self.status_code = status_code;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn json<T: Serialize>(body: &T) -> Result<Self, EnvelopeError> {
        let body = serde_json::to_string(body)
            .map_err(|err| EnvelopeError::Serialization { reason: err.to_string() })?;
        Ok(Self::new()
            .header("Content-Type", CONTENT_TYPE_JSON)
            .body(body))
    }

    pub fn into_http_response(self) -> Result<http::Response<String>, EnvelopeError> {
        let mut response = http::Response::builder().status(self.status_code);
        for (name, value) in &self.headers {
            response = response.header(name.as_str(), value.as_str());
        }
        response.body(self.body)
            .map_err(|err| EnvelopeError::InvalidResponse { reason: err.to_string() })
    }
}

impl Default for InvocationResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Body of a successful counter invocation: `{"count": n}`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct CountBody {
    pub count: u64,
}

impl CountBody {
    pub fn new(count: u64) -> Self {
        Self { count }
    }
}

#[derive(Error, Debug, Eq, PartialEq)]
pub enum EnvelopeError {
    #[error("failed to serialize response body: {reason}")]
    Serialization { reason: String },

    #[error("envelope cannot be converted to http response: {reason}")]
    InvalidResponse { reason: String },
}
