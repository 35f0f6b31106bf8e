use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use crate::error::LookupError;

pub mod http;

pub use http::HttpLookupService;

/// Fetches the stored weather record for an identifier.
#[async_trait]
pub trait WeatherLookupService: Send + Sync + Debug {
    /// Returns the parsed response body untouched on a 2xx answer.
    async fn fetch(&self, id: &str) -> Result<Value, LookupError>;
}

