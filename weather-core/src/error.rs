use reqwest::StatusCode;
use thiserror::Error;

/// Ways a single lookup round trip can fail.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The service answered, but not with a 2xx status.
    #[error("Weather service rejected lookup at {url} with status {status}")]
    Rejected {
        url: String,
        status: StatusCode,
        detail: Option<String>,
    },

    #[error("Could not reach weather service at {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A 2xx response whose body is not JSON.
    #[error("Weather service at {url} returned an unreadable body")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

