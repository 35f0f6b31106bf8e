use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LookupError;

pub const SUCCESS_MESSAGE: &str = "Weather request submitted successfully!";
pub const REJECTED_FALLBACK_MESSAGE: &str = "Failed to submit weather lookup request";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error: Could not connect to the server";

pub const SUBMIT_LABEL: &str = "Submit Weather Lookup";
pub const SUBMITTING_LABEL: &str = "Submitting...";

/// The single text field of the lookup form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    pub id: String,
}

impl FormInput {
    /// The field is marked required; anything non-empty may be submitted.
    pub fn is_submittable(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Outcome of one submission, replacing whatever the previous one produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubmissionResult {
    Success { message: String, weather_data: Value },
    Failure { message: String },
}

impl SubmissionResult {
    pub fn success(weather_data: Value) -> Self {
        SubmissionResult::Success {
            message: SUCCESS_MESSAGE.to_string(),
            weather_data,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        SubmissionResult::Failure {
            message: message.into(),
        }
    }

    /// Collapse a lookup outcome into the displayable result.
    ///
    /// A rejected lookup surfaces the service's `detail` verbatim; anything that
    /// never produced a structured response gets the fixed network message.
    pub fn from_outcome(outcome: Result<Value, LookupError>) -> Self {
        match outcome {
            Ok(weather_data) => Self::success(weather_data),
            Err(LookupError::Rejected { detail, .. }) => {
                Self::failure(detail.unwrap_or_else(|| REJECTED_FALLBACK_MESSAGE.to_string()))
            }
            Err(LookupError::Transport { .. }) | Err(LookupError::Decode { .. }) => {
                Self::failure(NETWORK_ERROR_MESSAGE)
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionResult::Success { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            SubmissionResult::Success { message, .. } | SubmissionResult::Failure { message } => {
                message
            }
        }
    }

    pub fn weather_data(&self) -> Option<&Value> {
        match self {
            SubmissionResult::Success { weather_data, .. } => Some(weather_data),
            SubmissionResult::Failure { .. } => None,
        }
    }
}

/// Everything the form shows: the typed identifier, whether a request is in
/// flight, and the latest result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub input: FormInput,
    pub submitting: bool,
    pub result: Option<SubmissionResult>,
}

impl FormState {
    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            SUBMITTING_LABEL
        } else {
            SUBMIT_LABEL
        }
    }
}
