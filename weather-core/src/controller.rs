//! The lookup form's state and its submit handler.
//!
//! State changes are published through a [`watch`] channel so a front end can
//! redraw on every transition: `Idle -> Submitting -> Idle(result)`.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use crate::{
    model::{FormInput, FormState, SubmissionResult},
    service::WeatherLookupService,
};

#[derive(Debug)]
pub struct LookupForm<S> {
    service: S,
    state: watch::Sender<FormState>,
    /// Ticket of the most recently started submission.
    latest: AtomicU64,
}

impl<S: WeatherLookupService> LookupForm<S> {
    pub fn new(service: S) -> Self {
        let (state, _) = watch::channel(FormState::default());
        Self {
            service,
            state,
            latest: AtomicU64::new(0),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> FormState {
        self.state.borrow().clone()
    }

    pub fn input(&self) -> String {
        self.state.borrow().input.id.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.state.borrow().submitting
    }

    pub fn result(&self) -> Option<SubmissionResult> {
        self.state.borrow().result.clone()
    }

    pub fn submit_label(&self) -> &'static str {
        self.state.borrow().submit_label()
    }

    /// Replace the typed identifier.
    pub fn set_input(&self, value: impl Into<String>) {
        let value = value.into();
        self.state.send_if_modified(|state| {
            if state.input.id == value {
                return false;
            }
            state.input.id = value;
            true
        });
    }

    /// Submit the current identifier and record the outcome.
    ///
    /// The identifier is assumed non-empty; the input prompt enforces that.
    /// Returns the result this call wrote, or `None` when a newer submission
    /// started before this one resolved and its response was discarded.
    pub async fn submit(&self) -> Option<SubmissionResult> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        let mut id = String::new();
        self.state.send_modify(|state| {
            state.submitting = true;
            state.result = None;
            id.clone_from(&state.input.id);
        });
        let _submitting = SubmittingGuard {
            state: &self.state,
            latest: &self.latest,
            ticket,
        };

        tracing::debug!(%id, ticket, "Submitting weather lookup");
        let outcome = self.service.fetch(&id).await;

        if let Err(err) = &outcome {
            tracing::warn!(%id, error = ?err, "Weather lookup failed");
        }

        if self.latest.load(Ordering::SeqCst) != ticket {
            tracing::debug!(%id, ticket, "Discarding response of superseded submission");
            return None;
        }

        let result = SubmissionResult::from_outcome(outcome);
        self.state.send_modify(|state| {
            state.result = Some(result.clone());
            if result.is_success() {
                state.input = FormInput::default();
            }
        });

        Some(result)
    }
}

/// Clears the submitting flag however `submit` exits, including when its
/// future is dropped mid-request. Only the latest submission may clear it.
struct SubmittingGuard<'a> {
    state: &'a watch::Sender<FormState>,
    latest: &'a AtomicU64,
    ticket: u64,
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        if self.latest.load(Ordering::SeqCst) == self.ticket {
            self.state.send_modify(|state| state.submitting = false);
        }
    }
}
