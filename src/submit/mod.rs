//! Submission lifecycle shared by every course form.
//!
//! `Idle → Submitting → {Succeeded, Failed}`; the next field edit moves a
//! terminal state back to `Idle`. Every submission that starts ends in exactly
//! one alert.

mod contract;
mod error;
mod service;

use std::sync::{Arc, Weak};

use serde_json::Value;

pub use contract::PayloadContract;
pub use error::SubmitError;
pub use service::CreateService;

use crate::{
    alerts::{Alert, AlertSink},
    form::{FieldCoercionError, FieldInput, FormCommand, FormState, apply_command},
    forms::CourseForm,
};

pub type SubmitOutcome = Result<Value, SubmitError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmitStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SubmitStatus::Succeeded | SubmitStatus::Failed)
    }
}

/// A submission whose payload is built and whose service call has not run yet.
pub struct PendingSubmission<P: Send + 'static> {
    payload: Result<P, SubmitError>,
    service: Arc<dyn CreateService<P>>,
    // dropped together with the submission; the controller holds a `Weak`
    _in_flight: Arc<()>,
}

impl<P: Send + 'static> PendingSubmission<P> {
    pub fn payload(&self) -> Option<&P> {
        self.payload.as_ref().ok()
    }

    pub async fn run(self) -> SubmitOutcome {
        let payload = self.payload?;
        match self.service.create(payload).await {
            Ok(Some(created)) => Ok(created),
            Ok(None) => Err(SubmitError::EmptyResponse),
            Err(err) => Err(SubmitError::Service(err)),
        }
    }
}

/// One form instance: its field state, submit status and collaborators.
pub struct FormController<F: CourseForm> {
    form: F,
    state: FormState,
    status: SubmitStatus,
    service: Arc<dyn CreateService<F::Payload>>,
    alerts: Arc<dyn AlertSink>,
    on_success: Box<dyn FnMut() + Send>,
    contract: Option<PayloadContract>,
    in_flight: Weak<()>,
}

impl<F: CourseForm> FormController<F> {
    pub fn new(
        form: F,
        service: Arc<dyn CreateService<F::Payload>>,
        alerts: Arc<dyn AlertSink>,
    ) -> Self {
        let state = FormState::from_schema(&form.schema());
        let contract = form.payload_contract();
        Self {
            form,
            state,
            status: SubmitStatus::Idle,
            service,
            alerts,
            on_success: Box::new(|| {}),
            contract,
            in_flight: Weak::new(),
        }
    }

    pub fn on_success(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_success = Box::new(callback);
        self
    }

    /// Seed initial values without touching any field.
    pub fn with_initial_values(mut self, values: &Value) -> Result<Self, FieldCoercionError> {
        self.state.seed_from_value(values)?;
        Ok(self)
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.status == SubmitStatus::Submitting
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.is_submitting() && self.state.is_valid()
    }

    pub fn set_value(&mut self, field: &str, input: FieldInput) -> Result<(), FieldCoercionError> {
        self.dispatch(FormCommand::SetValue {
            field: field.to_string(),
            input,
        })
    }

    pub fn dispatch(&mut self, command: FormCommand) -> Result<(), FieldCoercionError> {
        let edits = matches!(command, FormCommand::SetValue { .. } | FormCommand::Reset);
        if edits {
            self.settle_abandoned();
        }
        apply_command(&mut self.state, command)?;
        if edits && self.status.is_terminal() {
            self.status = SubmitStatus::Idle;
        }
        Ok(())
    }

    /// Validate everything and, when allowed, move to `Submitting` with the
    /// payload ready. Returns `None` when the submit control is disabled.
    pub fn begin_submit(&mut self) -> Option<PendingSubmission<F::Payload>> {
        self.settle_abandoned();
        self.state.touch_all();
        self.state.revalidate();
        if !self.can_submit() {
            tracing::debug!(
                form = self.state.id(),
                submitting = self.is_submitting(),
                errors = self.state.error_count(),
                "submit ignored"
            );
            return None;
        }

        self.status = SubmitStatus::Submitting;
        let payload = self
            .form
            .build_payload(&self.state)
            .map_err(|err| SubmitError::Unexpected(err.to_string()))
            .and_then(|payload| match &self.contract {
                Some(contract) => contract
                    .check(&payload)
                    .map(|()| payload)
                    .map_err(SubmitError::Unexpected),
                None => Ok(payload),
            });
        tracing::debug!(form = self.state.id(), built = payload.is_ok(), "submitting");
        let token = Arc::new(());
        self.in_flight = Arc::downgrade(&token);
        Some(PendingSubmission {
            payload,
            service: Arc::clone(&self.service),
            _in_flight: token,
        })
    }

    /// A submission dropped before `finish` (a timeout, a cancelled task)
    /// ends as failed instead of leaving the form in `Submitting`.
    fn settle_abandoned(&mut self) {
        if self.is_submitting() && self.in_flight.strong_count() == 0 {
            self.finish(Err(SubmitError::Cancelled));
        }
    }

    /// Map the outcome to exactly one alert and the matching terminal status.
    pub fn finish(&mut self, outcome: SubmitOutcome) {
        if !self.is_submitting() {
            tracing::debug!(form = self.state.id(), "no submission to finish");
            return;
        }
        match outcome {
            Ok(created) => {
                tracing::info!(form = self.state.id(), created = %created, "submission succeeded");
                self.alerts.add_alert(Alert::success(self.form.success_text()));
                self.status = SubmitStatus::Succeeded;
                (self.on_success)();
            }
            Err(err) => {
                tracing::warn!(form = self.state.id(), error = %err, "submission failed");
                self.alerts.add_alert(Alert::error(self.form.error_text()));
                self.status = SubmitStatus::Failed;
            }
        }
    }

    /// Run the whole submission. Returns the terminal status, or `None` when
    /// the submit control was disabled.
    pub async fn submit(&mut self) -> Option<SubmitStatus> {
        let pending = self.begin_submit()?;
        let guard = SubmitGuard { controller: self };
        let outcome = pending.run().await;
        guard.controller.finish(outcome);
        Some(guard.controller.status)
    }
}

/// Finishes a `submit` whose future is dropped mid-flight.
struct SubmitGuard<'a, F: CourseForm> {
    controller: &'a mut FormController<F>,
}

impl<F: CourseForm> Drop for SubmitGuard<'_, F> {
    fn drop(&mut self) {
        if self.controller.is_submitting() {
            self.controller.finish(Err(SubmitError::Cancelled));
        }
    }
}
