use glyco_client::controller::SubmissionController;
use glyco_core::error::CoreError;
use glyco_core::fields::FieldName;
use glyco_core::form::FormValues;
use glyco_core::interpret::{interpret, DisplayModel, ERROR_TITLE};
use glyco_core::payload::{PayloadBuilder, PermissiveBuilder};
use glyco_core::prediction::{PredictionResult, SubmissionState};
use tracing::warn;

/// One intake form: the field store, the payload policy, and the
/// controller that submits it.
pub struct IntakeSession {
    form: FormValues,
    builder: Box<dyn PayloadBuilder>,
    controller: SubmissionController,
}

impl IntakeSession {
    /// A session with empty fields and the permissive payload builder.
    pub fn new(controller: SubmissionController) -> Self {
        Self {
            form: FormValues::new(),
            builder: Box::new(PermissiveBuilder),
            controller,
        }
    }

    pub fn with_builder(mut self, builder: Box<dyn PayloadBuilder>) -> Self {
        self.builder = builder;
        self
    }

    pub fn form(&self) -> &FormValues {
        &self.form
    }

    pub fn controller(&self) -> &SubmissionController {
        &self.controller
    }

    pub fn set_value(&mut self, field: FieldName, text: impl Into<String>) {
        self.form.set_value(field, text);
    }

    pub fn set_focus(&mut self, field: Option<FieldName>) {
        self.form.set_focus(field);
    }

    pub async fn is_busy(&self) -> bool {
        self.controller.is_busy().await
    }

    pub async fn state(&self) -> SubmissionState {
        self.controller.state().await
    }

    /// Build the payload, submit it, and interpret the outcome.
    ///
    /// A payload the builder rejects is reported without contacting the
    /// service and leaves the submission state untouched.
    pub async fn submit(&self) -> DisplayModel {
        match self.builder.build(&self.form) {
            Ok(payload) => interpret(&self.controller.submit(&payload).await),
            Err(CoreError::InvalidFields(fields)) => {
                warn!(?fields, "payload rejected before submission");
                interpret(&PredictionResult::invalid_input(&fields))
            }
            Err(e) => DisplayModel::Error {
                title: ERROR_TITLE.to_string(),
                message: e.to_string(),
            },
        }
    }
}
