use std::sync::Arc;

use actix::{fut, prelude::*};
use log::{info, warn};

use crate::{
    configs::{PredictionRequest, WorkflowForm},
    enablement::{derive_enablement, Enablement},
    error::{ControllerError, ServiceError, ValidationError},
    service::{
        CleanupReport, DatasetFile, Prediction, TrainingReport, TrainingService, UploadReceipt,
    },
    session::{OperationKind, SessionState},
    validation::{
        validate_cleanup_ready, validate_predict_ready, validate_train_ready,
        validate_upload_ready,
    },
};

/* -------------------------------------------------------------------------- */
/*                                  Messages                                  */
/* -------------------------------------------------------------------------- */

/// Upload the selected dataset file.
#[derive(Message)]
#[rtype(result = "Result<UploadReceipt, ControllerError>")]
pub struct Upload {
    pub file: Option<DatasetFile>,
}

/// Train a model on the current dataset using raw form fields.
#[derive(Message)]
#[rtype(result = "Result<TrainingReport, ControllerError>")]
pub struct Train {
    pub hidden_layers: String,
    pub activation: String,
    pub optimizer: String,
    pub max_iterations: String,
}

/// Run the trained model on a comma-separated input vector.
#[derive(Message)]
#[rtype(result = "Result<Prediction, ControllerError>")]
pub struct Predict {
    pub inputs: String,
}

/// Purge every server-side artifact and reset the session.
#[derive(Message)]
#[rtype(result = "Result<CleanupReport, ControllerError>")]
pub struct Cleanup;

/// Read the current session and its enablement.
#[derive(Message)]
#[rtype(result = "SessionSnapshot")]
pub struct Snapshot;

/// Read-only copy of the controller state handed out to views.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub enablement: Enablement,
}

impl From<&WorkflowForm> for Upload {
    fn from(form: &WorkflowForm) -> Self {
        Self {
            file: form.selected_file.clone(),
        }
    }
}

impl From<&WorkflowForm> for Train {
    fn from(form: &WorkflowForm) -> Self {
        Self {
            hidden_layers: form.hidden_layers.clone(),
            activation: form.activation.clone(),
            optimizer: form.optimizer.clone(),
            max_iterations: form.max_iterations.clone(),
        }
    }
}

impl From<&WorkflowForm> for Predict {
    fn from(form: &WorkflowForm) -> Self {
        Self {
            inputs: form.prediction_inputs.clone(),
        }
    }
}

/* -------------------------------------------------------------------------- */
/*                                 Controller                                 */
/* -------------------------------------------------------------------------- */

/// Owns the session and is its only writer.
///
/// Handlers hand the network round trip back to the actor as a future, so the
/// mailbox keeps draining while a request is in flight. Anything that arrives
/// then is turned away by validation and never reaches the service.
pub struct Controller<S: TrainingService + 'static> {
    service: Arc<S>,
    state: SessionState,
}

impl<S: TrainingService + 'static> Controller<S> {
    /// Creates a new `Controller` with an empty session.
    ///
    /// # Args
    /// * `service` - The external training service to dispatch to.
    pub fn new(service: S) -> Self {
        Self {
            service: Arc::new(service),
            state: SessionState::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Answers a message that failed validation without touching the network.
    fn reject<T: 'static>(
        &mut self,
        kind: OperationKind,
        err: ValidationError,
    ) -> ResponseActFuture<Self, Result<T, ControllerError>> {
        warn!("{kind} rejected: {err}");
        // the in-flight operation keeps its own progress message
        if !matches!(err, ValidationError::OperationPending(_)) {
            self.state.set_status(kind, err.status_text());
        }
        Box::pin(fut::ready(Err(err.into())))
    }

    /// Releases the in-flight flag and records a failed round trip.
    fn fail<T>(&mut self, kind: OperationKind, err: ServiceError) -> Result<T, ControllerError> {
        self.state.release();
        warn!("{kind} failed: {err}");
        self.state.set_status(kind, failure_text(kind, &err));
        Err(err.into())
    }

    fn finish_upload(
        &mut self,
        result: Result<UploadReceipt, ServiceError>,
    ) -> Result<UploadReceipt, ControllerError> {
        let receipt = match result {
            Ok(receipt) => receipt,
            Err(e) => return self.fail(OperationKind::Upload, e),
        };
        self.state.release();

        info!("dataset uploaded: {}", receipt.file_id);
        self.state.dataset_uploaded(receipt.file_id.clone());
        self.state.set_status(
            OperationKind::Upload,
            format!("{} (ID: {})", receipt.message, receipt.file_id),
        );
        Ok(receipt)
    }

    fn finish_train(
        &mut self,
        result: Result<TrainingReport, ServiceError>,
    ) -> Result<TrainingReport, ControllerError> {
        let report = match result {
            Ok(report) => report,
            Err(e) => return self.fail(OperationKind::Train, e),
        };
        self.state.release();

        info!("training finished with loss {}", report.final_loss);
        self.state.model_trained(report.final_loss);
        self.state.set_status(
            OperationKind::Train,
            format!("Training completed. Final loss: {:.6}", report.final_loss),
        );
        Ok(report)
    }

    fn finish_predict(
        &mut self,
        result: Result<Prediction, ServiceError>,
    ) -> Result<Prediction, ControllerError> {
        let prediction = match result {
            Ok(prediction) => prediction,
            Err(e) => return self.fail(OperationKind::Predict, e),
        };
        self.state.release();

        info!("prediction: {}", prediction.prediction);
        self.state.prediction_made(prediction.prediction);
        self.state.set_status(
            OperationKind::Predict,
            format!("Prediction: {:.6}", prediction.prediction),
        );
        Ok(prediction)
    }

    fn finish_cleanup(
        &mut self,
        result: Result<CleanupReport, ServiceError>,
    ) -> Result<CleanupReport, ControllerError> {
        let report = match result {
            Ok(report) => report,
            Err(e) => return self.fail(OperationKind::Cleanup, e),
        };

        let removed = report.files_removed;
        info!(
            "cleanup removed {} upload(s) and {} processed file(s)",
            removed.uploads, removed.processed
        );
        self.state.reset();
        self.state.set_status(
            OperationKind::Cleanup,
            format!(
                "{} (uploads removed: {}, processed removed: {})",
                report.message, removed.uploads, removed.processed
            ),
        );
        Ok(report)
    }
}

/// Status text for a failed round trip. Only train and predict failures carry
/// a service detail worth showing.
fn failure_text(kind: OperationKind, err: &ServiceError) -> String {
    let detail = match err {
        ServiceError::Transport(_) => {
            return match kind {
                OperationKind::Upload => "Error connecting to server.",
                OperationKind::Train => "Error during training.",
                OperationKind::Predict => "Error during prediction.",
                OperationKind::Cleanup => "Error during cleanup.",
            }
            .to_string();
        }
        ServiceError::Rejected {
            detail: Some(detail),
            ..
        } => detail.clone(),
        ServiceError::Rejected { status, .. } => format!("HTTP {status}"),
    };

    match kind {
        OperationKind::Upload => "Upload failed. Please check file format.".into(),
        OperationKind::Train => format!("Training failed: {detail}"),
        OperationKind::Predict => format!("Prediction failed: {detail}"),
        OperationKind::Cleanup => "Cleanup failed.".into(),
    }
}

impl<S: TrainingService + 'static> Actor for Controller<S> {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!("controller started");
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!("controller stopped, session dropped");
    }
}

/* -------------------------------------------------------------------------- */
/*                                  Handlers                                  */
/* -------------------------------------------------------------------------- */

impl<S: TrainingService + 'static> Handler<Upload> for Controller<S> {
    type Result = ResponseActFuture<Self, Result<UploadReceipt, ControllerError>>;

    fn handle(&mut self, msg: Upload, _ctx: &mut Self::Context) -> Self::Result {
        let file = match validate_upload_ready(&self.state, msg.file) {
            Ok(file) => file,
            Err(e) => return self.reject(OperationKind::Upload, e),
        };

        self.state.begin(OperationKind::Upload, "Uploading...");
        info!("uploading {} ({} bytes)", file.name, file.bytes.len());

        let service = Arc::clone(&self.service);
        Box::pin(
            async move { service.upload(file).await }
                .into_actor(self)
                .map(|result, act, _ctx| act.finish_upload(result)),
        )
    }
}

impl<S: TrainingService + 'static> Handler<Train> for Controller<S> {
    type Result = ResponseActFuture<Self, Result<TrainingReport, ControllerError>>;

    fn handle(&mut self, msg: Train, _ctx: &mut Self::Context) -> Self::Result {
        let config = match validate_train_ready(
            &self.state,
            &msg.hidden_layers,
            &msg.activation,
            &msg.optimizer,
            &msg.max_iterations,
        ) {
            Ok(config) => config,
            Err(e) => return self.reject(OperationKind::Train, e),
        };

        self.state
            .begin(OperationKind::Train, "Training neural network...");
        info!(
            "training on {} with layers {:?}, {} / {}, max_iter={}",
            config.dataset_id,
            config.hidden_layer_sizes,
            config.activation,
            config.optimizer,
            config.max_iterations
        );

        let service = Arc::clone(&self.service);
        Box::pin(
            async move { service.train(config).await }
                .into_actor(self)
                .map(|result, act, _ctx| act.finish_train(result)),
        )
    }
}

impl<S: TrainingService + 'static> Handler<Predict> for Controller<S> {
    type Result = ResponseActFuture<Self, Result<Prediction, ControllerError>>;

    fn handle(&mut self, msg: Predict, _ctx: &mut Self::Context) -> Self::Result {
        let input_vector = match validate_predict_ready(&self.state, &msg.inputs) {
            Ok(inputs) => inputs,
            Err(e) => return self.reject(OperationKind::Predict, e),
        };
        // validation guarantees a model, which implies a dataset
        let Some(dataset_id) = self.state.dataset_id().map(str::to_string) else {
            return self.reject(OperationKind::Predict, ValidationError::NoTrainedModel);
        };

        self.state.begin(OperationKind::Predict, "Making prediction...");
        let request = PredictionRequest {
            dataset_id,
            input_vector,
        };

        let service = Arc::clone(&self.service);
        Box::pin(
            async move { service.predict(request).await }
                .into_actor(self)
                .map(|result, act, _ctx| act.finish_predict(result)),
        )
    }
}

impl<S: TrainingService + 'static> Handler<Cleanup> for Controller<S> {
    type Result = ResponseActFuture<Self, Result<CleanupReport, ControllerError>>;

    fn handle(&mut self, _msg: Cleanup, _ctx: &mut Self::Context) -> Self::Result {
        if let Err(e) = validate_cleanup_ready(&self.state) {
            return self.reject(OperationKind::Cleanup, e);
        }

        self.state
            .begin(OperationKind::Cleanup, "Cleaning up server artifacts...");

        let service = Arc::clone(&self.service);
        Box::pin(
            async move { service.cleanup().await }
                .into_actor(self)
                .map(|result, act, _ctx| act.finish_cleanup(result)),
        )
    }
}

impl<S: TrainingService + 'static> Handler<Snapshot> for Controller<S> {
    type Result = MessageResult<Snapshot>;

    fn handle(&mut self, _msg: Snapshot, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(SessionSnapshot {
            enablement: derive_enablement(&self.state),
            state: self.state.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_failures_use_generic_text() {
        let err = ServiceError::Transport("connection refused".into());
        assert_eq!(
            failure_text(OperationKind::Upload, &err),
            "Error connecting to server."
        );
        assert_eq!(
            failure_text(OperationKind::Train, &err),
            "Error during training."
        );
    }

    #[test]
    fn train_and_predict_surface_detail_verbatim() {
        let err = ServiceError::Rejected {
            status: 404,
            detail: Some("File not found".into()),
        };
        assert_eq!(
            failure_text(OperationKind::Train, &err),
            "Training failed: File not found"
        );
        assert_eq!(
            failure_text(OperationKind::Predict, &err),
            "Prediction failed: File not found"
        );
        assert_eq!(failure_text(OperationKind::Cleanup, &err), "Cleanup failed.");
    }

    #[test]
    fn missing_detail_falls_back_to_status() {
        let err = ServiceError::Rejected {
            status: 500,
            detail: None,
        };
        assert_eq!(
            failure_text(OperationKind::Predict, &err),
            "Prediction failed: HTTP 500"
        );
        assert_eq!(
            failure_text(OperationKind::Upload, &err),
            "Upload failed. Please check file format."
        );
    }
}
