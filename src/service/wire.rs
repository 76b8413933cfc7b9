use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::configs::{Activation, OptimizerAlgorithm, PredictionRequest, TrainingConfig, INPUT_DIM};

// ─── Responses ───────────────────────────────────────────────────────────────

/// Body of a successful `POST /upload/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadReceipt {
    #[serde(default)]
    pub message: String,
    pub file_id: String,
    #[serde(default)]
    pub status: String,
}

/// Body of a successful `POST /train/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrainingReport {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub file_id: String,
    pub final_loss: f64,
}

/// Body of a successful `POST /predict/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Prediction {
    pub prediction: f64,
    #[serde(default)]
    pub file_id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct FilesRemoved {
    #[serde(default)]
    pub uploads: u64,
    #[serde(default)]
    pub processed: u64,
}

/// Body of a successful `DELETE /cleanup`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CleanupReport {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub files_removed: FilesRemoved,
}

/// Failure body of train/predict. Validation failures carry a list instead of
/// a string, so the detail is kept as raw JSON.
#[derive(Deserialize)]
pub(super) struct ErrorBody {
    detail: Value,
}

impl ErrorBody {
    pub(super) fn into_detail(self) -> String {
        match self.detail {
            Value::String(detail) => detail,
            other => other.to_string(),
        }
    }
}

// ─── Requests ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(super) struct TrainBody<'a> {
    file_id: &'a str,
    hidden_layer_sizes: &'a [u32],
    activation: Activation,
    opt_algo: OptimizerAlgorithm,
    max_iter: u32,
    random_state: u64,
}

impl<'a> From<&'a TrainingConfig> for TrainBody<'a> {
    fn from(config: &'a TrainingConfig) -> Self {
        Self {
            file_id: &config.dataset_id,
            hidden_layer_sizes: &config.hidden_layer_sizes,
            activation: config.activation,
            opt_algo: config.optimizer,
            max_iter: config.max_iterations.get(),
            random_state: config.random_seed,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct PredictBody<'a> {
    file_id: &'a str,
    new_data: &'a [f64; INPUT_DIM],
}

impl<'a> From<&'a PredictionRequest> for PredictBody<'a> {
    fn from(request: &'a PredictionRequest) -> Self {
        Self {
            file_id: &request.dataset_id,
            new_data: &request.input_vector,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use serde_json::json;

    use super::*;

    #[test]
    fn train_body_uses_service_field_names() {
        let config = TrainingConfig::new(
            "abc123",
            vec![100, 50],
            Activation::Relu,
            OptimizerAlgorithm::Adam,
            NonZeroU32::new(200).unwrap(),
        );
        let body = serde_json::to_value(TrainBody::from(&config)).unwrap();
        assert_eq!(
            body,
            json!({
                "file_id": "abc123",
                "hidden_layer_sizes": [100, 50],
                "activation": "relu",
                "opt_algo": "adam",
                "max_iter": 200,
                "random_state": 42
            })
        );
    }

    #[test]
    fn predict_body_sends_new_data() {
        let request = PredictionRequest {
            dataset_id: "abc123".into(),
            input_vector: [1.0, 2.0, 3.0, 4.0, 5.0],
        };
        let body = serde_json::to_value(PredictBody::from(&request)).unwrap();
        assert_eq!(
            body,
            json!({ "file_id": "abc123", "new_data": [1.0, 2.0, 3.0, 4.0, 5.0] })
        );
    }

    #[test]
    fn cleanup_report_tolerates_missing_counts() {
        let report: CleanupReport =
            serde_json::from_str(r#"{"message":"Cleanup completed"}"#).unwrap();
        assert_eq!(report.files_removed, FilesRemoved::default());
    }

    #[test]
    fn structured_detail_is_rendered_as_json() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail":[{"msg":"field required"}]}"#).unwrap();
        assert_eq!(body.into_detail(), r#"[{"msg":"field required"}]"#);

        let body: ErrorBody = serde_json::from_str(r#"{"detail":"File not found"}"#).unwrap();
        assert_eq!(body.into_detail(), "File not found");
    }
}
