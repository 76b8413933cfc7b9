//! Boundary to the external training/inference service.
//!
//!   POST   /upload/   → store a dataset, returns its identifier
//!   POST   /train/    → fit a model on a stored dataset
//!   POST   /predict/  → run the fitted model on one input vector
//!   DELETE /cleanup   → purge uploaded and processed artifacts

mod http;
mod wire;

pub use http::HttpService;
pub use wire::{CleanupReport, FilesRemoved, Prediction, TrainingReport, UploadReceipt};

use crate::{
    configs::{PredictionRequest, TrainingConfig},
    error::ServiceError,
};

/// A dataset file selected by the user, already read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl DatasetFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// The remote service that stores datasets, trains models and serves predictions.
///
/// Each call is a single round trip with no retries. A 2xx answer is the only
/// success signal; everything else comes back as a `ServiceError`.
#[async_trait::async_trait]
pub trait TrainingService: Send + Sync {
    /// Uploads a dataset file.
    async fn upload(&self, file: DatasetFile) -> Result<UploadReceipt, ServiceError>;

    /// Trains a model with the given configuration.
    async fn train(&self, config: TrainingConfig) -> Result<TrainingReport, ServiceError>;

    /// Runs one prediction with the trained model.
    async fn predict(&self, request: PredictionRequest) -> Result<Prediction, ServiceError>;

    /// Removes every server-side artifact.
    async fn cleanup(&self) -> Result<CleanupReport, ServiceError>;
}
