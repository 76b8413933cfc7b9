mod client;
mod form;
mod prediction;
mod training;

pub use client::{ClientConfig, API_URL_VAR, DEFAULT_API_URL};
pub use form::WorkflowForm;
pub use prediction::{PredictionRequest, INPUT_DIM};
pub use training::{Activation, OptimizerAlgorithm, TrainingConfig, RANDOM_SEED};
