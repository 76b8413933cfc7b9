//! Pure checks run on raw form input before any request is issued.
//!
//! None of these functions touch the network or mutate the session; they only
//! read it.

use std::num::NonZeroU32;

use crate::{
    configs::{Activation, OptimizerAlgorithm, TrainingConfig, INPUT_DIM},
    error::ValidationError,
    session::SessionState,
};

fn ensure_idle(state: &SessionState) -> Result<(), ValidationError> {
    match state.pending().kind() {
        Some(kind) => Err(ValidationError::OperationPending(kind)),
        None => Ok(()),
    }
}

/// Checks that an upload can be dispatched. Generic over how the file is held
/// so callers can pass it owned or borrowed and get it back on success.
///
/// # Errors
/// `OperationPending` if a request is in flight, `MissingFile` if no file is
/// selected. File contents are never inspected here.
pub fn validate_upload_ready<F>(
    state: &SessionState,
    selected_file: Option<F>,
) -> Result<F, ValidationError> {
    ensure_idle(state)?;
    selected_file.ok_or(ValidationError::MissingFile)
}

/// Checks that a train request can be dispatched and builds its payload.
///
/// # Args
/// * `state` - Current session.
/// * `raw_hidden_layers` - Comma-separated layer widths, e.g. `"100,50"`.
/// * `raw_activation` - One of `relu`, `tanh`, `logistic`.
/// * `raw_optimizer` - One of `adam`, `sgd`, `lbfgs`.
/// * `raw_max_iterations` - A positive integer.
///
/// # Returns
/// The `TrainingConfig` to send.
///
/// # Errors
/// The first failing check, in the order: pending operation, missing dataset,
/// hidden layers, activation, optimizer, max iterations.
pub fn validate_train_ready(
    state: &SessionState,
    raw_hidden_layers: &str,
    raw_activation: &str,
    raw_optimizer: &str,
    raw_max_iterations: &str,
) -> Result<TrainingConfig, ValidationError> {
    ensure_idle(state)?;
    let dataset_id = state.dataset_id().ok_or(ValidationError::MissingDataset)?;

    let hidden_layer_sizes = parse_hidden_layers(raw_hidden_layers)?;
    let activation: Activation = raw_activation
        .parse()
        .map_err(ValidationError::UnknownActivation)?;
    let optimizer: OptimizerAlgorithm = raw_optimizer
        .parse()
        .map_err(ValidationError::UnknownOptimizer)?;
    let max_iterations = parse_max_iterations(raw_max_iterations)?;

    Ok(TrainingConfig::new(
        dataset_id,
        hidden_layer_sizes,
        activation,
        optimizer,
        max_iterations,
    ))
}

/// Checks that a predict request can be dispatched and parses its input vector.
///
/// # Errors
/// `OperationPending`, then `NoTrainedModel`, then `WrongInputArity` if the
/// token count is not 5, then `MalformedNumber` for the first token that is
/// not a finite float.
pub fn validate_predict_ready(
    state: &SessionState,
    raw_inputs: &str,
) -> Result<[f64; INPUT_DIM], ValidationError> {
    ensure_idle(state)?;
    if state.trained_loss().is_none() {
        return Err(ValidationError::NoTrainedModel);
    }

    let tokens: Vec<&str> = raw_inputs.split(',').map(str::trim).collect();
    if tokens.len() != INPUT_DIM {
        return Err(ValidationError::WrongInputArity { got: tokens.len() });
    }

    let mut inputs = [0.0; INPUT_DIM];
    for (slot, token) in inputs.iter_mut().zip(tokens) {
        *slot = token
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ValidationError::MalformedNumber(token.to_string()))?;
    }
    Ok(inputs)
}

/// Checks that a cleanup can be dispatched. Cleanup only needs the controller
/// to be idle.
pub fn validate_cleanup_ready(state: &SessionState) -> Result<(), ValidationError> {
    ensure_idle(state)
}

fn parse_hidden_layers(raw: &str) -> Result<Vec<u32>, ValidationError> {
    let malformed = || ValidationError::MalformedHiddenLayers(raw.to_string());

    raw.split(',')
        .map(|token| {
            token
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or_else(malformed)
        })
        .collect()
}

fn parse_max_iterations(raw: &str) -> Result<NonZeroU32, ValidationError> {
    raw.trim()
        .parse::<NonZeroU32>()
        .map_err(|_| ValidationError::InvalidMaxIterations(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{service::DatasetFile, session::OperationKind};

    fn with_dataset() -> SessionState {
        let mut state = SessionState::new();
        state.dataset_uploaded("abc123".into());
        state
    }

    fn with_model() -> SessionState {
        let mut state = with_dataset();
        state.model_trained(0.000123);
        state
    }

    #[test]
    fn upload_needs_a_file() {
        let state = SessionState::new();
        assert_eq!(
            validate_upload_ready(&state, None::<&DatasetFile>),
            Err(ValidationError::MissingFile)
        );

        let file = DatasetFile::new("data.pkl", vec![1, 2, 3]);
        assert_eq!(validate_upload_ready(&state, Some(&file)), Ok(&file));
    }

    #[test]
    fn every_operation_is_rejected_while_one_is_pending() {
        let mut state = with_model();
        state.begin(OperationKind::Upload, "Uploading...");
        let file = DatasetFile::new("data.pkl", Vec::new());
        let pending = ValidationError::OperationPending(OperationKind::Upload);

        assert_eq!(validate_upload_ready(&state, Some(&file)), Err(pending.clone()));
        assert_eq!(
            validate_train_ready(&state, "100,50", "relu", "adam", "200"),
            Err(pending.clone())
        );
        assert_eq!(validate_predict_ready(&state, "1,2,3,4,5"), Err(pending.clone()));
        assert_eq!(validate_cleanup_ready(&state), Err(pending));
        assert_eq!(validate_cleanup_ready(&SessionState::new()), Ok(()));
    }

    #[test]
    fn train_without_dataset_is_rejected() {
        let state = SessionState::new();
        assert_eq!(
            validate_train_ready(&state, "100,50", "relu", "adam", "200"),
            Err(ValidationError::MissingDataset)
        );
    }

    #[test]
    fn train_builds_config_from_form_fields() {
        let state = with_dataset();
        let config = validate_train_ready(&state, " 100, 50 ", "relu", "adam", "200").unwrap();
        assert_eq!(config.dataset_id, "abc123");
        assert_eq!(config.hidden_layer_sizes, vec![100, 50]);
        assert_eq!(config.activation, Activation::Relu);
        assert_eq!(config.optimizer, OptimizerAlgorithm::Adam);
        assert_eq!(config.max_iterations.get(), 200);
        assert_eq!(config.random_seed, 42);
    }

    #[test]
    fn malformed_hidden_layers_do_not_panic() {
        let state = with_dataset();
        for raw in ["", "100,,50", "100,abc", "0", "-5,10", "1.5"] {
            assert_eq!(
                validate_train_ready(&state, raw, "relu", "adam", "200"),
                Err(ValidationError::MalformedHiddenLayers(raw.to_string())),
                "input {raw:?}"
            );
        }
    }

    #[test]
    fn unknown_names_and_bad_iterations_are_rejected() {
        let state = with_dataset();
        assert_eq!(
            validate_train_ready(&state, "10", "softmax", "adam", "200"),
            Err(ValidationError::UnknownActivation("softmax".into()))
        );
        assert_eq!(
            validate_train_ready(&state, "10", "tanh", "rmsprop", "200"),
            Err(ValidationError::UnknownOptimizer("rmsprop".into()))
        );
        for raw in ["0", "-1", "ten", ""] {
            assert_eq!(
                validate_train_ready(&state, "10", "tanh", "sgd", raw),
                Err(ValidationError::InvalidMaxIterations(raw.to_string()))
            );
        }
    }

    #[test]
    fn predict_without_model_is_rejected() {
        assert_eq!(
            validate_predict_ready(&with_dataset(), "1,2,3,4,5"),
            Err(ValidationError::NoTrainedModel)
        );
    }

    #[test]
    fn predict_checks_arity_before_numbers() {
        let state = with_model();
        assert_eq!(
            validate_predict_ready(&state, "1.0,2.0,3.0"),
            Err(ValidationError::WrongInputArity { got: 3 })
        );
        assert_eq!(
            validate_predict_ready(&state, "a,b"),
            Err(ValidationError::WrongInputArity { got: 2 })
        );
        assert_eq!(
            validate_predict_ready(&state, "1,2,x,4,5"),
            Err(ValidationError::MalformedNumber("x".into()))
        );
        assert_eq!(
            validate_predict_ready(&state, "1,2,NaN,4,5"),
            Err(ValidationError::MalformedNumber("NaN".into()))
        );
    }

    #[test]
    fn predict_parses_five_floats() {
        let state = with_model();
        assert_eq!(
            validate_predict_ready(&state, "1.0, 2.0,3.0 ,4.0,5.0"),
            Ok([1.0, 2.0, 3.0, 4.0, 5.0])
        );
    }
}
