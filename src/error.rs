use std::{error::Error, fmt};

use crate::session::OperationKind;

/// Local rejections raised before any request leaves the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Another operation is still in flight.
    OperationPending(OperationKind),
    /// Upload attempted without a selected file.
    MissingFile,
    /// Train attempted before a dataset was uploaded.
    MissingDataset,
    /// The hidden layer sizes are not a comma-separated list of positive integers.
    MalformedHiddenLayers(String),
    UnknownActivation(String),
    UnknownOptimizer(String),
    /// Max iterations is zero, negative or not a number.
    InvalidMaxIterations(String),
    /// Predict attempted before a model was trained.
    NoTrainedModel,
    WrongInputArity { got: usize },
    MalformedNumber(String),
}

impl ValidationError {
    /// The text shown to the user in the operation's status slot.
    pub fn status_text(&self) -> String {
        match self {
            Self::OperationPending(kind) => {
                format!("Please wait for the current {kind} to finish.")
            }
            Self::MissingFile => "Please select a file first.".into(),
            Self::MissingDataset => "Please upload a file first.".into(),
            Self::MalformedHiddenLayers(raw) => format!(
                "Invalid hidden layer sizes '{raw}': expected comma-separated positive integers."
            ),
            Self::UnknownActivation(raw) => {
                format!("Unknown activation '{raw}': expected relu, tanh or logistic.")
            }
            Self::UnknownOptimizer(raw) => {
                format!("Unknown optimizer '{raw}': expected adam, sgd or lbfgs.")
            }
            Self::InvalidMaxIterations(raw) => {
                format!("Invalid max iterations '{raw}': expected a positive integer.")
            }
            Self::NoTrainedModel => "Please train a model first.".into(),
            Self::WrongInputArity { .. } => "Please provide exactly 5 input values.".into(),
            Self::MalformedNumber(token) => format!("Invalid input value '{token}'."),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OperationPending(kind) => write!(f, "a {kind} operation is pending"),
            Self::MissingFile => write!(f, "no file selected"),
            Self::MissingDataset => write!(f, "no dataset uploaded"),
            Self::MalformedHiddenLayers(raw) => write!(f, "malformed hidden layers: {raw:?}"),
            Self::UnknownActivation(raw) => write!(f, "unknown activation: {raw:?}"),
            Self::UnknownOptimizer(raw) => write!(f, "unknown optimizer: {raw:?}"),
            Self::InvalidMaxIterations(raw) => write!(f, "invalid max iterations: {raw:?}"),
            Self::NoTrainedModel => write!(f, "no trained model"),
            Self::WrongInputArity { got } => write!(f, "expected 5 input values, got {got}"),
            Self::MalformedNumber(token) => write!(f, "malformed number: {token:?}"),
        }
    }
}

impl Error for ValidationError {}

/// Failures reported by the service boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// The request never got a usable answer: connection failure or an
    /// undecodable success body.
    Transport(String),
    /// The service answered with a non-2xx status.
    Rejected { status: u16, detail: Option<String> },
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
            Self::Rejected {
                status,
                detail: Some(detail),
            } => write!(f, "service rejected request ({status}): {detail}"),
            Self::Rejected {
                status,
                detail: None,
            } => write!(f, "service rejected request ({status})"),
        }
    }
}

impl Error for ServiceError {}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

/// All errors a controller operation can end with.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerError {
    Validation(ValidationError),
    Transport(String),
    Service { status: u16, detail: Option<String> },
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(e) => write!(f, "validation error: {e}"),
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
            Self::Service {
                status,
                detail: Some(detail),
            } => write!(f, "service error ({status}): {detail}"),
            Self::Service {
                status,
                detail: None,
            } => write!(f, "service error ({status})"),
        }
    }
}

impl Error for ControllerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ValidationError> for ControllerError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<ServiceError> for ControllerError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Transport(msg) => Self::Transport(msg),
            ServiceError::Rejected { status, detail } => Self::Service { status, detail },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_onto_controller_taxonomy() {
        let transport: ControllerError = ServiceError::Transport("refused".into()).into();
        assert_eq!(transport, ControllerError::Transport("refused".into()));

        let rejected: ControllerError = ServiceError::Rejected {
            status: 422,
            detail: Some("bad shape".into()),
        }
        .into();
        assert_eq!(
            rejected,
            ControllerError::Service {
                status: 422,
                detail: Some("bad shape".into())
            }
        );
    }

    #[test]
    fn arity_status_text_matches_form_hint() {
        let e = ValidationError::WrongInputArity { got: 3 };
        assert_eq!(e.status_text(), "Please provide exactly 5 input values.");
        assert_eq!(e.to_string(), "expected 5 input values, got 3");
    }
}
