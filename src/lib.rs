//! Client-side controller for a dataset → train → predict → cleanup workflow
//! against a remote training service.

pub mod configs;
pub mod dispatcher;
pub mod enablement;
pub mod error;
pub mod service;
pub mod session;
pub mod shell;
pub mod validation;

pub use dispatcher::{Cleanup, Controller, Predict, SessionSnapshot, Snapshot, Train, Upload};
pub use enablement::{derive_enablement, Enablement};
pub use error::{ControllerError, ServiceError, ValidationError};
pub use service::{DatasetFile, HttpService, TrainingService};
pub use session::{OperationKind, PendingOperation, SessionState};
