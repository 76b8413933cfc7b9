use std::fmt;

/// The four operations the controller can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Upload,
    Train,
    Predict,
    Cleanup,
}

impl OperationKind {
    pub const ALL: [OperationKind; 4] = [Self::Upload, Self::Train, Self::Predict, Self::Cleanup];
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Upload => "upload",
            Self::Train => "train",
            Self::Predict => "predict",
            Self::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

/// The single in-flight request, if any. Acts as the controller's mutex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingOperation {
    #[default]
    Idle,
    Uploading,
    Training,
    Predicting,
    Cleaning,
}

impl PendingOperation {
    /// Returns the operation kind that is in flight, or `None` when idle.
    pub fn kind(self) -> Option<OperationKind> {
        match self {
            Self::Idle => None,
            Self::Uploading => Some(OperationKind::Upload),
            Self::Training => Some(OperationKind::Train),
            Self::Predicting => Some(OperationKind::Predict),
            Self::Cleaning => Some(OperationKind::Cleanup),
        }
    }
}

impl From<OperationKind> for PendingOperation {
    fn from(kind: OperationKind) -> Self {
        match kind {
            OperationKind::Upload => Self::Uploading,
            OperationKind::Train => Self::Training,
            OperationKind::Predict => Self::Predicting,
            OperationKind::Cleanup => Self::Cleaning,
        }
    }
}

/// One independent display string per operation kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBoard {
    upload: String,
    train: String,
    predict: String,
    cleanup: String,
}

impl StatusBoard {
    pub fn get(&self, kind: OperationKind) -> &str {
        match kind {
            OperationKind::Upload => &self.upload,
            OperationKind::Train => &self.train,
            OperationKind::Predict => &self.predict,
            OperationKind::Cleanup => &self.cleanup,
        }
    }

    pub(crate) fn set(&mut self, kind: OperationKind, message: impl Into<String>) {
        let slot = match kind {
            OperationKind::Upload => &mut self.upload,
            OperationKind::Train => &mut self.train,
            OperationKind::Predict => &mut self.predict,
            OperationKind::Cleanup => &mut self.cleanup,
        };
        *slot = message.into();
    }
}

/// Where the user is in the upload → train → predict pipeline.
///
/// Only the dispatcher writes to it; everything else receives a shared
/// reference or a clone. `trained_loss` and `last_prediction` are never set
/// while `dataset_id` is `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    dataset_id: Option<String>,
    trained_loss: Option<f64>,
    last_prediction: Option<f64>,
    pending: PendingOperation,
    status: StatusBoard,
}

impl SessionState {
    /// Creates the initial empty state.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dataset_id(&self) -> Option<&str> {
        self.dataset_id.as_deref()
    }

    pub fn trained_loss(&self) -> Option<f64> {
        self.trained_loss
    }

    pub fn last_prediction(&self) -> Option<f64> {
        self.last_prediction
    }

    pub fn pending(&self) -> PendingOperation {
        self.pending
    }

    pub fn is_idle(&self) -> bool {
        self.pending == PendingOperation::Idle
    }

    pub fn status(&self) -> &StatusBoard {
        &self.status
    }

    /// Marks `kind` as in flight and shows its progress message.
    pub(crate) fn begin(&mut self, kind: OperationKind, message: impl Into<String>) {
        self.pending = kind.into();
        self.status.set(kind, message);
    }

    /// Releases the in-flight flag. Every completion path calls this first.
    pub(crate) fn release(&mut self) {
        self.pending = PendingOperation::Idle;
    }

    pub(crate) fn set_status(&mut self, kind: OperationKind, message: impl Into<String>) {
        self.status.set(kind, message);
    }

    /// A new dataset invalidates any model or prediction derived from the old one.
    pub(crate) fn dataset_uploaded(&mut self, dataset_id: String) {
        self.dataset_id = Some(dataset_id);
        self.trained_loss = None;
        self.last_prediction = None;
    }

    /// A new model invalidates any prediction made with the old one.
    pub(crate) fn model_trained(&mut self, loss: f64) {
        if self.dataset_id.is_none() {
            return;
        }
        self.trained_loss = Some(loss);
        self.last_prediction = None;
    }

    pub(crate) fn prediction_made(&mut self, prediction: f64) {
        if self.trained_loss.is_none() {
            return;
        }
        self.last_prediction = Some(prediction);
    }

    /// Drops every field back to the initial empty value.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trained() -> SessionState {
        let mut state = SessionState::new();
        state.dataset_uploaded("abc123".into());
        state.model_trained(0.5);
        state.prediction_made(1.25);
        state
    }

    #[test]
    fn upload_clears_model_and_prediction() {
        let mut state = trained();
        state.dataset_uploaded("def456".into());
        assert_eq!(state.dataset_id(), Some("def456"));
        assert_eq!(state.trained_loss(), None);
        assert_eq!(state.last_prediction(), None);
    }

    #[test]
    fn train_clears_prediction() {
        let mut state = trained();
        state.model_trained(0.25);
        assert_eq!(state.trained_loss(), Some(0.25));
        assert_eq!(state.last_prediction(), None);
    }

    #[test]
    fn model_requires_dataset() {
        let mut state = SessionState::new();
        state.model_trained(0.1);
        state.prediction_made(3.0);
        assert_eq!(state.trained_loss(), None);
        assert_eq!(state.last_prediction(), None);
    }

    #[test]
    fn begin_and_release_toggle_pending() {
        let mut state = SessionState::new();
        state.begin(OperationKind::Train, "Training neural network...");
        assert_eq!(state.pending(), PendingOperation::Training);
        assert_eq!(state.pending().kind(), Some(OperationKind::Train));
        assert!(!state.is_idle());

        state.release();
        assert!(state.is_idle());
        assert_eq!(
            state.status().get(OperationKind::Train),
            "Training neural network..."
        );
    }

    #[test]
    fn reset_returns_to_initial_value() {
        let mut state = trained();
        state.set_status(OperationKind::Upload, "done");
        state.begin(OperationKind::Cleanup, "Cleaning up server artifacts...");
        state.reset();
        assert_eq!(state, SessionState::new());
    }

    #[test]
    fn status_slots_are_independent() {
        let mut board = StatusBoard::default();
        for kind in OperationKind::ALL {
            board.set(kind, kind.to_string());
        }
        assert_eq!(board.get(OperationKind::Upload), "upload");
        assert_eq!(board.get(OperationKind::Cleanup), "cleanup");
    }
}
