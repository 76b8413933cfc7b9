use crate::session::SessionState;

/// Which user actions are currently permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enablement {
    pub can_upload: bool,
    pub can_train: bool,
    pub can_predict: bool,
    pub can_cleanup: bool,
}

/// Projects the session onto action enablement. This is the only place the
/// policy lives; views read the result and never recompute it.
pub fn derive_enablement(state: &SessionState) -> Enablement {
    let idle = state.is_idle();
    Enablement {
        can_upload: idle,
        can_train: idle && state.dataset_id().is_some(),
        can_predict: idle && state.trained_loss().is_some(),
        can_cleanup: idle,
    }
}
