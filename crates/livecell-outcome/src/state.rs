#![forbid(unsafe_code)]

//! Four-variant operation lifecycle.

use crate::result::OperationResult;

/// Where an operation stands: not started, running, or finished.
///
/// `Idle` and `InProgress` carry no data. The type does not enforce any
/// order of transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "envelope", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "envelope", serde(tag = "variant", content = "value"))]
pub enum OperationState<D, E> {
    Idle,
    InProgress,
    Success(D),
    Error(E),
}

impl<D, E> Default for OperationState<D, E> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<D, E> OperationState<D, E> {
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub const fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress)
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    #[must_use]
    pub const fn success_data(&self) -> Option<&D> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub const fn error_data(&self) -> Option<&E> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Transform the success payload. The other variants pass through.
    pub fn map_success<O>(self, f: impl FnOnce(D) -> O) -> OperationState<O, E> {
        match self {
            Self::Idle => OperationState::Idle,
            Self::InProgress => OperationState::InProgress,
            Self::Success(data) => OperationState::Success(f(data)),
            Self::Error(err) => OperationState::Error(err),
        }
    }

    /// Transform the error payload. The other variants pass through.
    pub fn map_error<O>(self, f: impl FnOnce(E) -> O) -> OperationState<D, O> {
        match self {
            Self::Idle => OperationState::Idle,
            Self::InProgress => OperationState::InProgress,
            Self::Success(data) => OperationState::Success(data),
            Self::Error(err) => OperationState::Error(f(err)),
        }
    }

    /// The finished outcome, or `None` while idle or in progress.
    #[must_use]
    pub fn to_operation_result(self) -> Option<OperationResult<D, E>> {
        match self {
            Self::Success(data) => Some(OperationResult::Success(data)),
            Self::Error(err) => Some(OperationResult::Error(err)),
            Self::Idle | Self::InProgress => None,
        }
    }

    /// Run `f` on the success payload, then return `self` unchanged.
    #[must_use]
    pub fn do_on_success(self, f: impl FnOnce(&D)) -> Self {
        if let Self::Success(data) = &self {
            f(data);
        }
        self
    }

    /// Run `f` on the error payload, then return `self` unchanged.
    #[must_use]
    pub fn do_on_error(self, f: impl FnOnce(&E)) -> Self {
        if let Self::Error(err) = &self {
            f(err);
        }
        self
    }

    /// Run `f` if the operation is in progress, then return `self` unchanged.
    #[must_use]
    pub fn do_on_progress(self, f: impl FnOnce()) -> Self {
        if self.is_in_progress() {
            f();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    type State = OperationState<Vec<u8>, String>;

    #[test]
    fn default_is_idle() {
        let state = State::default();
        assert!(state.is_idle());
        assert!(!state.is_in_progress());
        assert_eq!(state.success_data(), None);
    }

    #[test]
    fn unfinished_states_have_no_result() {
        assert_eq!(State::Idle.to_operation_result(), None);
        assert_eq!(State::InProgress.to_operation_result(), None);
    }

    #[test]
    fn finished_states_convert() {
        let ok = State::Success(vec![1, 2]);
        assert_eq!(
            ok.to_operation_result(),
            Some(OperationResult::Success(vec![1, 2]))
        );
        let err = State::Error("offline".into());
        assert_eq!(
            err.to_operation_result(),
            Some(OperationResult::Error("offline".to_string()))
        );
    }

    #[test]
    fn map_success_passes_other_variants_through() {
        assert_eq!(State::Idle.map_success(|v| v.len()), OperationState::Idle);
        assert_eq!(
            State::InProgress.map_success(|v| v.len()),
            OperationState::InProgress
        );
        assert_eq!(
            State::Success(vec![0; 3]).map_success(|v| v.len()),
            OperationState::Success(3)
        );
        assert_eq!(
            State::Error("x".into()).map_success(|v| v.len()),
            OperationState::Error("x".to_string())
        );
    }

    #[test]
    fn map_error_transforms_only_error() {
        let err: OperationState<u8, &str> = OperationState::Error("timeout");
        assert_eq!(err.map_error(str::len), OperationState::Error(7));
        let ok: OperationState<u8, &str> = OperationState::Success(1);
        assert_eq!(ok.map_error(str::len), OperationState::Success(1));
    }

    #[test]
    fn branch_callbacks_follow_lifecycle() {
        let log = RefCell::new(Vec::new());
        let lifecycle = [
            State::Idle,
            State::InProgress,
            State::Success(vec![7]),
            State::Error("bad".into()),
        ];
        for state in lifecycle {
            let _ = state
                .do_on_progress(|| log.borrow_mut().push("progress".to_string()))
                .do_on_success(|d| log.borrow_mut().push(format!("success {d:?}")))
                .do_on_error(|e| log.borrow_mut().push(format!("error {e}")));
        }
        assert_eq!(
            *log.borrow(),
            vec!["progress", "success [7]", "error bad"]
        );
    }

    #[test]
    fn callbacks_return_same_value() {
        let state: OperationState<u8, u8> = OperationState::InProgress;
        assert_eq!(state.do_on_progress(|| {}), OperationState::InProgress);
    }
}
