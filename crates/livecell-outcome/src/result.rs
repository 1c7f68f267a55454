#![forbid(unsafe_code)]

//! Two-variant operation outcome.

use crate::state::OperationState;

/// The outcome of a finished operation.
///
/// Mapping and branch callbacks consume and return the value, so calls
/// chain:
///
/// ```
/// use livecell_outcome::{IntoOperation, OperationResult};
///
/// let mut logged = Vec::new();
/// let result: OperationResult<u32, String> = 21u32.into_success();
/// let doubled = result
///     .map_success(|n| n * 2)
///     .do_on_success(|n| logged.push(*n));
/// assert_eq!(doubled.success_data(), Some(&42));
/// assert_eq!(logged, vec![42]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "envelope", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "envelope", serde(tag = "variant", content = "value"))]
pub enum OperationResult<D, E> {
    Success(D),
    Error(E),
}

impl<D, E> OperationResult<D, E> {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The success payload, if this is `Success`.
    #[must_use]
    pub const fn success_data(&self) -> Option<&D> {
        match self {
            Self::Success(data) => Some(data),
            Self::Error(_) => None,
        }
    }

    /// The error payload, if this is `Error`.
    #[must_use]
    pub const fn error_data(&self) -> Option<&E> {
        match self {
            Self::Success(_) => None,
            Self::Error(err) => Some(err),
        }
    }

    #[must_use]
    pub fn into_success_data(self) -> Option<D> {
        match self {
            Self::Success(data) => Some(data),
            Self::Error(_) => None,
        }
    }

    #[must_use]
    pub fn into_error_data(self) -> Option<E> {
        match self {
            Self::Success(_) => None,
            Self::Error(err) => Some(err),
        }
    }

    /// Borrow both payloads.
    #[must_use]
    pub const fn as_ref(&self) -> OperationResult<&D, &E> {
        match self {
            Self::Success(data) => OperationResult::Success(data),
            Self::Error(err) => OperationResult::Error(err),
        }
    }

    /// Transform the success payload. `Error` passes through untouched.
    pub fn map_success<O>(self, f: impl FnOnce(D) -> O) -> OperationResult<O, E> {
        match self {
            Self::Success(data) => OperationResult::Success(f(data)),
            Self::Error(err) => OperationResult::Error(err),
        }
    }

    /// Transform the error payload. `Success` passes through untouched.
    pub fn map_error<O>(self, f: impl FnOnce(E) -> O) -> OperationResult<D, O> {
        match self {
            Self::Success(data) => OperationResult::Success(data),
            Self::Error(err) => OperationResult::Error(f(err)),
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

    /// Lift into the four-variant lifecycle type. Total.
    #[must_use]
    pub fn to_operation_state(self) -> OperationState<D, E> {
        match self {
            Self::Success(data) => OperationState::Success(data),
            Self::Error(err) => OperationState::Error(err),
        }
    }

    /// Convert into a standard `Result`.
    pub fn into_result(self) -> Result<D, E> {
        match self {
            Self::Success(data) => Ok(data),
            Self::Error(err) => Err(err),
        }
    }
}

impl<D, E> From<Result<D, E>> for OperationResult<D, E> {
    fn from(result: Result<D, E>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(err) => Self::Error(err),
        }
    }
}

impl<D, E> From<OperationResult<D, E>> for Result<D, E> {
    fn from(result: OperationResult<D, E>) -> Self {
        result.into_result()
    }
}

impl<D, E> From<OperationResult<D, E>> for OperationState<D, E> {
    fn from(result: OperationResult<D, E>) -> Self {
        result.to_operation_state()
    }
}

/// Wrap any value as one side of an [`OperationResult`].
pub trait IntoOperation: Sized {
    /// `OperationResult::Success(self)`.
    fn into_success<E>(self) -> OperationResult<Self, E> {
        OperationResult::Success(self)
    }

    /// `OperationResult::Error(self)`.
    fn into_error<D>(self) -> OperationResult<D, Self> {
        OperationResult::Error(self)
    }
}

impl<T> IntoOperation for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug, Clone, PartialEq)]
    enum LoginError {
        BadPassword,
        Locked { minutes: u32 },
    }

    #[test]
    fn success_accessors() {
        let result: OperationResult<&str, LoginError> = "token".into_success();
        assert!(result.is_success());
        assert!(!result.is_error());
        assert_eq!(result.success_data(), Some(&"token"));
        assert_eq!(result.error_data(), None);
    }

    #[test]
    fn error_accessors() {
        let result: OperationResult<String, LoginError> = LoginError::BadPassword.into_error();
        assert!(result.is_error());
        assert_eq!(result.success_data(), None);
        assert_eq!(result.error_data(), Some(&LoginError::BadPassword));
        assert_eq!(result.into_error_data(), Some(LoginError::BadPassword));
    }

    #[test]
    fn map_success_leaves_error_alone() {
        let ok: OperationResult<u8, LoginError> = OperationResult::Success(2);
        assert_eq!(ok.map_success(|n| n * 10), OperationResult::Success(20));

        let err: OperationResult<u8, LoginError> =
            OperationResult::Error(LoginError::Locked { minutes: 5 });
        assert_eq!(
            err.map_success(|n| n * 10),
            OperationResult::Error(LoginError::Locked { minutes: 5 })
        );
    }

    #[test]
    fn map_error_widens_error_type() {
        let err: OperationResult<u8, LoginError> = LoginError::BadPassword.into_error();
        let mapped: OperationResult<u8, String> = err.map_error(|e| format!("{e:?}"));
        assert_eq!(mapped, OperationResult::Error("BadPassword".to_string()));

        let ok: OperationResult<u8, LoginError> = 1u8.into_success();
        assert_eq!(ok.map_error(|_| 0u32), OperationResult::Success(1));
    }

    #[test]
    fn branch_callbacks_fire_only_on_matching_variant() {
        let hits = Cell::new((0u32, 0u32));
        let ok: OperationResult<u8, u8> = OperationResult::Success(1);
        let same = ok
            .do_on_success(|_| hits.set((hits.get().0 + 1, hits.get().1)))
            .do_on_error(|_| hits.set((hits.get().0, hits.get().1 + 1)));
        assert_eq!(same, ok);
        assert_eq!(hits.get(), (1, 0));

        let err: OperationResult<u8, u8> = OperationResult::Error(9);
        let _ = err
            .do_on_success(|_| hits.set((hits.get().0 + 1, hits.get().1)))
            .do_on_error(|e| assert_eq!(*e, 9));
        assert_eq!(hits.get(), (1, 0));
    }

    #[test]
    fn state_conversion_round_trip() {
        let ok: OperationResult<u8, u8> = OperationResult::Success(3);
        assert_eq!(ok.to_operation_state().to_operation_result(), Some(ok));

        let err: OperationResult<u8, u8> = OperationResult::Error(4);
        let state: OperationState<u8, u8> = err.into();
        assert_eq!(state, OperationState::Error(4));
        assert_eq!(state.to_operation_result(), Some(err));
    }

    #[test]
    fn as_ref_borrows_without_consuming() {
        let result: OperationResult<String, LoginError> = "token".to_string().into_success();
        let borrowed = result.as_ref().map_success(String::len);
        assert_eq!(borrowed, OperationResult::Success(5));
        assert_eq!(result.success_data().map(String::as_str), Some("token"));

        let err: OperationResult<String, LoginError> = LoginError::BadPassword.into_error();
        assert_eq!(err.as_ref().error_data(), Some(&&LoginError::BadPassword));
    }

    #[test]
    fn std_result_conversions() {
        let from_ok = OperationResult::from(Ok::<u8, &str>(1));
        assert_eq!(from_ok, OperationResult::Success(1));
        let back: Result<u8, &str> = OperationResult::<u8, &str>::Error("no").into();
        assert_eq!(back, Err("no"));
    }
}
