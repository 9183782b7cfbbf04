//! Use Case Result Type
//!
//! A sealed result type for use case execution. Success can only be created
//! through the UnitOfWork, so every successful operation has emitted its
//! domain event and audit entry.

use super::error::UseCaseError;

/// Outcome of a use case.
///
/// ```ignore
/// if name.is_empty() {
///     return UseCaseResult::failure(UseCaseError::validation("NAME_REQUIRED", "Name is required"));
/// }
/// unit_of_work.commit(&circle, event, &command).await
/// ```
#[derive(Debug)]
pub enum UseCaseResult<T> {
    Success(T),
    Failure(UseCaseError),
}

impl<T> UseCaseResult<T> {
    /// Any code can report a failure.
    pub fn failure(error: UseCaseError) -> Self {
        UseCaseResult::Failure(error)
    }

    /// Only the unit of work reports success.
    pub(crate) fn success(value: T) -> Self {
        UseCaseResult::Success(value)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UseCaseResult::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, UseCaseResult::Failure(_))
    }

    pub fn error(&self) -> Option<&UseCaseError> {
        match self {
            UseCaseResult::Success(_) => None,
            UseCaseResult::Failure(e) => Some(e),
        }
    }

    /// Map the success value, keeping failures.
    pub fn map<U, F>(self, f: F) -> UseCaseResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            UseCaseResult::Success(v) => UseCaseResult::Success(f(v)),
            UseCaseResult::Failure(e) => UseCaseResult::Failure(e),
        }
    }

    pub fn into_result(self) -> Result<T, UseCaseError> {
        match self {
            UseCaseResult::Success(v) => Ok(v),
            UseCaseResult::Failure(e) => Err(e),
        }
    }
}

impl<T> From<UseCaseResult<T>> for Result<T, UseCaseError> {
    fn from(result: UseCaseResult<T>) -> Self {
        result.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure() {
        let result: UseCaseResult<i32> =
            UseCaseResult::failure(UseCaseError::validation("TEST", "Test error"));
        assert!(result.is_failure());
        assert_eq!(result.error().map(|e| e.code()), Some("TEST"));
    }

    #[test]
    fn test_success_map() {
        let result = UseCaseResult::success(21).map(|v| v * 2);
        assert!(result.is_success());
        assert_eq!(result.into_result().unwrap(), 42);
    }

    #[test]
    fn test_into_result_failure() {
        let result: UseCaseResult<()> =
            UseCaseResult::failure(UseCaseError::not_found("NOPE", "missing"));
        let err = result.into_result().unwrap_err();
        assert_eq!(err.http_status_code(), 404);
    }
}
