//! Three-state holder for the result of one asynchronous source.

use std::fmt;

use crate::ports::PortError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Coarse classification of a failed request, kept for rendering.
pub enum FailureKind {
    /// Transport failure or error status.
    Network,
    /// Malformed response.
    Decode,
    /// Location permission refused.
    PermissionDenied,
    /// Location fix could not be obtained.
    NoFixAvailable,
    /// The requested record does not exist.
    NotFound,
    /// Anything else.
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Cloneable snapshot of a [`PortError`].
pub struct Failure {
    /// What went wrong.
    pub kind: FailureKind,
    /// Human readable description.
    pub message: String,
}

impl Failure {
    /// Build a failure from parts.
    #[must_use]
    pub fn new<S: Into<String>>(kind: FailureKind, message: S) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.message)
    }
}

impl From<&PortError> for Failure {
    fn from(err: &PortError) -> Self {
        let kind = match err {
            PortError::Network(_) => FailureKind::Network,
            PortError::Decode(_) => FailureKind::Decode,
            PortError::PermissionDenied => FailureKind::PermissionDenied,
            PortError::NoFixAvailable => FailureKind::NoFixAvailable,
            PortError::PointNotFound => FailureKind::NotFound,
            PortError::Internal(_) => FailureKind::Internal,
        };
        Self::new(kind, err.to_string())
    }
}

impl From<PortError> for Failure {
    fn from(err: PortError) -> Self {
        Self::from(&err)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// State of an asynchronous source.
pub enum AsyncCell<T> {
    /// Request issued, no answer yet.
    Pending,
    /// Request answered with a value.
    Ready(T),
    /// Request answered with an error.
    Failed(Failure),
}

impl<T> Default for AsyncCell<T> {
    fn default() -> Self {
        Self::Pending
    }
}

impl<T> AsyncCell<T> {
    /// Convert a finished request into a settled cell.
    #[must_use]
    pub fn settle(result: Result<T, Failure>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(failure) => Self::Failed(failure),
        }
    }

    /// Whether the request is outstanding.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Value of a ready cell.
    #[must_use]
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Pending | Self::Failed(_) => None,
        }
    }

    /// Failure of a failed cell.
    #[must_use]
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Failed(failure) => Some(failure),
            Self::Pending | Self::Ready(_) => None,
        }
    }
}

impl<T> AsyncCell<Vec<T>> {
    /// Items of a ready list, or an empty slice while pending or failed.
    #[must_use]
    pub fn items(&self) -> &[T] {
        self.ready().map(Vec::as_slice).unwrap_or_default()
    }
}
