use thiserror::Error;

/// Failures reported by the list operations.
///
/// Every operation either fully succeeds or returns one of these and leaves
/// the list untouched; nothing is retried or escalated internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ListError {
    /// Node allocation could not be satisfied.
    #[error("node allocation failed")]
    AllocationFailure,

    /// Removal was attempted on a list with no elements.
    #[error("list is empty")]
    EmptyList,

    /// The removal anchor has no successor to remove.
    #[error("anchor node has no successor")]
    NoSuccessor,

    /// No anchor was supplied where a concrete node was required.
    #[error("operation requires a concrete anchor node")]
    InvalidAnchor,
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, ListError>;
