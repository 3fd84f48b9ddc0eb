use thiserror::Error;

/// Error types for `StrBuf` and `FixedStrBuf` operations
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum StrBufError {
    /// Size arithmetic overflowed, a fixed region would be exceeded, or a
    /// length argument is inconsistent with the current content
    #[error("Range error: requested {requested} bytes, limit is {limit}")]
    Range {
        /// Size or length that was requested
        requested: usize,
        /// Largest value the operation could have accepted
        limit: usize,
    },
    /// The allocator could not provide the requested storage
    #[error("Allocation failure: could not allocate {size} bytes")]
    AllocationFailure {
        /// Number of bytes requested from the allocator
        size: usize,
    },
    /// Input was rejected for a reason other than space
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of why the input was rejected
        reason: &'static str,
    },
    /// The buffer has no room for its terminator
    #[error("Illegal state: {used} bytes used with capacity {capacity}")]
    IllegalState {
        /// Content length at the time of the call
        used: usize,
        /// Capacity at the time of the call
        capacity: usize,
    },
}

/// Coarse category of a [`StrBufError`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
    Range,
    AllocationFailure,
    InvalidInput,
    IllegalState,
}

impl StrBufError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            StrBufError::Range { .. } => ErrorKind::Range,
            StrBufError::AllocationFailure { .. } => ErrorKind::AllocationFailure,
            StrBufError::InvalidInput { .. } => ErrorKind::InvalidInput,
            StrBufError::IllegalState { .. } => ErrorKind::IllegalState,
        }
    }

    pub(crate) fn overflow(requested: usize) -> Self {
        StrBufError::Range {
            requested,
            limit: usize::MAX,
        }
    }
}

pub type Result<T> = core::result::Result<T, StrBufError>;
