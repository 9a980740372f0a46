/// Errors returned by the checked constructors.
///
/// Everything else in the crate treats bad input as a caller bug and
/// asserts instead.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Input handed to a presorted build was not sorted by key.
    #[error("records are not sorted: key at position {position} is smaller than its predecessor")]
    Unsorted {
        /// First position whose key is smaller than the key before it.
        position: usize,
    },
    /// Lower bound of a range query exceeds its upper bound.
    #[error("invalid range: lower bound exceeds upper bound")]
    InvalidRange,
}

/// Result alias for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;
