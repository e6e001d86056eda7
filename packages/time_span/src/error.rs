use thiserror::Error;

/// Errors that can occur when parsing or converting time spans.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The caller provided a supposed time span string but it did not match the expected format.
    #[error("invalid time span syntax: '{invalid_value}' is invalid: {problem}")]
    InvalidSyntax {
        /// The specific value that was invalid. This may either be the entire time span string
        /// or a specific part of it, depending on the problem.
        invalid_value: String,

        /// A human-readable description of the problem.
        problem: String,
    },

    /// A value does not fit into the range of the target type.
    #[error("time span out of range: {problem}")]
    OutOfRange {
        /// A human-readable description of the problem.
        problem: String,
    },
}

/// A specialized `Result` type for time span operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
