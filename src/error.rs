//! Error types for MS-Numpress encoding/decoding operations.

use thiserror::Error;

/// Errors that can occur during MS-Numpress operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NumpressError {
    /// The input data is empty, so no fixed point can be derived.
    #[error("input data is empty")]
    EmptyInput,

    /// A sample is NaN or infinite.
    #[error("non-finite value {value} at index {index}")]
    NonFinite {
        /// Position of the sample in the input.
        index: usize,
        /// The offending sample.
        value: f64,
    },

    /// A sample is negative where the scheme only accepts non-negative data.
    #[error("negative value {value} at index {index}")]
    Negative {
        /// Position of the sample in the input.
        index: usize,
        /// The offending sample.
        value: f64,
    },

    /// The fixed point is zero, negative or non-finite.
    #[error("invalid fixed point: {0} (must be positive and finite)")]
    InvalidFixedPoint(f64),

    /// The requested mass accuracy is zero, negative or non-finite.
    #[error("invalid mass accuracy: {0} (must be positive and finite)")]
    InvalidMassAccuracy(f64),

    /// A quantized sample does not fit the integer field it is stored in.
    #[error("value at index {index} quantizes to {quantized}, exceeding the limit of {limit}")]
    Overflow {
        /// Position of the sample in the input.
        index: usize,
        /// The sample after scaling and rounding.
        quantized: f64,
        /// The largest magnitude the field can hold.
        limit: f64,
    },

    /// A prediction residual does not fit in 32 bits.
    #[error("residual {residual} at index {index} does not fit in 32 bits")]
    ResidualOverflow {
        /// Position of the sample in the input.
        index: usize,
        /// The residual against the linear prediction.
        residual: i128,
    },

    /// A scheme name or accession matches no known scheme.
    #[error("unknown numpress scheme: {0}")]
    UnknownScheme(String),

    /// The stream is shorter than its header requires.
    #[error("truncated header: expected at least {expected} bytes, got {actual}")]
    TruncatedHeader {
        /// The number of bytes the header needs.
        expected: usize,
        /// The number of bytes available.
        actual: usize,
    },

    /// The encoded data is corrupted or invalid.
    #[error("invalid encoded data: {0}")]
    InvalidData(String),
}

/// Coarse classification of a [`NumpressError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A quantized value exceeds the width of its field.
    Overflow,
    /// The caller supplied samples or parameters the scheme cannot accept.
    InvalidInput,
    /// A byte stream could not be parsed.
    MalformedStream,
    /// A search routine was given nothing to search.
    EmptyInput,
}

impl NumpressError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            NumpressError::EmptyInput => ErrorKind::EmptyInput,
            NumpressError::NonFinite { .. }
            | NumpressError::Negative { .. }
            | NumpressError::InvalidFixedPoint(_)
            | NumpressError::InvalidMassAccuracy(_)
            | NumpressError::UnknownScheme(_) => ErrorKind::InvalidInput,
            NumpressError::Overflow { .. } | NumpressError::ResidualOverflow { .. } => {
                ErrorKind::Overflow
            }
            NumpressError::TruncatedHeader { .. } | NumpressError::InvalidData(_) => {
                ErrorKind::MalformedStream
            }
        }
    }
}
