/*!
Error types for runtime operations

The C entry points collapse these into a null return or a fatal exit;
Rust callers see the distinct kind.
*/
use thiserror::Error;

/// Errors that can occur inside a runtime operation
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The C allocator refused the request, or the size overflowed
    #[error("allocation of {size} bytes failed")]
    AllocationFailed { size: usize },

    /// Standard input was exhausted before anything could be read
    #[error("end of input")]
    EndOfInput,

    /// The next token on the input is not a decimal integer
    #[error("invalid integer {token:?}")]
    InvalidInteger { token: String },

    /// The token is a decimal integer but does not fit in an `int`
    #[error("integer {token} is out of range")]
    IntegerOutOfRange { token: String },

    /// The underlying stream reported an error
    #[error("stream error: {0}")]
    Io(#[from] std::io::Error),
}

impl RuntimeError {
    /// True for the kinds the C boundary reports as a null buffer
    pub fn is_absent_result(&self) -> bool {
        matches!(
            self,
            RuntimeError::AllocationFailed { .. } | RuntimeError::EndOfInput
        )
    }
}

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;
