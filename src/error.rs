// src/error.rs
//
// Error taxonomy for the decision core.
//
// - InvalidInput: malformed/empty state from a caller; rejected locally.
// - UninitializedState: step() before reset(); a programming fault that
//   must surface loudly rather than be silently recovered.
// - Io: observation store failures; propagated to the caller unretried
//   (retry policy belongs to the caller, not this core).

use std::fmt;
use std::io;

#[derive(Debug)]
pub enum PricingError {
    InvalidInput(String),
    UninitializedState,
    Io(io::Error),
}

impl fmt::Display for PricingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            PricingError::UninitializedState => {
                write!(f, "step called before reset (environment has no state)")
            }
            PricingError::Io(err) => write!(f, "observation store i/o error: {err}"),
        }
    }
}

impl std::error::Error for PricingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PricingError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for PricingError {
    fn from(err: io::Error) -> Self {
        PricingError::Io(err)
    }
}
