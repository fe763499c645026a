//! Domain errors. Only appliance form input can be rejected; chat and billing
//! never fail.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields (missing {0})")]
    MissingField(&'static str),

    #[error("{field} must be a positive number of watts")]
    InvalidWatts { field: &'static str },

    #[error("Unknown location: {0}")]
    UnknownLocation(String),
}
