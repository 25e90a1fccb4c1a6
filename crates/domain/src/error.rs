//! Domain error types.

use thiserror::Error;

/// Errors raised while selecting or applying packaging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackagingError {
    /// The order is heavier than the packaging allows.
    #[error("the order weight {weight} exceeds {limit} kg, choose another packaging")]
    WeightLimitExceeded { limit: u32, weight: u32 },

    /// Film was requested without a primary packaging to wrap.
    #[error("a primary packaging is required to use additional packaging")]
    NoPrimaryPackaging,

    /// The chosen packaging cannot carry a wrap.
    #[error("additional packaging cannot be added to {0}")]
    WrapNotSupported(&'static str),

    /// The packaging already carries a wrap.
    #[error("{0} already carries additional packaging")]
    AlreadyWrapped(&'static str),

    /// Adding the packaging cost would overflow the order cost.
    #[error("order cost overflows when adding packaging")]
    CostOverflow,
}

/// Error returned when a name does not map to a known domain value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
