use thiserror::Error;

/// Errors raised by the cutting stock engine.
///
/// Insufficient stock is not an error: it shows up as remaining demand on the
/// [`Plan`](crate::entities::Plan).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CutError {
    /// Invalid unit name, precision or kerf. Raised before anything gets configured.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Stock or demand supplied in an unrecognized shape.
    #[error("unrecognized input shape: {0}")]
    InputShape(String),

    /// A cutting pattern whose pieces and kerf exceed its stock length.
    #[error("cutting pattern is not valid: {0}")]
    Validation(String),
}
