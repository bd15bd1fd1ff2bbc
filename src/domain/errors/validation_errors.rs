/// Field-level failures raised while checking a submitted listing payload.
///
/// Only the first failing field is reported; the display text names the
/// field and the constraint it broke.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("\"{field}\" is required")]
    MissingField { field: &'static str },

    #[error("\"{field}\" is not allowed to be empty")]
    EmptyField { field: &'static str },

    #[error("\"{field}\" must be a string")]
    NotAString { field: &'static str },

    #[error("\"{field}\" must be an integer")]
    NotAnInteger { field: &'static str },

    #[error("\"{field}\" must be greater than or equal to {min}")]
    BelowMinimum { field: &'static str, min: i64 },

    #[error("\"{field}\" must be less than or equal to {max}")]
    AboveMaximum { field: &'static str, max: i64 },

    #[error("\"{field}\" must be one of [{}]", .allowed.join(", "))]
    NotOneOf {
        field: &'static str,
        allowed: Vec<&'static str>,
    },

    #[error("\"{field}\" must be an array of strings or a comma-separated string")]
    InvalidFeatures { field: &'static str },

    #[error("\"{field}\" is not allowed")]
    UnknownField { field: String },

    #[error("request body must be a JSON object: {reason}")]
    MalformedBody { reason: String },
}

impl ValidationError {
    /// Name of the offending field, when the failure is tied to one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::MissingField { field }
            | ValidationError::EmptyField { field }
            | ValidationError::NotAString { field }
            | ValidationError::NotAnInteger { field }
            | ValidationError::BelowMinimum { field, .. }
            | ValidationError::AboveMaximum { field, .. }
            | ValidationError::NotOneOf { field, .. }
            | ValidationError::InvalidFeatures { field } => Some(*field),
            ValidationError::UnknownField { field } => Some(field.as_str()),
            ValidationError::MalformedBody { .. } => None,
        }
    }
}
