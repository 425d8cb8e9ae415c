use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GadgetError {
    #[error("Value out of range: {context} - {details}")]
    OutOfRangeValue { context: String, details: String },
    #[error("Division by zero in {operation}")]
    DivisionByZero { operation: String },
    #[error("Constraint {index} not satisfied ({label})")]
    ConstraintViolation { index: usize, label: String },
    #[error("Unsupported parameter: {parameter} - {details}")]
    UnsupportedParameter { parameter: String, details: String },
    #[error("Parameter validation failed: {constraint}")]
    InvalidParameters { constraint: String },
    #[error("Serialization error: {details}")]
    SerializationError { details: String },
}

impl GadgetError {
    pub fn out_of_range(context: &str, details: &str) -> Self {
        GadgetError::OutOfRangeValue {
            context: context.to_string(),
            details: details.to_string(),
        }
    }

    pub fn division_by_zero(operation: &str) -> Self {
        GadgetError::DivisionByZero {
            operation: operation.to_string(),
        }
    }

    pub fn constraint_violation(index: usize, label: &str) -> Self {
        GadgetError::ConstraintViolation {
            index,
            label: label.to_string(),
        }
    }

    pub fn unsupported_parameter(parameter: &str, details: &str) -> Self {
        GadgetError::UnsupportedParameter {
            parameter: parameter.to_string(),
            details: details.to_string(),
        }
    }

    pub fn invalid_parameters(constraint: &str) -> Self {
        GadgetError::InvalidParameters {
            constraint: constraint.to_string(),
        }
    }

    pub fn serialization_error(details: &str) -> Self {
        GadgetError::SerializationError {
            details: details.to_string(),
        }
    }
}

/// Result type alias for convenience
pub type GadgetResult<T> = Result<T, GadgetError>;

impl From<bincode::Error> for GadgetError {
    fn from(err: bincode::Error) -> Self {
        GadgetError::serialization_error(&err.to_string())
    }
}

impl From<GadgetError> for String {
    fn from(err: GadgetError) -> Self {
        err.to_string()
    }
}
