use crate::field::FieldType;

/// Error types for filter parsing, catalog loading and editing
#[derive(Debug)]
pub enum FilterError {
    UnknownOperator(String),
    OperatorNotAllowed(String, FieldType),
    UnknownField(String),
    InvalidBase64(base64::DecodeError),
    InvalidJson(serde_json::Error),
    InvalidYaml(serde_yaml_ng::Error),
    Io(std::io::Error),
    InvalidShape(String),
    InputTooLarge(usize),
    GroupNotFound(String),
    ConditionNotFound(String),
}

impl From<base64::DecodeError> for FilterError {
    fn from(err: base64::DecodeError) -> Self {
        FilterError::InvalidBase64(err)
    }
}

impl From<serde_json::Error> for FilterError {
    fn from(err: serde_json::Error) -> Self {
        FilterError::InvalidJson(err)
    }
}

impl From<serde_yaml_ng::Error> for FilterError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        FilterError::InvalidYaml(err)
    }
}

impl From<std::io::Error> for FilterError {
    fn from(err: std::io::Error) -> Self {
        FilterError::Io(err)
    }
}

impl std::fmt::Display for FilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterError::UnknownOperator(key) => write!(f, "Unknown operator: {}", key),
            FilterError::OperatorNotAllowed(key, field_type) => {
                write!(f, "Operator {} is not valid for {} fields", key, field_type)
            }
            FilterError::UnknownField(key) => write!(f, "Unknown field: {}", key),
            FilterError::InvalidBase64(err) => write!(f, "Invalid base64: {}", err),
            FilterError::InvalidJson(err) => write!(f, "Invalid JSON: {}", err),
            FilterError::InvalidYaml(err) => write!(f, "Invalid YAML: {}", err),
            FilterError::Io(err) => write!(f, "IO error: {}", err),
            FilterError::InvalidShape(msg) => write!(f, "Invalid filter shape: {}", msg),
            FilterError::InputTooLarge(len) => write!(
                f,
                "Encoded filter too large: {} bytes (max {})",
                len,
                crate::MAX_ENCODED_FILTER_BYTES
            ),
            FilterError::GroupNotFound(id) => write!(f, "Group not found: {}", id),
            FilterError::ConditionNotFound(id) => write!(f, "Condition not found: {}", id),
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FilterError::InvalidBase64(err) => Some(err),
            FilterError::InvalidJson(err) => Some(err),
            FilterError::InvalidYaml(err) => Some(err),
            FilterError::Io(err) => Some(err),
            _ => None,
        }
    }
}
