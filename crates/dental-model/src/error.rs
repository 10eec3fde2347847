use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid classification item: {0}")]
    InvalidClassificationItem(String),
    #[error("unknown addition rule {kind}/{subtype}")]
    UnknownAdditionRule { kind: String, subtype: String },
}
