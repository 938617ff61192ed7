use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid must be configured with at least one column")]
    NoColumns,
    #[error("display limit options must contain at least one entry")]
    EmptyDisplayLimitOptions,
    #[error("display limit option {text:?} has a non-positive value")]
    InvalidDisplayLimit { text: String },
}
