use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GridConfigError {
    #[error("column count must be at least 1")]
    ZeroColumns,
    #[error("grid width must be positive, got {0}")]
    NonPositiveWidth(f32),
}
