use thiserror::Error;

/// Errors raised while validating a [`FlockConfig`](crate::FlockConfig).
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f32 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("unknown variant {0:?}")]
    UnknownVariant(String),
    #[error("separation radius {separation} exceeds perception radius {perception}")]
    SeparationExceedsPerception { separation: f32, perception: f32 },
}

/// Errors raised while building a [`World`](crate::World).
#[derive(Debug, Error, PartialEq)]
pub enum WorldError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("world size {width}x{height} must be positive and finite")]
    InvalidSize { width: f32, height: f32 },
}
