use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unknown operation: {0}")]
    UnknownOperation(String),
}
