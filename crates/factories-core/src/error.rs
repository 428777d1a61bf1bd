use thiserror::Error;

#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("invalid name: {0}")]
    InvalidName(String),

    #[error("invalid bounds: {0}")]
    InvalidBounds(String),

    #[error("invalid children_count: {0}")]
    InvalidChildrenCount(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: factory {0}")]
    NotFound(i64),

    #[error("internal: {0}")]
    Internal(#[from] anyhow::Error),
}

impl FactoryError {
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidName(_)
            | Self::InvalidBounds(_)
            | Self::InvalidChildrenCount(_)
            | Self::InvalidInput(_) => 400,
            Self::NotFound(_) => 404,
            Self::Internal(_) => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, FactoryError>;
