use thiserror::Error;

#[derive(Debug, Error)]
pub enum RingError {
    #[error("Invalid capacity {capacity}: {reason}")]
    InvalidCapacity {
        capacity: usize,
        reason: &'static str,
    },
    #[error("Invalid config value {value} for {field}: {reason}")]
    InvalidConfig {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
    #[error("Failed to allocate ring storage of {requested} bytes")]
    AllocationFailed { requested: usize },
}

impl From<RingError> for std::io::Error {
    fn from(err: RingError) -> Self {
        let kind = match err {
            RingError::AllocationFailed { .. } => std::io::ErrorKind::OutOfMemory,
            _ => std::io::ErrorKind::InvalidInput,
        };
        std::io::Error::new(kind, err)
    }
}
