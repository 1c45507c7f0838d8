use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] cepfinder_core::ValidationError),

    #[error("{count} of {total} zip code(s) could not be found")]
    NotFound { count: usize, total: usize },

    #[error("{count} of {total} lookup(s) failed on every provider")]
    ProviderOutage { count: usize, total: usize },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("lookup task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::NotFound { .. } => 3,
            Self::Serialization(_) => 4,
            Self::ProviderOutage { .. } => 5,
            Self::Io(_) | Self::Task(_) => 10,
        }
    }
}
