use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid batch configuration: per_chunk={per_chunk}, max_concurrent_chunks={max_concurrent_chunks}")]
    InvalidBatchConfig {
        per_chunk: usize,
        max_concurrent_chunks: usize,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Upstream returned an error: {0}")]
    Rpc(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Chunk returned {returned} snapshots for {requested} ids")]
    ChunkLength { requested: usize, returned: usize },

    #[error("Invalid account address: {0}")]
    InvalidAccount(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            FetchError::Decode(error.to_string())
        } else {
            FetchError::Transport(error.to_string())
        }
    }
}
