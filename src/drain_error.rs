use crate::collection::Collection;

#[derive(Debug, thiserror::Error)]
pub enum DrainError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
    #[error("Identifier {id:?} in {collection} cannot be sent as a single path segment")]
    UnaddressableId { collection: Collection, id: String },
    #[error("Failed to decode {collection} listing: {source}")]
    Decode {
        collection: Collection,
        #[source]
        source: serde_json::Error,
    },
    #[error("{collection} still not empty after {passes} passes")]
    PassLimitExceeded { collection: Collection, passes: u64 },
}
