use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Unexpected status {status} from content store: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Failed to decode store response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
}
