use reqwest::StatusCode;

use crate::network::NetworkOperation;

/// Error returned by store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  /// The request never produced a response (connect, timeout, body read).
  #[error("HTTP transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("Invalid request URL {url}: {source}")]
  InvalidUrl {
    url: String,
    #[source]
    source: url::ParseError,
  },

  #[error("Server returned unexpected status {0}")]
  UnexpectedStatus(StatusCode),

  /// `None` when the response carried no content type at all.
  #[error("Server returned unexpected content type {0:?}")]
  UnexpectedContentType(Option<String>),

  #[error("Failed to decode payload: {0}")]
  Decode(#[from] serde_json::Error),

  #[error("{operation} expected {expected} but the response held {actual}")]
  ShapeMismatch {
    operation: NetworkOperation,
    expected: &'static str,
    actual: &'static str,
  },
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
