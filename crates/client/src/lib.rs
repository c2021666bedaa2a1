//! # Worklist Client
//!
//! Fetches the signed-in user's worklist from the laboratory backend.
//!
//! Handles:
//! - `GET /v1/me/worklist` with optional `kind`, `item_type`, `status`, `page`, `page_size`
//! - Bearer authentication from the injected [`worklist_core::SessionConfig`]
//! - Mapping transport failures and non-2xx responses to [`ClientError`]
//!
//! One call is one round trip: no retries and no caching. Data shaping (facets, filters,
//! rendering) lives in `worklist-core`.

#![warn(rust_2018_idioms)]

mod client;
mod query;

pub use client::{refresh, WorklistClient};
pub use query::WorklistQuery;

/// Errors returned by the worklist client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error(
        "no auth token configured; run `lab-console login --token <TOKEN>` or set LAB_API_TOKEN"
    )]
    MissingToken,

    #[error("failed to build HTTP client: {0}")]
    Build(reqwest::Error),

    #[error("worklist request failed: {0}")]
    Transport(reqwest::Error),

    #[error("worklist request failed with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("worklist response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Type alias for Results that can fail with a [`ClientError`].
pub type ClientResult<T> = Result<T, ClientError>;
