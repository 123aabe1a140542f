use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The configured API location is not a usable base URL.
    #[error("Invalid API base URL '{url}': {reason}")]
    BaseUrl { url: String, reason: String },

    /// No response was received from the API.
    #[error("Request to the API failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("The API returned {status} for {url}")]
    Status { status: StatusCode, url: String },

    /// The API answered but the body was not the expected JSON.
    #[error("Could not decode the API response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("Failed to build the HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),

    #[error("Failed to read RUST_LOG: {0}")]
    Filter(#[from] tracing_subscriber::filter::FromEnvError),

    #[error("Failed to install the tracing subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}
