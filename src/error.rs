use reqwest::StatusCode;

/// Failures talking to the Ollama HTTP API.
#[derive(Debug, thiserror::Error)]
pub enum OllamaError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned status {status}. Make sure Ollama is running with: ollama serve")]
    Status { url: String, status: StatusCode },
    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The two ways a chat session can fail. Both are recovered inside the
/// session; these only exist so the failure can be logged with its cause.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("model discovery failed: {0}")]
    Discovery(#[source] OllamaError),
    #[error("model discovery returned no models")]
    NoModels,
    #[error("generation failed: {0}")]
    Generation(#[source] OllamaError),
}
