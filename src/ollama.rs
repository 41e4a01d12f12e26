use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::error::OllamaError;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}

#[derive(Deserialize)]
struct OllamaModelsResponse {
    #[serde(default)]
    models: Vec<OllamaModel>,
}

#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Ask the server for a full, non-streamed completion of `prompt`.
    pub async fn generate(&self, model: &str, prompt: &str) -> Result<String, OllamaError> {
        let url = format!("{}/api/generate", self.base_url);

        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
        };

        debug!(%url, model, prompt_len = prompt.len(), "sending generate request");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|source| OllamaError::Transport {
                url: url.clone(),
                source,
            })?;

        let body: GenerateResponse = read_json(&url, response).await?;
        Ok(body.response)
    }

    /// Installed model names, in the order the server lists them.
    pub async fn list_models(&self) -> Result<Vec<String>, OllamaError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| OllamaError::Transport {
                url: url.clone(),
                source,
            })?;

        let body: OllamaModelsResponse = read_json(&url, response).await?;
        let model_names: Vec<String> = body.models.into_iter().map(|model| model.name).collect();

        debug!(%url, count = model_names.len(), "listed models");
        Ok(model_names)
    }
}

async fn read_json<T: DeserializeOwned>(
    url: &str,
    response: reqwest::Response,
) -> Result<T, OllamaError> {
    let status = response.status();
    if !status.is_success() {
        return Err(OllamaError::Status {
            url: url.to_string(),
            status,
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|source| OllamaError::Transport {
            url: url.to_string(),
            source,
        })?;

    serde_json::from_slice(&bytes).map_err(|source| OllamaError::Decode {
        url: url.to_string(),
        source,
    })
}
