use super::{build_prompt, Narrator};
use crate::config::NarrativeConfig;
use crate::engine::types::PropAnalysis;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Local Ollama server, `/api/generate` in non-streaming mode.
pub struct OllamaNarrator {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

impl OllamaNarrator {
    pub fn new(cfg: &NarrativeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .context("failed to build ollama http client")?;
        Ok(Self {
            client,
            base_url: cfg.ollama_url.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
        })
    }

    /// True if the server answers its model listing. Checked once per run
    /// so an offline server doesn't cost a timeout per pick.
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self.client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "ollama not reachable");
                false
            }
        }
    }
}

#[async_trait]
impl Narrator for OllamaNarrator {
    async fn narrate(&self, analysis: &PropAnalysis) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let prompt = build_prompt(analysis);
        let body = GenerateRequest {
            model: &self.model,
            prompt: &prompt,
            stream: false,
        };

        let resp = self.client.post(&url).json(&body).send().await
            .context("ollama generate request failed")?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("ollama generate ({}): {}", status, body);
        }

        let parsed: GenerateResponse = resp.json().await
            .context("failed to parse ollama response")?;
        let text = parsed.response.trim();
        anyhow::ensure!(!text.is_empty(), "ollama returned an empty response");

        tracing::info!(player = %analysis.player.name, model = %self.model, "generated narrative");
        Ok(text.to_string())
    }
}
