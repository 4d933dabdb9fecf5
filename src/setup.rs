use anyhow::Result;
use log::debug;
use crate::config::Config;
use crate::llm::LlmClient;
use crate::llm::openai::{OpenAiClient, OpenAiOptions};

/// Build the LLM client from the resolved config.
pub fn build_llm_client(cfg: &Config) -> Result<Box<dyn LlmClient>> {
    debug!(
        "Using OpenAiClient with model {} (timeout {:?})",
        cfg.model, cfg.timeout
    );

    let options = OpenAiOptions {
        model: cfg.model.clone(),
        api_base_url: cfg.api_base_url.clone(),
        temperature: cfg.temperature,
        max_tokens: cfg.max_tokens,
        timeout: cfg.timeout,
    };

    Ok(Box::new(OpenAiClient::new(cfg.openai_api_key.clone(), options)?))
}
