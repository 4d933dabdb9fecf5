use super::{Completion, LlmClient, truncate};
use crate::error::GgptError;
use anyhow::{anyhow, Context, Result};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Minimal request/response structs for OpenAI Chat Completions API.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    frequency_penalty: f64,
    presence_penalty: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// Sampling and transport settings for [`OpenAiClient`].
#[derive(Debug, Clone)]
pub struct OpenAiOptions {
    pub model: String,
    pub api_base_url: String,
    pub temperature: f64,
    pub max_tokens: Option<u32>,
    pub timeout: Duration,
}

/// OpenAI-based implementation of LlmClient.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    options: OpenAiOptions,
}

impl OpenAiClient {
    pub fn new(api_key: String, mut options: OpenAiOptions) -> Result<Self> {
        let client = Client::builder()
            .timeout(options.timeout)
            .build()
            .context("failed to build HTTP client")?;

        options.api_base_url = options.api_base_url.trim_end_matches('/').to_string();

        Ok(OpenAiClient {
            client,
            api_key,
            options,
        })
    }

    fn chat_url(&self) -> String {
        if self.options.api_base_url.ends_with("/v1") {
            format!("{}/chat/completions", self.options.api_base_url)
        } else {
            format!("{}/v1/chat/completions", self.options.api_base_url)
        }
    }
}

impl LlmClient for OpenAiClient {
    fn request(&self, prompt: &str) -> Result<Completion> {
        let req = ChatRequest {
            model: &self.options.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.options.temperature,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            max_tokens: self.options.max_tokens,
        };

        let url = self.chat_url();
        log::info!("Calling OpenAI model {:?} at {}", req.model, url);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .context("failed to send request to OpenAI")?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            let text = resp.text().unwrap_or_default();
            log::debug!("OpenAI rejected the API key: {}", truncate(&text, 500));
            return Err(GgptError::InvalidCredential.into());
        }

        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            return Err(anyhow!(
                "OpenAI API error: HTTP {} - {}",
                status.as_u16(),
                text
            ));
        }

        let chat_resp: ChatResponse = resp.json().context("failed to parse OpenAI response")?;

        if let Some(usage) = &chat_resp.usage {
            log::debug!(
                "Token usage: prompt={}, completion={}, total={}",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        let Some(choice) = chat_resp.choices.into_iter().next() else {
            log::warn!("OpenAI returned no choices");
            return Err(GgptError::NoContent.into());
        };

        let text = choice.message.content.ok_or(GgptError::NoContent)?;

        Ok(Completion {
            text,
            finish_reason: choice.finish_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const API_KEY: &str = "openai_api_key";

    fn options(server: &MockServer) -> OpenAiOptions {
        OpenAiOptions {
            model: "gpt-4".into(),
            api_base_url: server.uri(),
            temperature: 0.3,
            max_tokens: None,
            timeout: Duration::from_secs(10),
        }
    }

    fn completion_body(content: Value) -> Value {
        json!({
            "id": "foo",
            "object": "chat.completion",
            "created": 1_700_000_000,
            "model": "gpt-4",
            "choices": [{
                "index": 0,
                "finish_reason": "stop",
                "message": { "role": "assistant", "content": content }
            }],
            "usage": { "prompt_tokens": 12, "completion_tokens": 2, "total_tokens": 14 }
        })
    }

    /// The blocking client owns its own runtime, so it must be built, used and
    /// dropped off the async test runtime.
    async fn run_blocking<T, F>(f: F) -> T
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        tokio::task::spawn_blocking(f).await.expect("blocking task panicked")
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn request_sends_single_user_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer openai_api_key"))
            .and(body_partial_json(json!({
                "model": "gpt-4",
                "temperature": 0.3,
                "frequency_penalty": 0.0,
                "presence_penalty": 0.0,
                "messages": [{ "role": "user", "content": "Test request" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(json!("Test response"))))
            .expect(1)
            .mount(&server)
            .await;

        let opts = options(&server);
        let completion = run_blocking(move || {
            OpenAiClient::new(API_KEY.into(), opts)?.request("Test request")
        })
        .await
        .unwrap();

        assert_eq!(completion.text, "Test response");
        assert_eq!(completion.finish_reason.as_deref(), Some("stop"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn derived_operations_return_mocked_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(json!("Test response"))))
            .expect(3)
            .mount(&server)
            .await;

        let opts = options(&server);
        let (review, docstring, naming) = run_blocking(move || {
            let client = OpenAiClient::new(API_KEY.into(), opts).unwrap();
            (
                client.request_review("Test request").unwrap(),
                client.request_docstring("Test request").unwrap(),
                client.request_naming("Test request").unwrap(),
            )
        })
        .await;

        assert_eq!(review, "Test response");
        assert_eq!(docstring, "Test response");
        assert_eq!(naming, "Test response");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unauthorized_maps_to_invalid_credential() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" }
            })))
            .mount(&server)
            .await;

        let opts = options(&server);
        let err = run_blocking(move || {
            OpenAiClient::new(format!("{API_KEY}-invalid"), opts)?.request("Test request")
        })
        .await
        .unwrap_err();

        assert_eq!(err.downcast_ref::<GgptError>(), Some(&GgptError::InvalidCredential));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn server_error_is_not_a_domain_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let opts = options(&server);
        let err = run_blocking(move || {
            OpenAiClient::new(API_KEY.into(), opts)?.request("Test request")
        })
        .await
        .unwrap_err();

        assert!(err.downcast_ref::<GgptError>().is_none());
        assert!(err.to_string().contains("HTTP 500 - boom"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn empty_choices_is_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "foo",
                "object": "chat.completion",
                "choices": []
            })))
            .mount(&server)
            .await;

        let opts = options(&server);
        let err = run_blocking(move || {
            OpenAiClient::new(API_KEY.into(), opts)?.request("Test request")
        })
        .await
        .unwrap_err();

        assert_eq!(err.downcast_ref::<GgptError>(), Some(&GgptError::NoContent));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn max_tokens_is_sent_when_configured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "max_tokens": 256 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(json!("ok"))))
            .expect(1)
            .mount(&server)
            .await;

        let mut opts = options(&server);
        opts.max_tokens = Some(256);
        opts.api_base_url = format!("{}/v1/", server.uri());
        let completion = run_blocking(move || {
            OpenAiClient::new(API_KEY.into(), opts)?.request("Test request")
        })
        .await
        .unwrap();

        assert_eq!(completion.text, "ok");
    }
}
