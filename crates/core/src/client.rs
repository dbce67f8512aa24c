//! Thin adapter over the hosted OpenAI-compatible completion API.
//!
//! The client is an explicitly constructed value threaded through callers;
//! there is no process-wide singleton. Transport and authentication failures
//! propagate unwrapped so the CLI reports them as unexpected errors.

use anyhow::{Result, anyhow};
use async_openai::config::OpenAIConfig;
use async_openai::{
    Client as OpenAIClient,
    types::{ChatCompletionRequestMessage, CreateChatCompletionRequestArgs},
};
use futures::stream::{BoxStream, StreamExt};
use tracing::debug;

use crate::completion::{ChatMessage, Role};

pub struct CompletionClient {
    client: OpenAIClient<OpenAIConfig>,
}

impl CompletionClient {
    /// Builds a client for the given credential and API endpoint.
    /// Construction is cheap and repeatable; the last built client wins.
    pub fn new(api_key: &str, api_endpoint: &str) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_endpoint);
        Self {
            client: OpenAIClient::with_config(config),
        }
    }

    fn to_openai_message(msg: &ChatMessage) -> ChatCompletionRequestMessage {
        match msg.role {
            Role::User => ChatCompletionRequestMessage::User(
                async_openai::types::ChatCompletionRequestUserMessageArgs::default()
                    .content(msg.text.as_str())
                    .build()
                    .unwrap(),
            ),
            Role::Assistant => ChatCompletionRequestMessage::Assistant(
                async_openai::types::ChatCompletionRequestAssistantMessageArgs::default()
                    .content(msg.text.as_str())
                    .build()
                    .unwrap(),
            ),
        }
    }

    fn build_request(
        model: &str,
        messages: &[ChatMessage],
        stream: bool,
    ) -> Result<async_openai::types::CreateChatCompletionRequest> {
        let openai_messages: Vec<ChatCompletionRequestMessage> = messages
            .iter()
            .map(CompletionClient::to_openai_message)
            .collect();

        CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(openai_messages)
            .stream(stream)
            .build()
            .map_err(|e| anyhow!("Invalid request: {e}"))
    }

    /// Lists the model identifiers available behind the endpoint.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let response = self.client.models().list().await?;
        Ok(response.data.into_iter().map(|m| m.id).collect())
    }

    /// Issues a single non-streaming completion and returns the first
    /// choice's text content.
    pub async fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<String> {
        let request = Self::build_request(model, messages, false)?;
        let response = self.client.chat().create(request).await?;
        debug!(choices = response.choices.len(), "completion received");
        Ok(response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default())
    }

    /// Issues a streaming completion. The stream yields incremental text
    /// fragments (possibly empty) in arrival order and ends when the service
    /// signals completion.
    pub fn complete_stream(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> BoxStream<'static, Result<String>> {
        let request = match Self::build_request(model, messages, true) {
            Ok(req) => req,
            Err(err) => {
                return Box::pin(futures::stream::once(async move { Err(err) }));
            }
        };

        let client = self.client.clone();
        let stream = async_stream::stream! {
            match client.chat().create_stream(request).await {
                Ok(mut response) => {
                    while let Some(next) = response.next().await {
                        match next {
                            Ok(chunk) => {
                                if let Some(choice) = chunk.choices.first() {
                                    let text = choice.delta.content.clone().unwrap_or_default();
                                    yield Ok(text);
                                }
                            }
                            Err(err) => {
                                yield Err(anyhow!("OpenAI stream error: {err}"));
                            }
                        }
                    }
                }
                Err(err) => {
                    yield Err(anyhow!("OpenAI request failed: {err}"));
                }
            }
        };

        Box::pin(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    fn mock_event_stream_body() -> String {
        let events = vec![
            json!({
                "id": "chatcmpl-1",
                "object": "chat.completion.chunk",
                "created": 1684,
                "model": "gpt-4o-mini",
                "choices": [{
                    "delta": {"content": "Hello"},
                    "index": 0,
                    "finish_reason": serde_json::Value::Null
                }]
            }),
            json!({
                "id": "chatcmpl-1",
                "object": "chat.completion.chunk",
                "created": 1684,
                "model": "gpt-4o-mini",
                "choices": [{
                    "delta": {"content": " world"},
                    "index": 0,
                    "finish_reason": serde_json::Value::Null
                }]
            }),
            json!({
                "id": "chatcmpl-1",
                "object": "chat.completion.chunk",
                "created": 1684,
                "model": "gpt-4o-mini",
                "choices": [{
                    "delta": {},
                    "index": 0,
                    "finish_reason": "stop"
                }]
            }),
        ];

        let mut mock_body = events
            .into_iter()
            .map(|event| format!("data: {}\n\n", serde_json::to_string(&event).unwrap()))
            .collect::<String>();
        mock_body.push_str("data: [DONE]\n\n");
        mock_body
    }

    #[tokio::test]
    async fn test_complete_stream_yields_fragments_in_order() {
        let server = MockServer::start().await;

        let mock_response = ResponseTemplate::new(200)
            .set_body_raw(mock_event_stream_body(), "text/event-stream")
            .insert_header("Connection", "close");

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(mock_response)
            .mount(&server)
            .await;

        let client = CompletionClient::new("sk-test", &server.uri());
        let messages = vec![ChatMessage::user("Hello")];
        let mut stream = client.complete_stream("gpt-4o-mini", &messages);

        let mut fragments = Vec::new();
        while let Some(fragment) = stream.next().await {
            fragments.push(fragment.unwrap());
        }

        assert_eq!(fragments, vec!["Hello", " world", ""]);
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice_content() {
        let server = MockServer::start().await;

        let body = json!({
            "id": "chatcmpl-2",
            "object": "chat.completion",
            "created": 1684,
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "feat: add config store"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 6, "total_tokens": 16}
        });

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = CompletionClient::new("sk-test", &server.uri());
        let messages = vec![ChatMessage::user("Write a commit message")];
        let content = client.complete("gpt-4o-mini", &messages).await.unwrap();

        assert_eq!(content, "feat: add config store");
    }

    #[tokio::test]
    async fn test_list_models() {
        let server = MockServer::start().await;

        let body = json!({
            "object": "list",
            "data": [
                {"id": "gpt-4o-mini", "object": "model", "created": 1684, "owned_by": "openai"},
                {"id": "gpt-4o", "object": "model", "created": 1684, "owned_by": "openai"}
            ]
        });

        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = CompletionClient::new("sk-test", &server.uri());
        let models = client.list_models().await.unwrap();
        assert_eq!(models, vec!["gpt-4o-mini", "gpt-4o"]);
    }

    #[tokio::test]
    async fn test_rejected_credential_propagates() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {
                    "message": "Incorrect API key provided",
                    "type": "invalid_request_error",
                    "param": serde_json::Value::Null,
                    "code": "invalid_api_key"
                }
            })))
            .mount(&server)
            .await;

        let client = CompletionClient::new("sk-bad", &server.uri());
        assert!(client.list_models().await.is_err());
    }
}
