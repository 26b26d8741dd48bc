use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SYSTEM_PROMPT: &str = "You are a helpful educational assistant for EduBridge Manager. \
You help students with their academic queries, explain concepts, and provide guidance on assignments. \
Keep your responses focused on educational content and be supportive and encouraging.";

pub const NOT_CONFIGURED_REPLY: &str =
    "I'm sorry, but the AI service is not configured properly. Please contact the administrator.";
pub const FAILURE_REPLY: &str =
    "I'm sorry, but I encountered an error while processing your request. Please try again later.";

const MAX_TOKENS: u32 = 1000;

#[derive(Debug, Error)]
enum AssistantError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream returned {0}")]
    Status(StatusCode),
    #[error("response had no choices")]
    Empty,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [ChatTurn<'a>; 2],
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatTurn<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Client for an OpenAI-compatible chat-completions endpoint.
///
/// `reply` never fails: every problem is logged and turned into an apology
/// the user can read.
#[derive(Clone)]
pub struct AssistantClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl AssistantClient {
    pub fn new(api_key: Option<String>, base_url: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    pub async fn reply(&self, prompt: &str) -> String {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::warn!("OPENROUTER_API_KEY is not set; assistant disabled");
            return NOT_CONFIGURED_REPLY.to_string();
        };

        match self.complete(api_key, prompt).await {
            Ok(content) => content,
            Err(AssistantError::Status(status)) => {
                tracing::error!("Assistant API error: {}", status);
                format!("{} (Error: {})", FAILURE_REPLY, status.as_u16())
            }
            Err(e) => {
                tracing::error!("Assistant response error: {}", e);
                FAILURE_REPLY.to_string()
            }
        }
    }

    async fn complete(&self, api_key: &str, prompt: &str) -> Result<String, AssistantError> {
        let body = CompletionRequest {
            model: &self.model,
            messages: [
                ChatTurn {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatTurn {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .header("X-Title", "EduBridge Manager")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::debug!("Assistant error body: {}", detail);
            return Err(AssistantError::Status(status));
        }

        let completion: CompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(AssistantError::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode as AxumStatus, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_missing_key_degrades() {
        let client = AssistantClient::new(None, "http://127.0.0.1:9".into(), "test-model".into());
        assert_eq!(client.reply("What is photosynthesis?").await, NOT_CONFIGURED_REPLY);
    }

    #[tokio::test]
    async fn test_first_choice_is_the_reply() {
        let app = Router::new().route(
            "/chat/completions",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["max_tokens"], 1000);
                assert_eq!(body["messages"][0]["role"], "system");
                assert_eq!(body["messages"][1]["content"], "Explain gravity");
                Json(json!({
                    "choices": [
                        { "message": { "role": "assistant", "content": "Gravity pulls masses together." } },
                        { "message": { "role": "assistant", "content": "ignored" } }
                    ]
                }))
            }),
        );
        let base = serve(app).await;

        let client = AssistantClient::new(Some("key".into()), base, "test-model".into());
        assert_eq!(client.reply("Explain gravity").await, "Gravity pulls masses together.");
    }

    #[tokio::test]
    async fn test_error_status_is_appended() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async { (AxumStatus::TOO_MANY_REQUESTS, "rate limited") }),
        );
        let base = serve(app).await;

        let client = AssistantClient::new(Some("key".into()), format!("{}/", base), "m".into());
        assert_eq!(
            client.reply("hi").await,
            format!("{} (Error: 429)", FAILURE_REPLY)
        );
    }

    #[tokio::test]
    async fn test_malformed_body_degrades() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async { Json(json!({ "choices": [] })) }),
        );
        let base = serve(app).await;

        let client = AssistantClient::new(Some("key".into()), base, "m".into());
        assert_eq!(client.reply("hi").await, FAILURE_REPLY);
    }
}
