use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::response::{RawModelResponse, Usage};
use super::{AgentError, AssessmentRequest, Assessor, INSTRUCTIONS};
use crate::config::ModelConfig;

const MARKDOWN_INSTRUCTION: &str = "Use markdown to format your answers.";

/// Skill-assessment agent backed by an OpenAI-compatible chat-completions
/// endpoint (Groq by default).
pub struct AssessmentAgent {
    name: String,
    model: String,
    base_url: String,
    api_key: String,
    instructions: Vec<String>,
    show_tool_calls: bool,
    markdown: bool,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: ToolFunction,
}

#[derive(Debug, Deserialize)]
struct ToolFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

impl AssessmentAgent {
    /// The GitHub assessment agent: fixed instructions, markdown output and
    /// tool-call visibility enabled.
    pub fn new(client: Client, config: &ModelConfig) -> Self {
        Self {
            name: "GitHub Assessment Agent".to_string(),
            model: config.id.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().unwrap_or_default(),
            instructions: vec![INSTRUCTIONS.to_string()],
            show_tool_calls: true,
            markdown: true,
            client,
        }
    }

    fn system_message(&self) -> String {
        let mut lines = self.instructions.clone();
        if self.markdown {
            lines.push(MARKDOWN_INSTRUCTION.to_string());
        }
        lines.join("\n")
    }

    fn to_raw_response(&self, response: ChatResponse) -> Result<RawModelResponse, AgentError> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(AgentError::EmptyResponse)?;
        let message = choice.message;
        let tool_calls = message.tool_calls.unwrap_or_default();

        let mut content = String::new();
        if self.show_tool_calls && !tool_calls.is_empty() {
            for call in &tool_calls {
                content.push_str(&format!(
                    " - Running: {}({})\n",
                    call.function.name, call.function.arguments
                ));
            }
            content.push('\n');
        }
        content.push_str(message.content.as_deref().unwrap_or_default());

        Ok(RawModelResponse {
            content,
            name: message.name,
            model: response.model.unwrap_or_else(|| self.model.clone()),
            usage: response.usage.map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
            }),
        })
    }
}

#[async_trait]
impl Assessor for AssessmentAgent {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, request), fields(model = %self.model, prompt_bytes = request.as_str().len()))]
    async fn generate_assessment(
        &self,
        request: AssessmentRequest,
    ) -> Result<RawModelResponse, AgentError> {
        let system = self.system_message();
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &system,
                },
                ChatMessage {
                    role: "user",
                    content: request.as_str(),
                },
            ],
        };

        debug!("calling chat completions API");
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(AgentError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&text)?;
        let raw = self.to_raw_response(parsed)?;
        debug!(content_bytes = raw.content.len(), "received model response");
        Ok(raw)
    }
}
