pub mod groq;
pub mod prompt;
pub mod response;

pub use groq::AssessmentAgent;
pub use prompt::{build_prompt, AssessmentRequest};
pub use response::RawModelResponse;

use async_trait::async_trait;
use thiserror::Error;

/// Instruction given to the model both as system message and at the end of the prompt.
pub const INSTRUCTIONS: &str = "Provide a detailed analysis of the user’s technical expertise, strengths, and areas for improvement.";

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Model request failed: {0}")]
    ApiRequest(#[from] reqwest::Error),

    #[error("Model provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse model response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Model response contained no choices")]
    EmptyResponse,
}

/// Turns an assessment prompt into a raw model response.
/// Implementations must be Send + Sync so one instance can serve every request.
#[async_trait]
pub trait Assessor: Send + Sync {
    /// Human-readable agent name (e.g., "GitHub Assessment Agent")
    fn name(&self) -> &str;

    /// Send the prompt to the model and wait for the full response.
    /// No retries; any failure is returned as-is.
    async fn generate_assessment(
        &self,
        request: AssessmentRequest,
    ) -> Result<RawModelResponse, AgentError>;
}
