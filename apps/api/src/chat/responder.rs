//! The text-in/text-out collaborator that answers support questions.

use async_trait::async_trait;

use crate::chat::prompts::{HR_ASSISTANT_SYSTEM, HR_QUERY_PROMPT_TEMPLATE};
use crate::llm_client::{LlmClient, LlmError};

/// Turns a question into an answer. Latency and failure modes are the
/// implementation's business; the relay bounds the call with a timeout.
///
/// Carried in `ChatRelay` as `Arc<dyn Responder>` so tests can swap in stubs.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn answer(&self, text: &str) -> Result<String, LlmError>;
}

/// LLM-backed HR assistant.
pub struct HrAssistant {
    llm: LlmClient,
}

impl HrAssistant {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Responder for HrAssistant {
    async fn answer(&self, text: &str) -> Result<String, LlmError> {
        self.llm
            .call_text(&build_query_prompt(text), HR_ASSISTANT_SYSTEM)
            .await
    }
}

fn build_query_prompt(query: &str) -> String {
    HR_QUERY_PROMPT_TEMPLATE.replace("{query}", query.trim())
}
