//! services/api/src/adapters/gateway.rs
//!
//! This module contains the adapter for the tutoring LLM. It implements the
//! `LanguageModelGateway` port from the `core` crate over the OpenAI chat
//! completions API, replaying each session's history on every turn since the
//! wire API itself is stateless.

use std::collections::HashMap;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use skoolme_core::ports::{
    GatewayError, GatewayResult, LanguageModelGateway, SeedExchange, SessionHandle,
};
use tokio::sync::Mutex;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `LanguageModelGateway` using an OpenAI-compatible LLM.
pub struct OpenAiTutorGateway {
    client: Client<OpenAIConfig>,
    model: String,
    sessions: Mutex<HashMap<SessionHandle, Vec<ChatCompletionRequestMessage>>>,
}

impl OpenAiTutorGateway {
    /// Creates a new `OpenAiTutorGateway`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self {
            client,
            model,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    async fn complete(
        &self,
        messages: Vec<ChatCompletionRequestMessage>,
    ) -> GatewayResult<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(classify_openai_error)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(classify_openai_error)?;

        if let Some(choice) = response.choices.into_iter().next() {
            if let Some(content) = choice.message.content {
                Ok(content)
            } else {
                Err(GatewayError::Other(
                    "Tutor LLM response contained no text content.".to_string(),
                ))
            }
        } else {
            Err(GatewayError::Other(
                "Tutor LLM returned no choices in its response.".to_string(),
            ))
        }
    }
}

/// Maps the client library's error onto the core gateway taxonomy. The
/// classification mirrors how the UI differentiates its fallback messages:
/// auth, quota, network and timeout problems get their own buckets.
fn classify_openai_error(error: OpenAIError) -> GatewayError {
    let text = error.to_string();
    let lowered = text.to_lowercase();
    if lowered.contains("api key") || lowered.contains("auth") || lowered.contains("401") {
        GatewayError::Auth(text)
    } else if lowered.contains("quota") || lowered.contains("rate limit") || lowered.contains("429")
    {
        GatewayError::Quota(text)
    } else if lowered.contains("timeout") || lowered.contains("timed out") {
        GatewayError::Timeout(text)
    } else if lowered.contains("connect") || lowered.contains("network") || lowered.contains("dns")
    {
        GatewayError::Network(text)
    } else {
        GatewayError::Other(text)
    }
}

//=========================================================================================
// `LanguageModelGateway` Trait Implementation
//=========================================================================================

#[async_trait]
impl LanguageModelGateway for OpenAiTutorGateway {
    /// Verifies credentials with a minimal round-trip request.
    async fn initialize(&self) -> GatewayResult<()> {
        let probe = vec![ChatCompletionRequestUserMessageArgs::default()
            .content("Test")
            .build()
            .map_err(classify_openai_error)?
            .into()];
        self.complete(probe).await.map(|_| ())
    }

    async fn start_session(
        &self,
        system_prompt: &str,
        seed: &SeedExchange,
    ) -> GatewayResult<SessionHandle> {
        let history: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt)
                .build()
                .map_err(classify_openai_error)?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(seed.user.as_str())
                .build()
                .map_err(classify_openai_error)?
                .into(),
            ChatCompletionRequestAssistantMessageArgs::default()
                .content(seed.model.as_str())
                .build()
                .map_err(classify_openai_error)?
                .into(),
        ];

        let handle = SessionHandle::new();
        self.sessions.lock().await.insert(handle, history);
        Ok(handle)
    }

    async fn send_turn(&self, handle: SessionHandle, text: &str) -> GatewayResult<String> {
        // Snapshot the history under the lock, then release it for the
        // duration of the network call.
        let history = {
            let mut sessions = self.sessions.lock().await;
            let history = sessions.get_mut(&handle).ok_or_else(|| {
                GatewayError::Other(format!("Unknown gateway session: {:?}", handle))
            })?;
            history.push(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(text)
                    .build()
                    .map_err(classify_openai_error)?
                    .into(),
            );
            history.clone()
        };

        let content = self.complete(history).await?;

        let mut sessions = self.sessions.lock().await;
        if let Some(history) = sessions.get_mut(&handle) {
            history.push(
                ChatCompletionRequestAssistantMessageArgs::default()
                    .content(content.as_str())
                    .build()
                    .map_err(classify_openai_error)?
                    .into(),
            );
        }
        Ok(content)
    }
}
