//! services/api/src/adapters/analysis.rs
//!
//! This module contains the adapter for the course-structure LLM. It
//! implements the `ContentAnalysisService` port from the `core` crate: one
//! prompt in, structured course text out. Parsing of that text (and every
//! fallback) lives in the core's assembly module.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use skoolme_core::{
    domain::CourseDraft,
    ports::{ContentAnalysisService, GatewayError, GatewayResult},
};

const SYSTEM_INSTRUCTIONS: &str = "You are a curriculum designer. You produce course structures \
as JSON and nothing else. Do not include the mid-course test or final exam; those are added \
separately.";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ContentAnalysisService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiAnalysisAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiAnalysisAdapter {
    /// Creates a new `OpenAiAnalysisAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    fn build_course_prompt(draft: &CourseDraft) -> String {
        let mut prompt = format!("Create a comprehensive course structure for \"{}\"", draft.title);

        if let Some(school) = &draft.school {
            prompt.push_str(&format!(" at {school}"));
        }
        if let Some(notes) = &draft.notes {
            prompt.push_str(&format!("\n\nAdditional context: {notes}"));
        }
        if !draft.files.is_empty() {
            prompt.push_str(&format!("\n\nFiles provided: {}", draft.files.join(", ")));
        }

        prompt.push_str(
            r#"

Please create a detailed course structure with:
1. Course outline with 6-8 main topics/lessons
2. Learning objectives for each lesson
3. A brief description of what will be covered
4. Estimated duration for each lesson
5. Key concepts and terminology

Format the response as JSON with this structure:
{
  "outline": {
    "title": "Course Title",
    "description": "Course description",
    "duration": "Total estimated hours",
    "difficulty": "Beginner/Intermediate/Advanced"
  },
  "lessons": [
    {
      "title": "Lesson Title",
      "description": "What this lesson covers",
      "duration": 45,
      "objectives": ["Learning objective 1", "Learning objective 2"],
      "keyTerms": ["term1", "term2"]
    }
  ]
}"#,
        );
        prompt
    }
}

//=========================================================================================
// `ContentAnalysisService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ContentAnalysisService for OpenAiAnalysisAdapter {
    async fn generate_structured_course(&self, draft: &CourseDraft) -> GatewayResult<String> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e: OpenAIError| GatewayError::Other(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(Self::build_course_prompt(draft))
                .build()
                .map_err(|e: OpenAIError| GatewayError::Other(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| GatewayError::Other(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| GatewayError::Network(e.to_string()))?;

        if let Some(choice) = response.choices.into_iter().next() {
            if let Some(content) = choice.message.content {
                return Ok(content);
            }
        }
        Err(GatewayError::Other(
            "Course analysis LLM returned no text content.".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_includes_every_supplied_field() {
        let draft = CourseDraft {
            title: "Organic Chemistry".to_string(),
            school: Some("State University".to_string()),
            notes: Some("Focus on reaction mechanisms".to_string()),
            files: vec!["notes.pdf".to_string(), "lecture.mp3".to_string()],
        };

        let prompt = OpenAiAnalysisAdapter::build_course_prompt(&draft);
        assert!(prompt.contains("\"Organic Chemistry\""));
        assert!(prompt.contains("at State University"));
        assert!(prompt.contains("Focus on reaction mechanisms"));
        assert!(prompt.contains("notes.pdf, lecture.mp3"));
        assert!(prompt.contains("Format the response as JSON"));
    }

    #[test]
    fn prompt_omits_absent_fields() {
        let draft = CourseDraft {
            title: "Algebra".to_string(),
            school: None,
            notes: None,
            files: vec![],
        };

        let prompt = OpenAiAnalysisAdapter::build_course_prompt(&draft);
        assert!(!prompt.contains(" at "));
        assert!(!prompt.contains("Additional context"));
        assert!(!prompt.contains("Files provided"));
    }
}
