use crate::error::{Error, Result};
use crate::models::question::QuestionsResponse;
use crate::services::ai_service::{build_prompt, GenerationClient};
use crate::services::pdf_service::TextExtractor;
use bytes::Bytes;
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;
use validator::Validate;

/// Extracted text shorter than this is rejected as insufficient content.
pub const MIN_TEXT_CHARS: usize = 100;

#[derive(Clone)]
pub struct QuestionService {
    extractor: Arc<dyn TextExtractor>,
    generator: Arc<dyn GenerationClient>,
}

impl QuestionService {
    pub fn new(extractor: Arc<dyn TextExtractor>, generator: Arc<dyn GenerationClient>) -> Self {
        Self {
            extractor,
            generator,
        }
    }

    /// Runs extraction, generation and response validation for one upload.
    pub async fn generate_from_pdf(
        &self,
        pdf: Bytes,
        num_questions: u32,
        num_sets: u32,
    ) -> Result<QuestionsResponse> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("generate_questions", %request_id, num_questions, num_sets);

        async {
            tracing::info!(bytes = pdf.len(), "Extracting text from upload");
            let text = self.extract_text(pdf).await?;
            let text_chars = text.chars().count();
            if text_chars < MIN_TEXT_CHARS {
                return Err(Error::BadRequest(
                    "Could not extract sufficient text from PDF.".to_string(),
                ));
            }
            tracing::info!(text_chars, "Text extracted");

            self.generate_from_text(&text, num_questions, num_sets).await
        }
        .instrument(span)
        .await
    }

    pub async fn generate_from_text(
        &self,
        text: &str,
        num_questions: u32,
        num_sets: u32,
    ) -> Result<QuestionsResponse> {
        let prompt = build_prompt(text, num_questions, num_sets);
        let completion = self.generator.generate(&prompt).await?;
        tracing::info!(completion_chars = completion.len(), "Completion received");

        let parsed = parse_completion(&completion)?;
        tracing::debug!(payload = %parsed, "Parsed completion payload");

        let response = validate_payload(reconcile(parsed))?;
        if response.sets.len() != num_sets as usize
            || response
                .sets
                .iter()
                .any(|s| s.questions.len() != num_questions as usize)
        {
            tracing::warn!(
                requested_sets = num_sets,
                requested_per_set = num_questions,
                returned_sets = response.sets.len(),
                returned_questions = response.question_count(),
                "Model returned a different question count than requested"
            );
        }
        Ok(response)
    }

    async fn extract_text(&self, pdf: Bytes) -> Result<String> {
        let extractor = Arc::clone(&self.extractor);
        tokio::task::spawn_blocking(move || extractor.extract(&pdf))
            .await
            .map_err(|e| Error::Internal(format!("Extraction task failed: {}", e)))?
    }
}

/// Carves the span between the first `{` and the last `}` out of a completion
/// and parses it. Braces in surrounding prose break this.
pub fn parse_completion(completion: &str) -> Result<JsonValue> {
    let span = match (completion.find('{'), completion.rfind('}')) {
        (Some(start), Some(end)) if end > start => &completion[start..=end],
        _ => return Err(Error::Parse("no JSON payload found".to_string())),
    };

    serde_json::from_str(span).map_err(|e| Error::Parse(e.to_string()))
}

/// Wraps a legacy top-level `questions` list into a single set.
pub fn reconcile(mut payload: JsonValue) -> JsonValue {
    if let Some(obj) = payload.as_object_mut() {
        if !obj.contains_key("sets") {
            if let Some(questions) = obj.get("questions").cloned() {
                obj.insert(
                    "sets".to_string(),
                    json!([{ "set_id": 1, "questions": questions }]),
                );
            }
        }
    }
    payload
}

/// Strict conversion into the response schema. One bad question fails the whole payload.
pub fn validate_payload(payload: JsonValue) -> Result<QuestionsResponse> {
    let response: QuestionsResponse =
        serde_json::from_value(payload).map_err(|e| Error::Schema(e.to_string()))?;
    response
        .validate()
        .map_err(|e| Error::Schema(e.to_string()))?;
    Ok(response)
}
