use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Characters of source text embedded in a prompt; the rest is dropped.
pub const PROMPT_TEXT_LIMIT: usize = 15_000;

/// Sends a prompt to a text-generation model and returns the raw completion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

pub fn build_prompt(pdf_text: &str, num_questions: u32, num_sets: u32) -> String {
    let content: String = pdf_text.chars().take(PROMPT_TEXT_LIMIT).collect();
    let set_word = if num_sets == 1 { "set" } else { "sets" };

    format!(
        r#"Based on the following educational content, generate {num_sets} {set_word} of assessment questions, with {num_questions} questions per set.

Content:
{content}

Generate a JSON object with the following structure:
{{
  "subject": "Determine the subject based on the content",
  "chapter": "Determine the chapter based on the content",
  "sets": [
    {{
      "set_id": 1,
      "questions": [
        {{
          "question": "Question text",
          "option1": "First option",
          "option2": "Second option",
          "option3": "Third option",
          "option4": "Fourth option",
          "correctOption": 1, // Number between 1-4 indicating the correct answer
          "tags": ["tag1", "tag2"], // Relevant topic tags
          "difficulty": "easy" // One of: "easy", "medium", or "hard"
        }},
        // Each set should have exactly {num_questions} questions
      ]
    }},
    // Generate {num_sets} separate sets
  ]
}}

Make sure to:
1. Create a mix of easy, medium, and hard questions in each set
2. Ensure the correctOption is an integer between 1-4
3. Generate relevant tags for each question
4. Make all options plausible but only one correct
5. Questions in different sets should be unique (don't repeat questions across sets)
6. Each set should have exactly {num_questions} questions
"#
    )
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct AIService {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl AIService {
    pub fn new(api_key: Option<String>, model: String, base_url: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            model,
            base_url,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl GenerationClient for AIService {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            Error::Upstream("Gemini API Key is not set in environment variables.".to_string())
        })?;

        let payload = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        };

        tracing::info!(model = %self.model, prompt_bytes = prompt.len(), "Sending request to Gemini");
        let res = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::Upstream(e.to_string()))?;

        let status = res.status();
        let text = res.text().await.map_err(|e| Error::Upstream(e.to_string()))?;
        if !status.is_success() {
            return Err(Error::Upstream(format!("Gemini API Error {}: {}", status, text)));
        }

        completion_text(&text)
    }
}

/// Concatenated text parts of the first candidate.
fn completion_text(body: &str) -> Result<String> {
    let parsed: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| Error::Upstream(format!("Invalid Gemini response format: {}", e)))?;

    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(Error::Upstream("Gemini returned no completion text".to_string()));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_truncates_long_text() {
        let text = "a".repeat(PROMPT_TEXT_LIMIT) + "TAIL_MARKER";
        let prompt = build_prompt(&text, 10, 2);
        assert!(prompt.contains(&"a".repeat(PROMPT_TEXT_LIMIT)));
        assert!(!prompt.contains("TAIL_MARKER"));
    }

    #[test]
    fn prompt_truncates_by_characters_not_bytes() {
        let text = "é".repeat(PROMPT_TEXT_LIMIT + 5);
        let prompt = build_prompt(&text, 1, 1);
        assert_eq!(prompt.matches('é').count(), PROMPT_TEXT_LIMIT);
    }

    #[test]
    fn prompt_embeds_counts_and_directives() {
        let prompt = build_prompt("Photosynthesis converts light into energy.", 12, 3);
        assert!(prompt.contains("generate 3 sets of assessment questions, with 12 questions per set"));
        assert!(prompt.contains("Photosynthesis converts light into energy."));
        assert!(prompt.contains("\"correctOption\": 1"));
        assert!(prompt.contains("Each set should have exactly 12 questions"));
        assert!(prompt.contains("Questions in different sets should be unique"));
    }

    #[test]
    fn prompt_uses_singular_for_one_set() {
        let prompt = build_prompt("text", 5, 1);
        assert!(prompt.contains("generate 1 set of assessment questions"));
    }

    #[test]
    fn completion_text_joins_parts_of_first_candidate() {
        let body = r#"{"candidates":[
            {"content":{"parts":[{"text":"```json\n{"},{"text":"\"subject\":\"Math\"}\n```"}]}},
            {"content":{"parts":[{"text":"ignored"}]}}
        ]}"#;
        assert_eq!(
            completion_text(body).unwrap(),
            "```json\n{\"subject\":\"Math\"}\n```"
        );
    }

    #[test]
    fn completion_text_without_candidates_is_upstream_error() {
        let err = completion_text(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
    }

    #[tokio::test]
    async fn missing_api_key_fails_without_network() {
        let svc = AIService::new(
            None,
            "gemini-2.0-flash".into(),
            "http://127.0.0.1:9".into(),
            Client::new(),
        );
        let err = svc.generate("prompt").await.unwrap_err();
        assert!(matches!(err, Error::Upstream(msg) if msg.contains("API Key is not set")));
    }

    #[test]
    fn endpoint_includes_model() {
        let svc = AIService::new(
            Some("k".into()),
            "gemini-2.0-flash".into(),
            "https://generativelanguage.googleapis.com".into(),
            Client::new(),
        );
        assert_eq!(
            svc.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }
}
