use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Question {
    pub question: String,
    pub option1: String,
    pub option2: String,
    pub option3: String,
    pub option4: String,
    /// 1-based index of the correct option.
    #[serde(rename = "correctOption")]
    #[validate(range(min = 1, max = 4, message = "correctOption must be between 1 and 4"))]
    pub correct_option: i64,
    pub tags: Vec<String>,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct QuestionSet {
    pub set_id: i64,
    #[validate(nested)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct QuestionsResponse {
    #[serde(default = "default_label")]
    pub subject: String,
    #[serde(default = "default_label")]
    pub chapter: String,
    #[serde(default)]
    #[validate(nested)]
    pub sets: Vec<QuestionSet>,
}

fn default_label() -> String {
    "General".to_string()
}

impl QuestionsResponse {
    pub fn question_count(&self) -> usize {
        self.sets.iter().map(|s| s.questions.len()).sum()
    }
}
