use serde::Deserialize;
use validator::Validate;

pub const PDF_FIELD_NAME: &str = "pdf_file";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Query string of `POST /generate-questions`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateQuestionsQuery {
    #[serde(default = "default_questions")]
    #[validate(range(min = 1, max = 50, message = "Number of questions must be between 1 and 50"))]
    pub questions: i64,
    #[serde(default = "default_sets")]
    #[validate(range(min = 1, max = 10, message = "Number of sets must be between 1 and 10"))]
    pub sets: i64,
}

fn default_questions() -> i64 {
    15
}

fn default_sets() -> i64 {
    1
}

impl Default for GenerateQuestionsQuery {
    fn default() -> Self {
        Self {
            questions: default_questions(),
            sets: default_sets(),
        }
    }
}
