use crate::{
    dto::question_dto::{GenerateQuestionsQuery, PDF_CONTENT_TYPE, PDF_FIELD_NAME},
    error::{Error, Result},
    models::question::QuestionsResponse,
    AppState,
};
use axum::{
    extract::{multipart::MultipartRejection, rejection::QueryRejection, Multipart, Query, State},
    Json,
};
use bytes::Bytes;
use validator::Validate;

/// `POST /generate-questions`
#[axum::debug_handler]
pub async fn generate_questions(
    State(state): State<AppState>,
    query: std::result::Result<Query<GenerateQuestionsQuery>, QueryRejection>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<QuestionsResponse>> {
    let Query(params) = query.map_err(|e| Error::BadRequest(e.body_text()))?;
    params.validate()?;

    let mut multipart = multipart.map_err(|e| Error::BadRequest(e.body_text()))?;
    let pdf = read_pdf_field(&mut multipart).await?;

    tracing::info!(
        questions = params.questions,
        sets = params.sets,
        bytes = pdf.len(),
        "Generating questions from upload"
    );
    let response = state
        .question_service
        .generate_from_pdf(pdf, params.questions as u32, params.sets as u32)
        .await?;

    tracing::info!(
        subject = %response.subject,
        sets = response.sets.len(),
        questions = response.question_count(),
        "Questions generated"
    );
    Ok(Json(response))
}

/// Finds the upload part and checks its declared type before reading the body.
async fn read_pdf_field(multipart: &mut Multipart) -> Result<Bytes> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(PDF_FIELD_NAME) {
            continue;
        }

        if field.content_type() != Some(PDF_CONTENT_TYPE) {
            tracing::warn!(content_type = ?field.content_type(), "Rejected non-PDF upload");
            return Err(Error::BadRequest(
                "Invalid file type. Please upload a PDF file.".to_string(),
            ));
        }

        return field
            .bytes()
            .await
            .map_err(|e| Error::Internal(format!("Failed to read uploaded file: {}", e)));
    }

    Err(Error::BadRequest(format!(
        "Missing file upload field '{}'",
        PDF_FIELD_NAME
    )))
}
