pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use crate::config::Config;
use crate::error::Result;
use crate::services::{
    ai_service::{AIService, GenerationClient},
    pdf_service::{PdfService, TextExtractor},
    question_service::QuestionService,
};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub question_service: QuestionService,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.gemini_timeout_secs))
            .build()?;

        let ai_service = AIService::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            config.gemini_base_url.clone(),
            http_client,
        );

        Ok(Self::with_services(
            config,
            Arc::new(PdfService::new()),
            Arc::new(ai_service),
        ))
    }

    pub fn with_services(
        config: Config,
        extractor: Arc<dyn TextExtractor>,
        generator: Arc<dyn GenerationClient>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            question_service: QuestionService::new(extractor, generator),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(routes::health::health))
        .route(
            "/generate-questions",
            post(routes::questions::generate_questions),
        )
        .with_state(state)
        .layer(middleware::cors::permissive_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit))
}
