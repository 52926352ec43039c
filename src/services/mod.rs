pub mod ai_service;
pub mod pdf_service;
pub mod question_service;
