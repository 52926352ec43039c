use crate::error::{Error, Result};
use std::panic::{self, AssertUnwindSafe};

#[cfg_attr(test, mockall::automock)]
pub trait TextExtractor: Send + Sync {
    /// Best-effort plain text of a whole document.
    fn extract(&self, data: &[u8]) -> Result<String>;
}

#[derive(Clone, Default)]
pub struct PdfService;

impl PdfService {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfService {
    fn extract(&self, data: &[u8]) -> Result<String> {
        // pdf-extract panics on some malformed inputs.
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(data)
        }));

        let pages = match result {
            Ok(Ok(pages)) => pages,
            Ok(Err(e)) => return Err(Error::Extraction(e.to_string())),
            Err(_) => {
                return Err(Error::Extraction(
                    "extraction panicked on a malformed document".to_string(),
                ))
            }
        };

        tracing::debug!(pages = pages.len(), "Extracted PDF pages");
        Ok(pages.concat())
    }
}
