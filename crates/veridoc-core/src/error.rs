//! Error types for the veridoc-core library.

use thiserror::Error;

/// Main error type for the veridoc library.
#[derive(Error, Debug)]
pub enum VeridocError {
    /// Text/PDF extraction error.
    #[error("extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// OCR engine error.
    #[error("OCR error: {0}")]
    Ocr(#[from] veridoc_ocr::OcrError),

    /// Verification run lifecycle error.
    #[error("run error: {0}")]
    Run(#[from] RunError),

    /// Registry adapter error.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to document text extraction.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract embedded text from a PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// No rasterizable image could be found for a scanned page.
    #[error("no page image found")]
    NoPageImage,

    /// Failed to decode an uploaded image.
    #[error("failed to decode image: {0}")]
    Decode(String),
}

/// Errors related to the verification run lifecycle.
///
/// These are contract errors: they indicate caller bugs, never document
/// quality problems, and are surfaced rather than degraded.
#[derive(Error, Debug)]
pub enum RunError {
    /// The run was already finalized; a new run must be created to re-verify.
    #[error("run {0} is already finalized")]
    AlreadyFinalized(String),
}

/// Errors surfaced by registry adapters.
///
/// The registry signal generator recovers from these locally; they never
/// abort a verification run.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The registry backend could not be reached or answered with an error.
    #[error("registry unavailable: {0}")]
    Unavailable(String),
}

/// Result type for the veridoc library.
pub type Result<T> = std::result::Result<T, VeridocError>;
