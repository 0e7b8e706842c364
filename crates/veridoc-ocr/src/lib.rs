//! OCR engine abstraction for veridoc.
//!
//! This crate defines the injectable recognition capability the pipeline
//! depends on:
//! - the [`OcrEngine`] trait, constructed once by the caller and reused
//!   across requests
//! - recognition options (language tags and a page-segmentation hint)
//! - a native engine backed by `pure-onnx-ocr` (PaddleOCR models) behind
//!   the `native` feature

mod error;

#[cfg(feature = "native")]
mod pure;

pub use error::OcrError;

#[cfg(feature = "native")]
pub use pure::PureOcrEngine;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// Result type for OCR operations.
pub type Result<T> = std::result::Result<T, OcrError>;

/// Page-segmentation hint for an OCR pass.
///
/// Engines that do their own layout analysis may ignore the hint; it exists
/// so preprocessing variants can be paired with the segmentation strategy
/// that suits them (sparse scans vs. dense paragraphs vs. single lines).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentationHint {
    /// Scattered text with no fixed layout (scanned certificates, CVs).
    SparseText,
    /// One uniform block of text.
    SingleBlock,
    /// A single column of variable-width lines.
    SingleColumn,
    /// A single text line (aggressive handwriting variants).
    SingleLine,
}

impl Default for SegmentationHint {
    fn default() -> Self {
        Self::SparseText
    }
}

/// Options for one recognition pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizeOptions {
    /// Language tags for the engine, `+`-separated (e.g. `"eng+fra"`).
    pub languages: String,

    /// Segmentation hint for this pass.
    pub segmentation: SegmentationHint,
}

impl Default for RecognizeOptions {
    fn default() -> Self {
        Self {
            languages: "eng+fra".to_string(),
            segmentation: SegmentationHint::default(),
        }
    }
}

impl RecognizeOptions {
    /// Options with the given language tags and the default segmentation.
    pub fn for_languages(languages: impl Into<String>) -> Self {
        Self {
            languages: languages.into(),
            ..Self::default()
        }
    }

    /// Replace the segmentation hint.
    pub fn with_segmentation(mut self, segmentation: SegmentationHint) -> Self {
        self.segmentation = segmentation;
        self
    }
}

/// Output of one recognition pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrOutput {
    /// Recognized text, lines joined with newlines in reading order.
    pub text: String,

    /// Mean recognition confidence over all text regions, 0–100.
    pub confidence: f32,
}

impl OcrOutput {
    /// An empty result with zero confidence.
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            confidence: 0.0,
        }
    }

    /// Whether the result carries any non-whitespace text.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Trait for OCR engines.
///
/// Implementations must be cheap to share (`Send + Sync`); the pipeline
/// runs several preprocessing variants against one engine concurrently.
pub trait OcrEngine: Send + Sync {
    /// Recognize text in the given image.
    fn recognize(&self, image: &DynamicImage, options: &RecognizeOptions) -> Result<OcrOutput>;

    /// Short label identifying the engine, recorded in signal payloads.
    fn label(&self) -> &str;
}
