//! Text extraction: embedded PDF text first, OCR fallback.

pub mod pdf;
pub mod sniff;

pub use pdf::{PdfDocument, PdfMetadataInfo};
pub use sniff::{is_pdf_mime, sniff_mime};

use std::sync::Arc;

use tracing::{debug, warn};

use veridoc_ocr::OcrEngine;

use crate::models::config::VeridocConfig;
use crate::models::document::{ExtractedText, RawDocument, TextSource};
use crate::ocr::OcrSelector;

/// Extracts the best-available plain text from a document.
///
/// Never fails for malformed input: every failure path degrades to an
/// [`ExtractedText`] with empty text and zero confidence, which downstream
/// signals read as a strong negative rather than an error.
pub struct TextExtractor {
    selector: OcrSelector,
    min_embedded_text: usize,
}

impl TextExtractor {
    /// Create an extractor around a shared OCR engine.
    pub fn new(engine: Arc<dyn OcrEngine>, config: &VeridocConfig) -> Self {
        Self {
            selector: OcrSelector::new(engine, config.ocr.clone()),
            min_embedded_text: config.pdf.min_embedded_text,
        }
    }

    /// Extract text from a document.
    pub async fn extract(&self, doc: &RawDocument) -> ExtractedText {
        let mime = doc
            .declared_mime()
            .map(str::to_string)
            .or_else(|| sniff_mime(doc.bytes()).map(str::to_string))
            .unwrap_or_default();

        if is_pdf_mime(&mime) {
            return self.extract_pdf(doc).await;
        }

        self.extract_image(doc.bytes(), TextSource::OcrImage).await
    }

    async fn extract_pdf(&self, doc: &RawDocument) -> ExtractedText {
        let pdf = match PdfDocument::load(doc.bytes()) {
            Ok(pdf) => pdf,
            Err(e) => {
                warn!("PDF load failed, treating as image: {}", e);
                return self
                    .extract_image(doc.bytes(), TextSource::OcrImage)
                    .await;
            }
        };

        // Embedded text is trusted outright when there is enough of it.
        match pdf.embedded_text() {
            Ok(text) => {
                let non_ws = text.chars().filter(|c| !c.is_whitespace()).count();
                if non_ws >= self.min_embedded_text {
                    debug!("Using embedded PDF text ({} chars)", text.len());
                    return ExtractedText::embedded(text);
                }
                debug!(
                    "Embedded text too short ({} non-whitespace chars), falling back to OCR",
                    non_ws
                );
            }
            Err(e) => warn!("Embedded text extraction failed: {}", e),
        }

        match pdf.rasterize_first_page() {
            Ok(page) => {
                let selected = self.selector.ocr_best(&page).await;
                ExtractedText::from_ocr(
                    selected.text,
                    TextSource::OcrRasterizedPdf,
                    selected.confidence,
                )
            }
            Err(e) => {
                warn!("PDF rasterization failed: {}", e);
                ExtractedText::empty()
            }
        }
    }

    async fn extract_image(&self, bytes: &[u8], source: TextSource) -> ExtractedText {
        let image = match image::load_from_memory(bytes) {
            Ok(image) => image,
            Err(e) => {
                warn!("Image decode failed: {}", e);
                return ExtractedText::empty();
            }
        };

        let selected = self.selector.ocr_best(&image).await;
        ExtractedText::from_ocr(selected.text, source, selected.confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veridoc_ocr::{OcrOutput, RecognizeOptions};

    struct FixedEngine {
        text: &'static str,
    }

    impl OcrEngine for FixedEngine {
        fn recognize(
            &self,
            _image: &image::DynamicImage,
            _options: &RecognizeOptions,
        ) -> veridoc_ocr::Result<OcrOutput> {
            Ok(OcrOutput {
                text: self.text.to_string(),
                confidence: 80.0,
            })
        }

        fn label(&self) -> &str {
            "fixed"
        }
    }

    fn extractor(text: &'static str) -> TextExtractor {
        let mut config = VeridocConfig::default();
        config.ocr.target_min_width = 32;
        TextExtractor::new(Arc::new(FixedEngine { text }), &config)
    }

    #[tokio::test]
    async fn garbage_bytes_degrade_to_empty_text() {
        let doc = RawDocument::new(b"neither pdf nor image".to_vec(), None);
        let extracted = extractor("ignored").extract(&doc).await;
        assert_eq!(extracted.text, "");
        assert_eq!(extracted.ocr_confidence, Some(0.0));
    }

    #[tokio::test]
    async fn png_bytes_go_through_ocr() {
        let mut bytes = Vec::new();
        let img = image::DynamicImage::new_luma8(16, 16);
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();

        let doc = RawDocument::new(bytes, None);
        let extracted = extractor("hello from ocr").extract(&doc).await;
        assert_eq!(extracted.text, "hello from ocr");
        assert_eq!(extracted.source, TextSource::OcrImage);
        assert_eq!(extracted.ocr_confidence, Some(80.0));
    }

    #[tokio::test]
    async fn declared_pdf_mime_with_bad_bytes_falls_through_to_image_path() {
        let doc = RawDocument::new(
            b"not really pdf".to_vec(),
            Some("application/pdf".to_string()),
        );
        let extracted = extractor("ignored").extract(&doc).await;
        // Not decodable as an image either: terminal empty state.
        assert_eq!(extracted.text, "");
        assert_eq!(extracted.source, TextSource::OcrImage);
    }
}
