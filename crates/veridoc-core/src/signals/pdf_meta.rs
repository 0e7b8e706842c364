//! PDF metadata/structure check.

use serde_json::json;

use super::PDF_METADATA_CHECK;
use crate::extract::pdf::PdfDocument;
use crate::extract::sniff::{is_pdf_mime, sniff_mime};
use crate::models::document::RawDocument;
use crate::models::run::{Signal, SignalPayload};

/// Light structural check over a PDF: passed when the document has pages,
/// with extra credit for creator metadata. Non-PDF inputs skip with a
/// neutral score rather than being penalized.
pub fn pdf_metadata_signal(doc: &RawDocument) -> Signal {
    let mime = doc
        .declared_mime()
        .or_else(|| sniff_mime(doc.bytes()))
        .unwrap_or("");

    if !is_pdf_mime(mime) {
        return Signal::scored(
            PDF_METADATA_CHECK,
            true,
            0.5,
            "Non-PDF file; metadata checks skipped",
            SignalPayload::Opaque(json!({ "mime": mime })),
        );
    }

    match PdfDocument::load(doc.bytes()) {
        Ok(pdf) => {
            let meta = pdf.metadata();
            let has_pages = meta.page_count > 0;
            let score: f32 = ((if has_pages { 0.6 } else { 0.0 })
                + (if meta.has_creator { 0.2 } else { 0.1 })
                + 0.2_f32)
                .min(1.0);

            Signal::scored(
                PDF_METADATA_CHECK,
                has_pages,
                score,
                format!(
                    "PDF parsed: pages={}, creator={}",
                    meta.page_count,
                    if meta.has_creator { "yes" } else { "no" }
                ),
                SignalPayload::PdfMetadata {
                    page_count: meta.page_count,
                    has_creator: meta.has_creator,
                    version: meta.version,
                    parse_error: None,
                },
            )
        }
        Err(e) => Signal::scored(
            PDF_METADATA_CHECK,
            false,
            0.0,
            format!("PDF parse failed: {}", e),
            SignalPayload::PdfMetadata {
                page_count: 0,
                has_creator: false,
                version: None,
                parse_error: Some(e.to_string()),
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_pdf_skips_with_neutral_score() {
        let doc = RawDocument::new(b"plain text".to_vec(), Some("image/png".to_string()));
        let signal = pdf_metadata_signal(&doc);
        assert!(signal.passed);
        assert_eq!(signal.score, Some(0.5));
    }

    #[test]
    fn corrupt_pdf_fails_with_zero_score() {
        let doc = RawDocument::new(
            b"%PDF-1.4 garbage".to_vec(),
            Some("application/pdf".to_string()),
        );
        let signal = pdf_metadata_signal(&doc);
        assert!(!signal.passed);
        assert_eq!(signal.score, Some(0.0));
        assert!(matches!(
            signal.payload,
            SignalPayload::PdfMetadata {
                parse_error: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn sniffed_pdf_signature_is_treated_as_pdf() {
        // Declared mime missing: the %PDF signature routes to the PDF path,
        // where truncated bytes fail the structural check.
        let doc = RawDocument::new(b"%PDF-1.4".to_vec(), None);
        let signal = pdf_metadata_signal(&doc);
        assert!(!signal.passed);
    }
}
