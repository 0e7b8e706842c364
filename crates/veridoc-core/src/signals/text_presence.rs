//! Structural text-presence check.

use super::DOC_OCR_TEXT;
use crate::models::document::{ExtractedText, RawDocument};
use crate::models::run::{Signal, SignalPayload};

/// Passed when extraction found a usable amount of text; the score grows
/// with length up to 2000 characters. Empty text is a strong negative
/// signal, not an error.
pub fn text_presence_signal(
    extracted: &ExtractedText,
    doc: &RawDocument,
    engine_label: &str,
) -> Signal {
    let length = extracted.text.len();
    let score = (length as f32 / 2000.0).min(1.0);

    Signal::scored(
        DOC_OCR_TEXT,
        length > 30,
        score,
        format!("Extracted {} characters ({:?})", length, extracted.source),
        SignalPayload::OcrText {
            engine: engine_label.to_string(),
            bytes: doc.len(),
            sha256: doc.content_hash().to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::TextSource;

    fn doc() -> RawDocument {
        RawDocument::new(b"bytes".to_vec(), None)
    }

    #[test]
    fn long_text_passes() {
        let extracted = ExtractedText::from_ocr("x".repeat(200), TextSource::OcrImage, Some(80.0));
        let signal = text_presence_signal(&extracted, &doc(), "test");
        assert!(signal.passed);
        assert_eq!(signal.score, Some(0.1));
    }

    #[test]
    fn any_text_over_twenty_chars_passes() {
        // Structural-presence property: >30 chars always passes.
        for length in [31usize, 100, 5000] {
            let extracted =
                ExtractedText::from_ocr("y".repeat(length), TextSource::OcrImage, Some(50.0));
            let signal = text_presence_signal(&extracted, &doc(), "test");
            assert!(signal.passed, "length {} should pass", length);
        }
    }

    #[test]
    fn empty_text_fails_with_zero_score() {
        let signal = text_presence_signal(&ExtractedText::empty(), &doc(), "test");
        assert!(!signal.passed);
        assert_eq!(signal.score, Some(0.0));
    }

    #[test]
    fn score_caps_at_one() {
        let extracted =
            ExtractedText::from_ocr("z".repeat(10_000), TextSource::EmbeddedText, None);
        let signal = text_presence_signal(&extracted, &doc(), "test");
        assert_eq!(signal.score, Some(1.0));
    }
}
