//! Document input and extracted-text models.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// An uploaded document as received from storage.
///
/// Immutable once created; the content hash is computed at construction and
/// travels with the document into signal payloads.
#[derive(Debug, Clone)]
pub struct RawDocument {
    bytes: Vec<u8>,
    declared_mime: Option<String>,
    content_hash: String,
}

impl RawDocument {
    /// Wrap file bytes and an optional declared MIME type.
    pub fn new(bytes: Vec<u8>, declared_mime: Option<String>) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let content_hash = format!("{:x}", hasher.finalize());

        Self {
            bytes,
            declared_mime,
            content_hash,
        }
    }

    /// The raw file bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of bytes in the document.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the document is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The MIME type declared by the uploader, if any.
    pub fn declared_mime(&self) -> Option<&str> {
        self.declared_mime.as_deref()
    }

    /// Lowercase hex SHA-256 of the file bytes.
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }
}

/// How the text of a document was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSource {
    /// Structured text embedded in a PDF; treated as fully trusted.
    EmbeddedText,
    /// OCR over an uploaded image.
    OcrImage,
    /// OCR over a rasterized PDF page.
    OcrRasterizedPdf,
}

/// Text extracted from one document.
///
/// Empty text is a valid, low-confidence terminal state — extraction never
/// fails; downstream signals treat empty text as a strong negative signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedText {
    /// The extracted plain text.
    pub text: String,

    /// How the text was obtained.
    pub source: TextSource,

    /// Mean OCR confidence (0–100). `None` for embedded PDF text and for
    /// the unmeasured OCR fallback pass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr_confidence: Option<f32>,
}

impl ExtractedText {
    /// The terminal "nothing could be extracted" value.
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            source: TextSource::OcrImage,
            ocr_confidence: Some(0.0),
        }
    }

    /// Embedded PDF text (no OCR confidence; fully trusted).
    pub fn embedded(text: String) -> Self {
        Self {
            text,
            source: TextSource::EmbeddedText,
            ocr_confidence: None,
        }
    }

    /// OCR result with its source and measured confidence.
    pub fn from_ocr(text: String, source: TextSource, confidence: Option<f32>) -> Self {
        Self {
            text,
            source,
            ocr_confidence: confidence,
        }
    }
}

/// The two document families the pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// A résumé / curriculum vitae.
    Cv,
    /// A company registration document (certificate, registry extract).
    CompanyDoc,
}

impl std::str::FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cv" => Ok(Self::Cv),
            "company_doc" | "company-doc" | "company" => Ok(Self::CompanyDoc),
            other => Err(format!("unknown document type: {}", other)),
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cv => write!(f, "cv"),
            Self::CompanyDoc => write!(f, "company_doc"),
        }
    }
}

/// The caller-supplied "ground truth" a parsed company document is compared
/// against. All fields are optional; the profile itself may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpectedProfile {
    /// Registered company name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    /// Raw registration number value (ICE, RC, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,

    /// Headquarters address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_hash_is_stable_hex_sha256() {
        let doc = RawDocument::new(b"hello".to_vec(), None);
        assert_eq!(
            doc.content_hash(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn document_type_parses_aliases() {
        assert_eq!("cv".parse::<DocumentType>().unwrap(), DocumentType::Cv);
        assert_eq!(
            "company-doc".parse::<DocumentType>().unwrap(),
            DocumentType::CompanyDoc
        );
        assert!("invoice".parse::<DocumentType>().is_err());
    }
}
