//! Configuration structures for the verification pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for the veridoc pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VeridocConfig {
    /// OCR selector configuration.
    pub ocr: OcrSelectorConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Decision aggregation configuration.
    pub decision: DecisionConfig,
}

/// OCR variant-selection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSelectorConfig {
    /// Language tags handed to the OCR engine, `+`-separated.
    pub langs: String,

    /// Add the two aggressive handwriting variants to the set.
    pub handwriting_mode: bool,

    /// Minimum pixel width before a variant upscales the image.
    pub target_min_width: u32,

    /// Maximum OCR passes running at once.
    pub max_concurrent_variants: usize,
}

impl Default for OcrSelectorConfig {
    fn default() -> Self {
        Self {
            langs: "eng+fra".to_string(),
            handwriting_mode: false,
            target_min_width: 1800,
            max_concurrent_variants: 3,
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Minimum non-whitespace characters for embedded text to be trusted
    /// without OCR.
    pub min_embedded_text: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            min_embedded_text: 20,
        }
    }
}

/// Decision aggregation thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// Weighted aggregate at or above which a run is approved.
    pub approve_threshold: f32,

    /// Weighted aggregate at or below which a run is rejected.
    pub reject_threshold: f32,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            approve_threshold: 0.8,
            reject_threshold: 0.4,
        }
    }
}

impl VeridocConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = VeridocConfig::default();
        assert_eq!(config.ocr.langs, "eng+fra");
        assert!(!config.ocr.handwriting_mode);
        assert_eq!(config.ocr.target_min_width, 1800);
        assert_eq!(config.pdf.min_embedded_text, 20);
        assert_eq!(config.decision.approve_threshold, 0.8);
        assert_eq!(config.decision.reject_threshold, 0.4);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: VeridocConfig =
            serde_json::from_str(r#"{"ocr": {"handwriting_mode": true}}"#).unwrap();
        assert!(config.ocr.handwriting_mode);
        assert_eq!(config.ocr.langs, "eng+fra");
        assert_eq!(config.decision.approve_threshold, 0.8);
    }
}
