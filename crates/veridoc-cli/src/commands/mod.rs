//! CLI subcommands.

pub mod config;
pub mod models;
pub mod process;
pub mod verify;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use veridoc_core::{OcrEngine, VeridocConfig};
use veridoc_ocr::PureOcrEngine;

/// Load the pipeline configuration from `--config`, the default location,
/// or built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<VeridocConfig> {
    if let Some(path) = config_path {
        return Ok(VeridocConfig::from_file(Path::new(path))?);
    }
    let default_path = config::default_config_path();
    if default_path.exists() {
        return Ok(VeridocConfig::from_file(&default_path)?);
    }
    Ok(VeridocConfig::default())
}

/// Build the native OCR engine from a model directory.
pub fn build_engine(model_dir: Option<&Path>) -> anyhow::Result<Arc<dyn OcrEngine>> {
    let dir = model_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(models::default_model_dir);

    if !dir.join("det.onnx").exists() {
        anyhow::bail!(
            "No OCR models found in {}. Run `veridoc models download` first.",
            dir.display()
        );
    }

    Ok(Arc::new(PureOcrEngine::from_dir(&dir)?))
}

/// Guess a MIME type from a file extension for the declared-MIME slot.
pub fn mime_from_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    let mime = match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "tiff" | "tif" => "image/tiff",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        _ => return None,
    };
    Some(mime.to_string())
}

/// Resolve the default data directory (`~/.local/share/veridoc` on Linux).
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("veridoc")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_from_extension_covers_supported_formats() {
        assert_eq!(
            mime_from_extension(Path::new("doc.PDF")).as_deref(),
            Some("application/pdf")
        );
        assert_eq!(
            mime_from_extension(Path::new("scan.jpeg")).as_deref(),
            Some("image/jpeg")
        );
        assert_eq!(mime_from_extension(Path::new("notes.txt")), None);
        assert_eq!(mime_from_extension(Path::new("noext")), None);
    }

    #[test]
    fn explicit_config_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"ocr": {"handwriting_mode": true}}"#).unwrap();

        let config = load_config(path.to_str()).unwrap();
        assert!(config.ocr.handwriting_mode);
    }

    #[test]
    fn missing_models_produce_a_helpful_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = build_engine(Some(dir.path())).unwrap_err();
        assert!(err.to_string().contains("veridoc models download"));
    }
}
