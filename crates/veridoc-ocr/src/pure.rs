//! Native OCR engine backed by `pure-onnx-ocr` (pure Rust, no external
//! ONNX Runtime).

use std::path::Path;
use std::time::Instant;

use image::DynamicImage;
use tracing::{debug, info};

use crate::{OcrEngine, OcrError, OcrOutput, RecognizeOptions, Result};

/// OCR engine wrapping a `pure-onnx-ocr` PaddleOCR pipeline.
///
/// The engine performs its own text detection and layout ordering, so the
/// [`SegmentationHint`](crate::SegmentationHint) in the options is accepted
/// but not acted on. Language tags are fixed by the loaded recognition
/// model's dictionary (the latin set covers both French and English).
pub struct PureOcrEngine {
    engine: pure_onnx_ocr::engine::OcrEngine,
}

impl PureOcrEngine {
    /// Create an engine from model files in a directory.
    ///
    /// Expects `det.onnx`, `latin_rec.onnx` and `latin_dict.txt` as produced
    /// by `veridoc models download`.
    pub fn from_dir(model_dir: &Path) -> Result<Self> {
        let det_path = model_dir.join("det.onnx");
        let rec_path = model_dir.join("latin_rec.onnx");
        let dict_path = model_dir.join("latin_dict.txt");

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", model_dir.display());

        Ok(Self { engine })
    }
}

impl OcrEngine for PureOcrEngine {
    fn recognize(&self, image: &DynamicImage, _options: &RecognizeOptions) -> Result<OcrOutput> {
        let start = Instant::now();

        let results = self
            .engine
            .run_from_image(image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        // Sort into reading order: rows of ~20px, left to right within a row.
        let mut regions: Vec<(f32, f32, String, f32)> = results
            .iter()
            .map(|r| {
                let (x, y) = polygon_origin(&r.bounding_box);
                (x, y, r.text.clone(), r.confidence)
            })
            .collect();

        regions.sort_by(|a, b| {
            let row_a = (a.1 / 20.0) as i32;
            let row_b = (b.1 / 20.0) as i32;
            if row_a != row_b {
                row_a.cmp(&row_b)
            } else {
                a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal)
            }
        });

        let text = regions
            .iter()
            .map(|(_, _, t, _)| t.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        // Per-region confidences are 0-1; the selector works in the 0-100
        // range, so rescale the mean.
        let confidence = if regions.is_empty() {
            0.0
        } else {
            let sum: f32 = regions.iter().map(|(_, _, _, c)| c).sum();
            sum / regions.len() as f32 * 100.0
        };

        debug!(
            "OCR pass: {} regions, confidence {:.1}, {}ms",
            regions.len(),
            confidence,
            start.elapsed().as_millis()
        );

        Ok(OcrOutput { text, confidence })
    }

    fn label(&self) -> &str {
        "pure-onnx-ocr"
    }
}

/// Top-left corner of a detected region's polygon.
fn polygon_origin(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f32, f32) {
    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    for coord in polygon.exterior().coords() {
        min_x = min_x.min(coord.x as f32);
        min_y = min_y.min(coord.y as f32);
    }
    (min_x, min_y)
}
