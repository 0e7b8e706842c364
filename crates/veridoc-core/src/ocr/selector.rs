//! Best-of-N OCR selection.
//!
//! Runs every preprocessing variant against the injected engine under a
//! bounded worker pool and keeps the highest-confidence non-empty result.
//! Per-variant failures are skipped; selection is deterministic regardless
//! of completion order (ties keep the first variant in list order).

use std::sync::Arc;

use image::DynamicImage;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use veridoc_ocr::{OcrEngine, OcrOutput, RecognizeOptions};

use super::variants::{apply_profile, fallback_profile, variant_set};
use crate::models::config::OcrSelectorConfig;

/// Result of a best-of-N OCR pass.
#[derive(Debug, Clone)]
pub struct SelectedOcr {
    /// Text of the winning variant (possibly empty).
    pub text: String,
    /// Winning confidence (0–100); `None` when only the unmeasured
    /// fallback pass produced text.
    pub confidence: Option<f32>,
    /// Label of the winning variant.
    pub variant: Option<&'static str>,
}

impl SelectedOcr {
    fn empty() -> Self {
        Self {
            text: String::new(),
            confidence: Some(0.0),
            variant: None,
        }
    }
}

/// Multi-variant OCR selector over an injected engine.
pub struct OcrSelector {
    engine: Arc<dyn OcrEngine>,
    config: OcrSelectorConfig,
}

impl OcrSelector {
    /// Create a selector sharing the given engine.
    pub fn new(engine: Arc<dyn OcrEngine>, config: OcrSelectorConfig) -> Self {
        Self { engine, config }
    }

    /// OCR the image with every variant and keep the best result.
    pub async fn ocr_best(&self, image: &DynamicImage) -> SelectedOcr {
        let variants = variant_set(&self.config);
        let image = Arc::new(image.clone());
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_variants.max(1)));

        let mut handles = Vec::with_capacity(variants.len());
        for (index, variant) in variants.iter().enumerate() {
            // Acquiring before spawning bounds how many passes run at once.
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                break;
            };

            let engine = Arc::clone(&self.engine);
            let image = Arc::clone(&image);
            let prep = variant.prep;
            let options = RecognizeOptions::for_languages(&self.config.langs)
                .with_segmentation(variant.segmentation);
            let label = variant.label;

            let handle = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                let prepped = apply_profile(&image, &prep);
                engine.recognize(&prepped, &options)
            });
            handles.push((index, label, handle));
        }

        let mut best: Option<(usize, &'static str, OcrOutput)> = None;
        for (index, label, handle) in handles {
            match handle.await {
                Ok(Ok(output)) if output.has_text() && output.confidence >= 0.0 => {
                    let replaces = match &best {
                        None => true,
                        // Strictly greater: ties keep the earliest variant.
                        Some((_, _, current)) => output.confidence > current.confidence,
                    };
                    debug!(
                        "OCR variant {}: confidence {:.1}, {} chars",
                        label,
                        output.confidence,
                        output.text.len()
                    );
                    if replaces {
                        best = Some((index, label, output));
                    }
                }
                Ok(Ok(output)) => {
                    debug!(
                        "OCR variant {}: discarded (empty text, confidence {:.1})",
                        label, output.confidence
                    );
                }
                Ok(Err(e)) => {
                    debug!("OCR variant {} failed, skipping: {}", label, e);
                }
                Err(e) => {
                    warn!("OCR variant {} task panicked: {}", label, e);
                }
            }
        }

        if let Some((_, label, output)) = best {
            return SelectedOcr {
                text: output.text,
                confidence: Some(output.confidence),
                variant: Some(label),
            };
        }

        // Every variant failed or produced nothing: one default-profile
        // pass, returned even though its confidence is unmeasured.
        self.fallback_pass(&image).await
    }

    async fn fallback_pass(&self, image: &Arc<DynamicImage>) -> SelectedOcr {
        let engine = Arc::clone(&self.engine);
        let image = Arc::clone(image);
        let prep = fallback_profile(&self.config);
        let options = RecognizeOptions::for_languages(&self.config.langs);

        let result = tokio::task::spawn_blocking(move || {
            let prepped = apply_profile(&image, &prep);
            engine.recognize(&prepped, &options)
        })
        .await;

        match result {
            Ok(Ok(output)) if output.has_text() => SelectedOcr {
                text: output.text,
                confidence: None,
                variant: Some("default"),
            },
            Ok(Ok(_)) => SelectedOcr::empty(),
            Ok(Err(e)) => {
                warn!("Fallback OCR pass failed: {}", e);
                SelectedOcr::empty()
            }
            Err(e) => {
                warn!("Fallback OCR task panicked: {}", e);
                SelectedOcr::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use veridoc_ocr::OcrError;

    /// Engine whose passes return scripted results in call order.
    struct ScriptedEngine {
        calls: AtomicUsize,
        script: Vec<Result<(&'static str, f32), ()>>,
    }

    impl ScriptedEngine {
        fn new(script: Vec<Result<(&'static str, f32), ()>>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                script,
            }
        }
    }

    impl OcrEngine for ScriptedEngine {
        fn recognize(
            &self,
            _image: &DynamicImage,
            _options: &RecognizeOptions,
        ) -> veridoc_ocr::Result<OcrOutput> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            match self.script.get(call) {
                Some(Ok((text, confidence))) => Ok(OcrOutput {
                    text: text.to_string(),
                    confidence: *confidence,
                }),
                Some(Err(())) => Err(OcrError::Recognition("scripted failure".to_string())),
                None => Ok(OcrOutput::empty()),
            }
        }

        fn label(&self) -> &str {
            "scripted"
        }
    }

    fn serial_config() -> OcrSelectorConfig {
        OcrSelectorConfig {
            max_concurrent_variants: 1,
            target_min_width: 32,
            ..OcrSelectorConfig::default()
        }
    }

    #[tokio::test]
    async fn picks_highest_confidence_non_empty_variant() {
        // Confidences [10, 45, 0 (empty text), 30]: the 45 variant wins.
        let engine = Arc::new(ScriptedEngine::new(vec![
            Ok(("low", 10.0)),
            Ok(("winner", 45.0)),
            Ok(("", 0.0)),
            Ok(("third", 30.0)),
        ]));
        let selector = OcrSelector::new(engine, serial_config());
        let image = DynamicImage::new_luma8(8, 8);

        let selected = selector.ocr_best(&image).await;
        assert_eq!(selected.text, "winner");
        assert_eq!(selected.confidence, Some(45.0));
        assert_eq!(selected.variant, Some("bin210_block"));
    }

    #[tokio::test]
    async fn ties_keep_the_first_variant() {
        let engine = Arc::new(ScriptedEngine::new(vec![
            Ok(("first", 40.0)),
            Ok(("second", 40.0)),
            Ok(("third", 40.0)),
            Ok(("fourth", 40.0)),
        ]));
        let selector = OcrSelector::new(engine, serial_config());
        let image = DynamicImage::new_luma8(8, 8);

        let selected = selector.ocr_best(&image).await;
        assert_eq!(selected.text, "first");
        assert_eq!(selected.variant, Some("bin190_sparse"));
    }

    #[tokio::test]
    async fn variant_errors_are_skipped_not_fatal() {
        let engine = Arc::new(ScriptedEngine::new(vec![
            Err(()),
            Ok(("survivor", 20.0)),
            Err(()),
            Err(()),
        ]));
        let selector = OcrSelector::new(engine, serial_config());
        let image = DynamicImage::new_luma8(8, 8);

        let selected = selector.ocr_best(&image).await;
        assert_eq!(selected.text, "survivor");
        assert_eq!(selected.confidence, Some(20.0));
    }

    #[tokio::test]
    async fn all_variants_failing_falls_back_to_default_pass() {
        // Four failing variants, then the fallback pass succeeds.
        let engine = Arc::new(ScriptedEngine::new(vec![
            Err(()),
            Err(()),
            Err(()),
            Err(()),
            Ok(("rescued", 12.0)),
        ]));
        let selector = OcrSelector::new(engine, serial_config());
        let image = DynamicImage::new_luma8(8, 8);

        let selected = selector.ocr_best(&image).await;
        assert_eq!(selected.text, "rescued");
        assert_eq!(selected.confidence, None);
        assert_eq!(selected.variant, Some("default"));
    }

    #[tokio::test]
    async fn total_failure_yields_empty_zero_confidence() {
        let engine = Arc::new(ScriptedEngine::new(vec![
            Err(()),
            Err(()),
            Err(()),
            Err(()),
            Err(()),
        ]));
        let selector = OcrSelector::new(engine, serial_config());
        let image = DynamicImage::new_luma8(8, 8);

        let selected = selector.ocr_best(&image).await;
        assert_eq!(selected.text, "");
        assert_eq!(selected.confidence, Some(0.0));
        assert_eq!(selected.variant, None);
    }
}
