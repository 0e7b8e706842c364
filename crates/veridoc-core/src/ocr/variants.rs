//! Preprocessing variants for the OCR selector.
//!
//! A single fixed binarization threshold fails across the range of scan
//! quality seen in the wild, so the selector explores a small fixed set of
//! profiles and keeps the best result. Each variant pairs a preprocessing
//! profile with the segmentation hint that suits it.

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, Luma};

use veridoc_ocr::SegmentationHint;

use crate::models::config::OcrSelectorConfig;

/// One preprocessing recipe.
///
/// Applied in a fixed order: grayscale, contrast normalize, upscale, blur,
/// threshold, invert, sharpen.
#[derive(Debug, Clone, Copy)]
pub struct PrepProfile {
    /// Binarization threshold (0–255); `None` skips binarization.
    pub threshold: Option<u8>,
    /// Invert colors (pale text on dark background).
    pub invert: bool,
    /// Gaussian blur sigma before thresholding; 0 disables.
    pub blur: f32,
    /// Apply a final sharpen pass.
    pub sharpen: bool,
    /// Upscale to at least this width (Lanczos3); 0 disables.
    pub upscale_min_width: u32,
}

/// A (preprocessing profile, segmentation hint) pair.
#[derive(Debug, Clone, Copy)]
pub struct OcrVariant {
    /// Stable label recorded in logs and payloads.
    pub label: &'static str,
    pub prep: PrepProfile,
    pub segmentation: SegmentationHint,
}

/// The fixed variant list for a configuration.
///
/// Handwriting mode appends two more aggressive variants.
pub fn variant_set(config: &OcrSelectorConfig) -> Vec<OcrVariant> {
    let w = config.target_min_width;
    let mut variants = vec![
        OcrVariant {
            label: "bin190_sparse",
            prep: PrepProfile {
                threshold: Some(190),
                invert: false,
                blur: 0.3,
                sharpen: true,
                upscale_min_width: w,
            },
            segmentation: SegmentationHint::SparseText,
        },
        OcrVariant {
            label: "bin210_block",
            prep: PrepProfile {
                threshold: Some(210),
                invert: false,
                blur: 0.3,
                sharpen: true,
                upscale_min_width: w,
            },
            segmentation: SegmentationHint::SingleBlock,
        },
        OcrVariant {
            label: "bin170_column",
            prep: PrepProfile {
                threshold: Some(170),
                invert: false,
                blur: 0.2,
                sharpen: true,
                upscale_min_width: w,
            },
            segmentation: SegmentationHint::SingleColumn,
        },
        OcrVariant {
            label: "nothresh_sparse",
            prep: PrepProfile {
                threshold: None,
                invert: false,
                blur: 0.0,
                sharpen: true,
                upscale_min_width: w,
            },
            segmentation: SegmentationHint::SparseText,
        },
    ];

    if config.handwriting_mode {
        variants.push(OcrVariant {
            label: "hw_bin180_block",
            prep: PrepProfile {
                threshold: Some(180),
                invert: false,
                blur: 0.2,
                sharpen: true,
                upscale_min_width: w,
            },
            segmentation: SegmentationHint::SingleBlock,
        });
        variants.push(OcrVariant {
            label: "hw_bin200_line",
            prep: PrepProfile {
                threshold: Some(200),
                invert: false,
                blur: 0.1,
                sharpen: true,
                upscale_min_width: w,
            },
            segmentation: SegmentationHint::SingleLine,
        });
    }

    variants
}

/// The single-pass profile used when every variant fails.
pub fn fallback_profile(config: &OcrSelectorConfig) -> PrepProfile {
    PrepProfile {
        threshold: Some(190),
        invert: false,
        blur: 0.3,
        sharpen: true,
        upscale_min_width: config.target_min_width,
    }
}

/// Apply a preprocessing profile to an image.
pub fn apply_profile(image: &DynamicImage, prep: &PrepProfile) -> DynamicImage {
    let gray = stretch_contrast(&image.to_luma8());
    let mut img = DynamicImage::ImageLuma8(gray);

    if prep.upscale_min_width > 0 && img.width() < prep.upscale_min_width {
        let scale = prep.upscale_min_width as f32 / img.width() as f32;
        let height = ((img.height() as f32 * scale) as u32).max(1);
        img = img.resize_exact(prep.upscale_min_width, height, FilterType::Lanczos3);
    }

    if prep.blur > 0.0 {
        img = img.blur(prep.blur);
    }

    if let Some(threshold) = prep.threshold {
        img = DynamicImage::ImageLuma8(binarize(&img.to_luma8(), threshold));
    }

    if prep.invert {
        img.invert();
    }

    if prep.sharpen {
        img = img.unsharpen(1.0, 2);
    }

    img
}

/// Linear contrast stretch to the full 0–255 range.
fn stretch_contrast(image: &GrayImage) -> GrayImage {
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    for pixel in image.pixels() {
        min = min.min(pixel[0]);
        max = max.max(pixel[0]);
    }

    if max <= min {
        return image.clone();
    }

    let range = (max - min) as f32;
    let (width, height) = image.dimensions();
    let mut result = GrayImage::new(width, height);
    for (x, y, pixel) in image.enumerate_pixels() {
        let stretched = ((pixel[0] - min) as f32 / range * 255.0) as u8;
        result.put_pixel(x, y, Luma([stretched]));
    }
    result
}

fn binarize(image: &GrayImage, threshold: u8) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut result = GrayImage::new(width, height);
    for (x, y, pixel) in image.enumerate_pixels() {
        let value = if pixel[0] >= threshold { 255 } else { 0 };
        result.put_pixel(x, y, Luma([value]));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::OcrSelectorConfig;

    #[test]
    fn default_set_has_four_variants() {
        let config = OcrSelectorConfig::default();
        let variants = variant_set(&config);
        assert_eq!(variants.len(), 4);
        assert_eq!(variants[0].label, "bin190_sparse");
        assert_eq!(variants[3].prep.threshold, None);
    }

    #[test]
    fn handwriting_mode_adds_two_variants() {
        let config = OcrSelectorConfig {
            handwriting_mode: true,
            ..OcrSelectorConfig::default()
        };
        let variants = variant_set(&config);
        assert_eq!(variants.len(), 6);
        assert_eq!(variants[5].label, "hw_bin200_line");
        assert_eq!(variants[5].segmentation, veridoc_ocr::SegmentationHint::SingleLine);
    }

    #[test]
    fn binarize_splits_at_threshold() {
        let mut img = GrayImage::new(2, 1);
        img.put_pixel(0, 0, Luma([100]));
        img.put_pixel(1, 0, Luma([200]));
        let out = binarize(&img, 190);
        assert_eq!(out.get_pixel(0, 0)[0], 0);
        assert_eq!(out.get_pixel(1, 0)[0], 255);
    }

    #[test]
    fn stretch_contrast_expands_range() {
        let mut img = GrayImage::new(2, 1);
        img.put_pixel(0, 0, Luma([100]));
        img.put_pixel(1, 0, Luma([150]));
        let out = stretch_contrast(&img);
        assert_eq!(out.get_pixel(0, 0)[0], 0);
        assert_eq!(out.get_pixel(1, 0)[0], 255);
    }

    #[test]
    fn small_image_is_upscaled_to_min_width() {
        let img = DynamicImage::new_luma8(100, 50);
        let prep = PrepProfile {
            threshold: None,
            invert: false,
            blur: 0.0,
            sharpen: false,
            upscale_min_width: 400,
        };
        let out = apply_profile(&img, &prep);
        assert_eq!(out.width(), 400);
        assert_eq!(out.height(), 200);
    }
}
