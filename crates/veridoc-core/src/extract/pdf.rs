//! PDF access: embedded text, structural metadata, and first-page raster.
//!
//! Built on `lopdf` for structure and `pdf-extract` for text. Scanned PDFs
//! carry their page content as embedded image XObjects, so "rasterizing"
//! the first page means decoding its largest image stream.

use image::{DynamicImage, ImageBuffer, Rgba};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, trace};

use crate::error::ExtractError;

/// A loaded PDF document.
#[derive(Debug)]
pub struct PdfDocument {
    document: Document,
    raw_data: Vec<u8>,
}

/// Structural metadata for the PDF metadata signal.
#[derive(Debug, Clone)]
pub struct PdfMetadataInfo {
    /// Number of pages.
    pub page_count: u32,
    /// Whether the Info dictionary names a creator or producer.
    pub has_creator: bool,
    /// PDF version string.
    pub version: Option<String>,
}

impl PdfDocument {
    /// Load a PDF from bytes, decrypting empty-password encryption.
    pub fn load(data: &[u8]) -> Result<Self, ExtractError> {
        let mut document =
            Document::load_mem(data).map_err(|e| ExtractError::Parse(e.to_string()))?;

        let raw_data = if document.is_encrypted() {
            if document.decrypt("").is_err() {
                return Err(ExtractError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract needs the decrypted byte stream
            let mut decrypted = Vec::new();
            document
                .save_to(&mut decrypted)
                .map_err(|e| ExtractError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        if document.get_pages().is_empty() {
            return Err(ExtractError::NoPages);
        }

        debug!("Loaded PDF with {} pages", document.get_pages().len());

        Ok(Self { document, raw_data })
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }

    /// Structural metadata for the PDF metadata signal.
    pub fn metadata(&self) -> PdfMetadataInfo {
        let has_creator = self
            .info_dictionary()
            .map(|info| info.has(b"Creator") || info.has(b"Producer"))
            .unwrap_or(false);

        PdfMetadataInfo {
            page_count: self.page_count(),
            has_creator,
            version: Some(self.document.version.clone()),
        }
    }

    /// Extract all embedded text.
    pub fn embedded_text(&self) -> Result<String, ExtractError> {
        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| ExtractError::TextExtraction(e.to_string()))
    }

    /// Decode the first page's content as an image.
    ///
    /// Prefers image XObjects on page 1 (scanned documents are usually one
    /// full-page image); if the page declares none, scans every stream in
    /// the document. Picks the largest image by pixel area.
    pub fn rasterize_first_page(&self) -> Result<DynamicImage, ExtractError> {
        let pages = self.document.get_pages();
        let mut images = match pages.get(&1) {
            Some(page_id) => self.page_images(*page_id),
            None => Vec::new(),
        };

        if images.is_empty() {
            debug!("No XObject images on page 1, scanning all objects");
            images = self
                .document
                .objects
                .values()
                .filter_map(|obj| extract_image_object(&self.document, obj))
                .collect();
        }

        images
            .into_iter()
            .max_by_key(|img| u64::from(img.width()) * u64::from(img.height()))
            .ok_or(ExtractError::NoPageImage)
    }

    fn info_dictionary(&self) -> Option<Dictionary> {
        let info = self.document.trailer.get(b"Info").ok()?;
        match self.document.dereference(info) {
            Ok((_, Object::Dictionary(dict))) => Some(dict.clone()),
            _ => None,
        }
    }

    /// Images referenced by a page's resources, following Parent inheritance.
    fn page_images(&self, page_id: ObjectId) -> Vec<DynamicImage> {
        let mut images = Vec::new();

        let Some(resources) = self.node_resources(page_id) else {
            return images;
        };

        if let Ok(xobjects) = resources.get(b"XObject") {
            if let Ok((_, Object::Dictionary(xobj_dict))) = self.document.dereference(xobjects) {
                for (_name, obj_ref) in xobj_dict.iter() {
                    if let Ok((_, obj)) = self.document.dereference(obj_ref) {
                        if let Some(img) = extract_image_object(&self.document, obj) {
                            images.push(img);
                        }
                    }
                }
            }
        }

        images
    }

    fn node_resources(&self, node_id: ObjectId) -> Option<Dictionary> {
        let node = self.document.get_object(node_id).ok()?;
        let Object::Dictionary(dict) = node else {
            return None;
        };

        if let Ok(resources) = dict.get(b"Resources") {
            if let Ok((_, Object::Dictionary(res_dict))) = self.document.dereference(resources) {
                return Some(res_dict.clone());
            }
        }

        // Resources may be inherited from the page-tree parent
        if let Ok(Object::Reference(parent_id)) = dict.get(b"Parent") {
            return self.node_resources(*parent_id);
        }

        None
    }
}

/// Decode an image XObject stream into a `DynamicImage`.
fn extract_image_object(doc: &Document, obj: &Object) -> Option<DynamicImage> {
    let Object::Stream(stream) = obj else {
        return None;
    };
    let dict = &stream.dict;

    let subtype = dict.get(b"Subtype").ok()?;
    if subtype.as_name().ok()? != b"Image" {
        return None;
    }

    let width = dict.get(b"Width").ok()?.as_i64().ok()? as u32;
    let height = dict.get(b"Height").ok()?.as_i64().ok()? as u32;

    trace!("Found image object: {}x{}", width, height);

    if let Ok(filter) = dict.get(b"Filter") {
        let filter_name = match filter {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(arr) if !arr.is_empty() => arr.first().and_then(|o| o.as_name().ok()),
            _ => None,
        };

        match filter_name {
            Some(b"DCTDecode") => {
                // JPEG stream, decode as-is
                return image::load_from_memory_with_format(
                    &stream.content,
                    image::ImageFormat::Jpeg,
                )
                .ok();
            }
            Some(b"JPXDecode") | Some(b"CCITTFaxDecode") | Some(b"JBIG2Decode") => {
                trace!("Unsupported image filter, skipping");
                return None;
            }
            _ => {}
        }
    }

    let data = match stream.decompressed_content() {
        Ok(d) => d,
        Err(_) => stream.content.clone(),
    };

    let color_space = dict
        .get(b"ColorSpace")
        .ok()
        .and_then(|o| match o {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
            Object::Reference(r) => doc.get_object(*r).ok().and_then(|o| o.as_name().ok()),
            _ => None,
        })
        .unwrap_or(b"DeviceRGB");

    let bits = dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .unwrap_or(8) as u8;

    image_from_raw(&data, width, height, color_space, bits)
}

/// Build an image from raw 8-bit RGB or grayscale samples.
fn image_from_raw(
    data: &[u8],
    width: u32,
    height: u32,
    color_space: &[u8],
    bits_per_component: u8,
) -> Option<DynamicImage> {
    if bits_per_component != 8 {
        trace!("Unsupported bits per component: {}", bits_per_component);
        return None;
    }

    let pixels = (width as usize) * (height as usize);

    if color_space == b"DeviceRGB" || color_space == b"RGB" {
        let expected = pixels * 3;
        if data.len() >= expected {
            let mut rgba = Vec::with_capacity(pixels * 4);
            for chunk in data[..expected].chunks_exact(3) {
                rgba.extend_from_slice(&[chunk[0], chunk[1], chunk[2], 255]);
            }
            return ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, rgba)
                .map(DynamicImage::ImageRgba8);
        }
    } else if color_space == b"DeviceGray" || color_space == b"G" {
        if data.len() >= pixels {
            let mut rgba = Vec::with_capacity(pixels * 4);
            for &gray in &data[..pixels] {
                rgba.extend_from_slice(&[gray, gray, gray, 255]);
            }
            return ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, rgba)
                .map(DynamicImage::ImageRgba8);
        }
    }

    trace!(
        "Could not decode raw image: data_len={}, {}x{}",
        data.len(),
        width,
        height
    );
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_a_parse_error() {
        let err = PdfDocument::load(b"not a pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Parse(_)));
    }

    #[test]
    fn raw_gray_image_decodes() {
        let data = vec![128u8; 4];
        let img = image_from_raw(&data, 2, 2, b"DeviceGray", 8).unwrap();
        assert_eq!(img.width(), 2);
        assert_eq!(img.height(), 2);
    }

    #[test]
    fn raw_rgb_too_short_is_none() {
        let data = vec![0u8; 5];
        assert!(image_from_raw(&data, 2, 2, b"DeviceRGB", 8).is_none());
    }
}
