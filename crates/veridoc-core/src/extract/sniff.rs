//! MIME sniffing from file signature bytes.
//!
//! Used when the uploader declared no MIME type. Unknown signatures fall
//! through to the image OCR path, so this only needs to cover the formats
//! the pipeline treats specially.

/// Sniff a MIME type from the leading bytes of a file.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"%PDF-") {
        return Some("application/pdf");
    }
    if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some("image/png");
    }
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if bytes.starts_with(b"II*\x00") || bytes.starts_with(b"MM\x00*") {
        return Some("image/tiff");
    }
    if bytes.starts_with(b"BM") {
        return Some("image/bmp");
    }
    if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return Some("image/gif");
    }
    None
}

/// Whether a MIME string names a PDF.
pub fn is_pdf_mime(mime: &str) -> bool {
    let mime = mime.to_ascii_lowercase();
    mime == "application/pdf" || mime.ends_with("/pdf")
}
