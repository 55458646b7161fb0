//! Content-based media type detection
//!
//! Only the file content is inspected, never its name. Magic numbers are
//! matched with `infer`; content without a known signature is classified as
//! `text/plain` when it is valid UTF-8 without NUL bytes, and as the fallback
//! type otherwise.

use std::path::Path;

use curio_core::constants::{EMPTY_MEDIA_TYPE, FALLBACK_MEDIA_TYPE};
use tokio::io::AsyncReadExt;

/// Number of leading bytes inspected
const SNIFF_LEN: u64 = 8192;

/// Detect the media type of the file at `path`
pub async fn detect_media_type(path: &Path) -> std::io::Result<String> {
    let file = tokio::fs::File::open(path).await?;
    let mut buffer = Vec::with_capacity(SNIFF_LEN as usize);
    file.take(SNIFF_LEN).read_to_end(&mut buffer).await?;

    Ok(media_type_of(&buffer).to_string())
}

/// Classify a leading chunk of file content
pub fn media_type_of(head: &[u8]) -> &'static str {
    if head.is_empty() {
        return EMPTY_MEDIA_TYPE;
    }
    if let Some(kind) = infer::get(head) {
        return kind.mime_type();
    }
    if looks_like_text(head) {
        return "text/plain";
    }
    FALLBACK_MEDIA_TYPE
}

fn looks_like_text(head: &[u8]) -> bool {
    if head.contains(&0) {
        return false;
    }
    match std::str::from_utf8(head) {
        Ok(_) => true,
        // A multi-byte sequence cut off by the sniff window is still text.
        Err(e) => e.error_len().is_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];
    const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    #[test]
    fn detects_images_by_signature() {
        assert_eq!(media_type_of(PNG_HEADER), "image/png");
        assert_eq!(media_type_of(JPEG_HEADER), "image/jpeg");
    }

    #[test]
    fn detects_pdf_by_signature() {
        assert_eq!(media_type_of(b"%PDF-1.7\n%\xE2\xE3\xCF\xD3"), "application/pdf");
    }

    #[test]
    fn utf8_text_is_plain_text() {
        assert_eq!(media_type_of("Notes: caf\u{e9} \u{2713}\n".as_bytes()), "text/plain");
    }

    #[test]
    fn truncated_multibyte_sequence_is_still_text() {
        let mut head = "abc".as_bytes().to_vec();
        head.extend_from_slice(&[0xE2, 0x9C]); // first two bytes of a 3-byte char
        assert_eq!(media_type_of(&head), "text/plain");
    }

    #[test]
    fn binary_without_signature_falls_back() {
        assert_eq!(media_type_of(&[0x01, 0x00, 0xFE, 0x42]), FALLBACK_MEDIA_TYPE);
        assert_eq!(media_type_of(&[0xC3, 0x28, 0x41]), FALLBACK_MEDIA_TYPE);
    }

    #[test]
    fn empty_content_has_empty_type() {
        assert_eq!(media_type_of(&[]), EMPTY_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn ignores_misleading_filename() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, b"just some words").unwrap();

        assert_eq!(detect_media_type(&path).await.unwrap(), "text/plain");
    }
}
