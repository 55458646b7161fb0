//! Filename extension resolution
//!
//! Checks the extension of the original filename against the media type map.
//! Returns the canonical extension when the media type is known but the
//! original extension is missing or not accepted for it. Accepted extensions
//! match exactly, so `JPG` is not an accepted spelling of `jpg`. Returns the
//! original extension when the media type is unmapped or is the catch-all
//! `application/octet-stream`.

use curio_core::constants::FALLBACK_MEDIA_TYPE;
use curio_core::MediaTypeExtensionMap;

/// Extension of an original filename: the text after the last `.`
///
/// Returns `None` when there is no dot or nothing follows it.
pub fn original_extension(original_name: &str) -> Option<&str> {
    original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

/// Resolve the extension a stored file should carry
pub fn resolve_extension(
    media_type: &str,
    original_name: &str,
    map: &MediaTypeExtensionMap,
) -> Option<String> {
    let original = original_extension(original_name);

    if media_type == FALLBACK_MEDIA_TYPE {
        return original.map(str::to_string);
    }
    let Some(accepted) = map.extensions(media_type) else {
        return original.map(str::to_string);
    };

    match original {
        Some(ext) if accepted.iter().any(|a| a == ext) => Some(ext.to_string()),
        _ => accepted.first().cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn map() -> MediaTypeExtensionMap {
        let mut entries = HashMap::new();
        entries.insert(
            "image/jpeg".to_string(),
            vec!["jpg".to_string(), "jpeg".to_string()],
        );
        entries.insert(
            FALLBACK_MEDIA_TYPE.to_string(),
            vec!["bin".to_string()],
        );
        MediaTypeExtensionMap::new(entries)
    }

    #[test]
    fn substitutes_canonical_extension_for_unaccepted_one() {
        assert_eq!(
            resolve_extension("image/jpeg", "photo.png", &map()).as_deref(),
            Some("jpg")
        );
    }

    #[test]
    fn substitutes_canonical_extension_when_missing() {
        assert_eq!(
            resolve_extension("image/jpeg", "photo", &map()).as_deref(),
            Some("jpg")
        );
        assert_eq!(
            resolve_extension("image/jpeg", "photo.", &map()).as_deref(),
            Some("jpg")
        );
    }

    #[test]
    fn keeps_accepted_non_canonical_extension() {
        assert_eq!(
            resolve_extension("image/jpeg", "photo.jpeg", &map()).as_deref(),
            Some("jpeg")
        );
    }

    #[test]
    fn extension_match_is_case_sensitive() {
        assert_eq!(
            resolve_extension("image/jpeg", "photo.JPG", &map()).as_deref(),
            Some("jpg")
        );
        assert_eq!(
            resolve_extension("image/jpeg", "PHOTO.JPEG", &map()).as_deref(),
            Some("jpg")
        );
    }

    #[test]
    fn fallback_type_is_never_substituted() {
        // Even when the map carries an entry for the fallback type.
        assert_eq!(
            resolve_extension(FALLBACK_MEDIA_TYPE, "data.xyz", &map()).as_deref(),
            Some("xyz")
        );
        assert_eq!(resolve_extension(FALLBACK_MEDIA_TYPE, "data", &map()), None);
    }

    #[test]
    fn unmapped_type_keeps_original_extension() {
        assert_eq!(
            resolve_extension("text/plain", "notes.txt", &map()).as_deref(),
            Some("txt")
        );
        assert_eq!(resolve_extension("text/plain", "README", &map()), None);
    }

    #[test]
    fn original_extension_uses_last_dot() {
        assert_eq!(original_extension("archive.tar.gz"), Some("gz"));
        assert_eq!(original_extension(".profile"), Some("profile"));
        assert_eq!(original_extension("Makefile"), None);
    }
}
