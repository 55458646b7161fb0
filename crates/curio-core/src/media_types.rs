//! Media type to filename extension map
//!
//! Maps an Internet media type to the filename extensions accepted for it.
//! The first extension listed for a type is its canonical extension.
//!
//! The map is either the built-in table (`MediaTypeExtensionMap::default()`)
//! or a JSON object loaded from disk:
//!
//! ```json
//! { "image/jpeg": ["jpg", "jpeg", "jpe"], "text/plain": ["txt"] }
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Built-in media types and their accepted extensions (canonical first).
const DEFAULT_ENTRIES: &[(&str, &[&str])] = &[
    ("application/msword", &["doc", "dot"]),
    ("application/ogg", &["ogx"]),
    ("application/pdf", &["pdf"]),
    ("application/rtf", &["rtf"]),
    ("application/vnd.ms-excel", &["xls", "xlm", "xla", "xlc", "xlt", "xlw"]),
    ("application/vnd.ms-powerpoint", &["ppt", "pps", "pot"]),
    ("application/vnd.oasis.opendocument.presentation", &["odp"]),
    ("application/vnd.oasis.opendocument.spreadsheet", &["ods"]),
    ("application/vnd.oasis.opendocument.text", &["odt"]),
    (
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        &["pptx"],
    ),
    (
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        &["xlsx"],
    ),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        &["docx"],
    ),
    ("application/x-7z-compressed", &["7z"]),
    ("application/x-bzip2", &["bz2", "boz"]),
    ("application/gzip", &["gz", "tgz"]),
    ("application/x-tar", &["tar"]),
    ("application/zip", &["zip"]),
    ("application/epub+zip", &["epub"]),
    ("application/wasm", &["wasm"]),
    ("audio/aac", &["aac"]),
    ("audio/flac", &["flac"]),
    ("audio/midi", &["mid", "midi", "kar", "rmi"]),
    ("audio/mp4", &["m4a", "mp4a"]),
    ("audio/mpeg", &["mp3", "mpga", "mp2", "mp2a", "m2a", "m3a"]),
    ("audio/ogg", &["oga", "ogg", "spx", "opus"]),
    ("audio/x-aiff", &["aif", "aiff", "aifc"]),
    ("audio/x-wav", &["wav"]),
    ("image/bmp", &["bmp"]),
    ("image/gif", &["gif"]),
    ("image/heic", &["heic"]),
    ("image/heif", &["heif"]),
    ("image/jpeg", &["jpg", "jpeg", "jpe"]),
    ("image/jp2", &["jp2", "jpg2"]),
    ("image/png", &["png"]),
    ("image/avif", &["avif"]),
    ("image/svg+xml", &["svg", "svgz"]),
    ("image/tiff", &["tif", "tiff"]),
    ("image/vnd.adobe.photoshop", &["psd"]),
    ("image/vnd.microsoft.icon", &["ico"]),
    ("image/webp", &["webp"]),
    ("text/csv", &["csv"]),
    ("text/html", &["html", "htm"]),
    ("text/plain", &["txt", "text", "conf", "def", "list", "log", "in"]),
    ("text/xml", &["xml"]),
    ("video/mp4", &["mp4", "mp4v", "mpg4"]),
    ("video/mpeg", &["mpeg", "mpg", "mpe", "m1v", "m2v"]),
    ("video/ogg", &["ogv"]),
    ("video/quicktime", &["qt", "mov"]),
    ("video/webm", &["webm"]),
    ("video/x-flv", &["flv"]),
    ("video/x-m4v", &["m4v"]),
    ("video/x-matroska", &["mkv", "mk3d", "mks"]),
    ("video/x-msvideo", &["avi"]),
];

/// Media type → accepted extensions lookup table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaTypeExtensionMap {
    entries: HashMap<String, Vec<String>>,
}

impl MediaTypeExtensionMap {
    pub fn new(entries: HashMap<String, Vec<String>>) -> Self {
        Self { entries }
    }

    /// Load a map from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read media type map {}", path.display()))?;
        let map: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid media type map {}", path.display()))?;
        Ok(map)
    }

    /// Accepted extensions for a media type, canonical first.
    ///
    /// Types mapped to an empty list are treated as unmapped.
    pub fn extensions(&self, media_type: &str) -> Option<&[String]> {
        self.entries
            .get(media_type)
            .map(Vec::as_slice)
            .filter(|exts| !exts.is_empty())
    }

    pub fn canonical_extension(&self, media_type: &str) -> Option<&str> {
        self.extensions(media_type)
            .and_then(|exts| exts.first())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MediaTypeExtensionMap {
    fn default() -> Self {
        let entries = DEFAULT_ENTRIES
            .iter()
            .map(|(media_type, exts)| {
                (
                    media_type.to_string(),
                    exts.iter().map(|e| e.to_string()).collect(),
                )
            })
            .collect();
        Self { entries }
    }
}
