use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use curio_core::MediaTypeExtensionMap;
use curio_media::{FileServices, MediaError, StorableFile, ThumbnailManager};
use curio_storage::{FileStore, LocalFileStore};

const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];

/// Records every thumbnail request
#[derive(Default)]
struct RecordingThumbnails {
    calls: Mutex<Vec<(PathBuf, String)>>,
}

#[async_trait]
impl ThumbnailManager for RecordingThumbnails {
    async fn create(&self, source: &Path, storage_base_name: &str) -> bool {
        self.calls
            .lock()
            .unwrap()
            .push((source.to_path_buf(), storage_base_name.to_string()));
        true
    }
}

struct Harness {
    _dir: tempfile::TempDir,
    temp_dir: PathBuf,
    store: Arc<LocalFileStore>,
    thumbnails: Arc<RecordingThumbnails>,
    media_types: Arc<MediaTypeExtensionMap>,
}

impl Harness {
    async fn new(media_types: MediaTypeExtensionMap) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let temp_dir = dir.path().join("tmp");
        std::fs::create_dir_all(&temp_dir).unwrap();
        let store = LocalFileStore::new(dir.path().join("files"), "/files".to_string())
            .await
            .unwrap();

        Self {
            temp_dir,
            store: Arc::new(store),
            thumbnails: Arc::new(RecordingThumbnails::default()),
            media_types: Arc::new(media_types),
            _dir: dir,
        }
    }

    fn file(&self) -> StorableFile {
        let services = FileServices {
            store: self.store.clone(),
            thumbnails: self.thumbnails.clone(),
            media_types: self.media_types.clone(),
        };
        StorableFile::new(services, &self.temp_dir)
    }
}

fn jpeg_only_map() -> MediaTypeExtensionMap {
    let mut entries = HashMap::new();
    entries.insert(
        "image/jpeg".to_string(),
        vec!["jpg".to_string(), "jpeg".to_string()],
    );
    MediaTypeExtensionMap::new(entries)
}

#[tokio::test]
async fn jpeg_named_png_is_stored_with_canonical_extension() {
    let harness = Harness::new(jpeg_only_map()).await;
    let mut file = harness.file();
    file.write_bytes(JPEG_HEADER).await.unwrap();

    assert_eq!(file.media_type().await.unwrap(), "image/jpeg");
    let storage_path = file.store_original("photo.png").await.unwrap();

    let base = file.storage_base_name();
    assert_eq!(storage_path, format!("original/{}.jpg", base));
    assert!(harness.store.exists(&storage_path).await.unwrap());
}

#[tokio::test]
async fn octet_stream_keeps_original_extension() {
    let harness = Harness::new(MediaTypeExtensionMap::default()).await;
    let mut file = harness.file();
    file.write_bytes(&[0x00, 0x01, 0x02, 0xFE, 0xFF]).await.unwrap();

    assert_eq!(file.media_type().await.unwrap(), "application/octet-stream");
    assert_eq!(file.extension("data.xyz").await.unwrap().as_deref(), Some("xyz"));
}

#[tokio::test]
async fn unmapped_media_type_keeps_original_extension() {
    let harness = Harness::new(jpeg_only_map()).await;
    let mut file = harness.file();
    file.write_bytes(b"meeting notes\n").await.unwrap();

    assert_eq!(file.media_type().await.unwrap(), "text/plain");
    let storage_path = file.store_original("notes.txt").await.unwrap();
    assert!(storage_path.ends_with(".txt"));
}

#[tokio::test]
async fn extension_is_computed_once() {
    let harness = Harness::new(jpeg_only_map()).await;
    let mut file = harness.file();
    file.write_bytes(JPEG_HEADER).await.unwrap();

    assert_eq!(file.extension("a.jpeg").await.unwrap().as_deref(), Some("jpeg"));
    assert_eq!(file.extension("b.gif").await.unwrap().as_deref(), Some("jpeg"));
}

#[tokio::test]
async fn thumbnails_share_the_storage_identifier() {
    let harness = Harness::new(jpeg_only_map()).await;
    let mut file = harness.file();
    let source = harness.temp_dir.join("upload.jpg");
    std::fs::write(&source, JPEG_HEADER).unwrap();
    file.copy_from(&source).await.unwrap();

    let storage_path = file.store_original("upload.jpg").await.unwrap();
    assert!(file.store_thumbnails().await.unwrap());

    let calls = harness.thumbnails.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (thumb_source, base_name) = &calls[0];
    assert_eq!(thumb_source.as_path(), file.temp_path().unwrap());
    assert_eq!(storage_path, format!("original/{}.jpg", base_name));
}

#[tokio::test]
async fn delete_without_temp_file_succeeds() {
    let harness = Harness::new(jpeg_only_map()).await;
    let mut file = harness.file();

    assert!(file.delete().is_ok());
    assert!(!file.has_temp_file());
}

#[tokio::test]
async fn delete_is_idempotent() {
    let harness = Harness::new(jpeg_only_map()).await;
    let mut file = harness.file();
    file.write_bytes(b"x").await.unwrap();
    let path = file.temp_path().unwrap().to_path_buf();

    file.delete().unwrap();
    assert!(!path.exists());
    assert!(file.delete().is_ok());
}

#[tokio::test]
async fn delete_tolerates_externally_removed_file() {
    let harness = Harness::new(jpeg_only_map()).await;
    let mut file = harness.file();
    let path = file.temp_path().unwrap().to_path_buf();
    std::fs::remove_file(&path).unwrap();

    assert!(file.delete().is_ok());
}

#[tokio::test]
async fn stored_original_survives_temp_cleanup() {
    let harness = Harness::new(jpeg_only_map()).await;
    let mut file = harness.file();
    file.write_bytes(JPEG_HEADER).await.unwrap();
    let storage_path = file.store_original("photo.jpg").await.unwrap();

    file.delete().unwrap();

    let stored = std::fs::read(harness.store.base_path().join(&storage_path)).unwrap();
    assert_eq!(stored, JPEG_HEADER);
}

#[tokio::test]
async fn uppercase_extension_is_replaced_by_canonical_one() {
    let harness = Harness::new(jpeg_only_map()).await;
    let mut file = harness.file();
    file.write_bytes(JPEG_HEADER).await.unwrap();

    let storage_path = file.store_original("photo.JPG").await.unwrap();
    assert!(storage_path.ends_with(".jpg"), "{storage_path}");
}

#[tokio::test]
async fn store_after_delete_is_rejected() {
    let harness = Harness::new(jpeg_only_map()).await;
    let mut file = harness.file();
    file.write_bytes(JPEG_HEADER).await.unwrap();
    assert_eq!(file.media_type().await.unwrap(), "image/jpeg");

    file.delete().unwrap();

    assert!(matches!(
        file.store_original("photo.jpg").await,
        Err(MediaError::Discarded)
    ));
    assert!(matches!(
        file.store_thumbnails().await,
        Err(MediaError::Discarded)
    ));
    assert!(matches!(file.temp_path(), Err(MediaError::Discarded)));
    assert!(!file.has_temp_file());
    assert!(!harness.store.base_path().join("original").exists());
    assert!(harness.thumbnails.calls.lock().unwrap().is_empty());

    assert!(file.delete().is_ok());
}

#[tokio::test]
async fn refilling_redetects_media_type_and_extension() {
    let harness = Harness::new(jpeg_only_map()).await;
    let mut file = harness.file();

    assert_eq!(file.media_type().await.unwrap(), "application/x-empty");
    assert_eq!(file.extension("photo.png").await.unwrap().as_deref(), Some("png"));

    file.write_bytes(JPEG_HEADER).await.unwrap();

    assert_eq!(file.media_type().await.unwrap(), "image/jpeg");
    assert_eq!(file.extension("photo.png").await.unwrap().as_deref(), Some("jpg"));
}
