//! Thumbnail selection and upload state
//!
//! A thumbnail goes through select → upload → attach. This module holds
//! the pieces that do not need the transport: file loading, selection
//! checks, the pending-file slot and the progress channel. The editor
//! drives the actual upload.

use shared::models::{ProgressFn, UploadReceipt, UploadStatus};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;

use crate::config::UploadConfig;
use crate::error::UploadError;

/// A file picked for upload
#[derive(Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub name: String,
    /// Declared media type, e.g. `image/png`
    pub content_type: String,
    pub data: Vec<u8>,
}

impl MediaFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    /// Read a file from disk, guessing its media type from the extension
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        Ok(Self::new(name, content_type, data))
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

impl std::fmt::Debug for MediaFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.data.len())
            .finish()
    }
}

/// Check a selected file against the upload limits
pub fn validate_selection(file: &MediaFile, config: &UploadConfig) -> Result<(), UploadError> {
    if !file.is_image() {
        return Err(UploadError::UnsupportedMediaType(file.content_type.clone()));
    }
    if file.size() > config.max_bytes {
        return Err(UploadError::FileTooLarge {
            size: file.size(),
            max: config.max_bytes,
        });
    }
    Ok(())
}

/// Reference to attach from an upload receipt
pub fn resolve_receipt(receipt: UploadReceipt) -> Result<String, UploadError> {
    match receipt.status {
        UploadStatus::Failed(reason) => Err(UploadError::Rejected(reason)),
        UploadStatus::Success => receipt
            .references
            .into_iter()
            .next()
            .ok_or(UploadError::MissingReference),
    }
}

/// Where the thumbnail sub-workflow currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    Selected,
    Uploading,
}

/// Pending file slot and count of uploads in flight
///
/// A new upload may start while another is running, so the phase stays
/// `Uploading` until every started upload has finished.
#[derive(Debug, Default)]
pub struct UploadState {
    pending: Option<Arc<MediaFile>>,
    in_flight: usize,
}

impl UploadState {
    pub fn phase(&self) -> UploadPhase {
        match (&self.pending, self.in_flight) {
            (_, n) if n > 0 => UploadPhase::Uploading,
            (Some(_), _) => UploadPhase::Selected,
            (None, _) => UploadPhase::Idle,
        }
    }

    pub fn pending(&self) -> Option<&Arc<MediaFile>> {
        self.pending.as_ref()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Store an accepted file, replacing any previous selection
    pub fn select(&mut self, file: MediaFile) {
        self.pending = Some(Arc::new(file));
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }

    /// Count a new upload of the pending file and hand the file out
    pub fn begin(&mut self) -> Result<Arc<MediaFile>, UploadError> {
        let file = self.pending.clone().ok_or(UploadError::NoFileSelected)?;
        self.in_flight += 1;
        Ok(file)
    }

    /// Finish one upload; returns whether none are left in flight
    ///
    /// On success the pending file is dropped if it is still the one that
    /// was uploaded; on failure it is dropped unless `retain` is set.
    pub fn finish(&mut self, uploaded: &Arc<MediaFile>, success: bool, retain: bool) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        let same = self
            .pending
            .as_ref()
            .is_some_and(|p| Arc::ptr_eq(p, uploaded));
        if same && (success || !retain) {
            self.pending = None;
        }
        self.in_flight == 0
    }
}

/// Upload progress, published on a watch channel
///
/// Values are clamped to 100 and only ever increase until [`reset`];
/// reporting the current value again does not notify observers.
///
/// [`reset`]: ProgressTracker::reset
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    tx: Arc<watch::Sender<u8>>,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> u8 {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u8> {
        self.tx.subscribe()
    }

    /// Publish `value`; returns whether observers were notified
    pub fn report(&self, value: u8) -> bool {
        let value = value.min(100);
        self.tx.send_if_modified(|current| {
            if value > *current {
                *current = value;
                true
            } else {
                false
            }
        })
    }

    pub fn reset(&self) {
        self.tx.send_replace(0);
    }

    /// Callback form for transports
    pub fn callback(&self) -> ProgressFn {
        let tracker = self.clone();
        Arc::new(move |value| {
            tracker.report(value);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn png(size: usize) -> MediaFile {
        MediaFile::new("a.png", "image/png", vec![0; size])
    }

    #[test]
    fn test_validate_selection() {
        let config = UploadConfig::default();
        assert!(validate_selection(&png(10), &config).is_ok());
        assert!(validate_selection(&png(5 * 1024 * 1024), &config).is_ok());

        let err = validate_selection(&png(6 * 1024 * 1024), &config).unwrap_err();
        assert!(matches!(err, UploadError::FileTooLarge { size, .. } if size == 6 * 1024 * 1024));

        let pdf = MediaFile::new("a.pdf", "application/pdf", vec![1]);
        assert!(matches!(
            validate_selection(&pdf, &config),
            Err(UploadError::UnsupportedMediaType(t)) if t == "application/pdf"
        ));
    }

    #[test]
    fn test_resolve_receipt() {
        assert_eq!(
            resolve_receipt(UploadReceipt::success(vec!["x".into(), "y".into()])).unwrap(),
            "x"
        );
        assert!(matches!(
            resolve_receipt(UploadReceipt::success(vec![])),
            Err(UploadError::MissingReference)
        ));
        assert!(matches!(
            resolve_receipt(UploadReceipt::failed("quota")),
            Err(UploadError::Rejected(r)) if r == "quota"
        ));
    }

    #[test]
    fn test_upload_state_phases() {
        let mut state = UploadState::default();
        assert_eq!(state.phase(), UploadPhase::Idle);
        assert!(matches!(state.begin(), Err(UploadError::NoFileSelected)));

        state.select(png(1));
        assert_eq!(state.phase(), UploadPhase::Selected);

        let file = state.begin().unwrap();
        assert_eq!(state.phase(), UploadPhase::Uploading);

        assert!(state.finish(&file, true, true));
        assert_eq!(state.phase(), UploadPhase::Idle);
    }

    #[test]
    fn test_overlapping_uploads_stay_uploading() {
        let mut state = UploadState::default();
        state.select(png(1));
        let first = state.begin().unwrap();
        let second = state.begin().unwrap();
        assert_eq!(state.in_flight(), 2);

        assert!(!state.finish(&first, true, true));
        assert_eq!(state.phase(), UploadPhase::Uploading);
        assert!(!state.has_pending());

        assert!(state.finish(&second, true, true));
        assert_eq!(state.phase(), UploadPhase::Idle);
    }

    #[test]
    fn test_failed_upload_retention() {
        let mut state = UploadState::default();
        state.select(png(1));
        let file = state.begin().unwrap();
        state.finish(&file, false, true);
        assert!(state.has_pending());

        let file = state.begin().unwrap();
        state.finish(&file, false, false);
        assert!(!state.has_pending());
    }

    #[test]
    fn test_reselect_during_upload_is_kept() {
        let mut state = UploadState::default();
        state.select(png(1));
        let first = state.begin().unwrap();
        state.select(png(2));
        state.finish(&first, true, true);
        assert_eq!(state.pending().map(|f| f.size()), Some(2));
    }

    #[test]
    fn test_progress_tracker() {
        let tracker = ProgressTracker::new();
        let mut rx = tracker.subscribe();

        assert!(tracker.report(40));
        assert!(rx.has_changed().unwrap());
        let _ = rx.borrow_and_update();

        // Repeats and regressions are ignored
        assert!(!tracker.report(40));
        assert!(!tracker.report(10));
        assert!(!rx.has_changed().unwrap());
        assert_eq!(tracker.current(), 40);

        assert!(tracker.report(250));
        assert_eq!(tracker.current(), 100);

        tracker.reset();
        assert_eq!(tracker.current(), 0);
    }

    #[test]
    fn test_progress_callback() {
        let tracker = ProgressTracker::new();
        let callback = tracker.callback();
        callback(30);
        callback(30);
        callback(70);
        assert_eq!(tracker.current(), 70);
    }

    #[tokio::test]
    async fn test_from_path_guesses_type() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(&[1, 2, 3]).unwrap();

        let media = MediaFile::from_path(file.path()).await.unwrap();
        assert_eq!(media.content_type, "image/png");
        assert_eq!(media.size(), 3);
        assert!(media.name.ends_with(".png"));
        assert!(media.is_image());
    }

    #[tokio::test]
    async fn test_from_path_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".zzz").tempfile().unwrap();
        let media = MediaFile::from_path(file.path()).await.unwrap();
        assert_eq!(media.content_type, "application/octet-stream");
        assert!(!media.is_image());
    }
}
