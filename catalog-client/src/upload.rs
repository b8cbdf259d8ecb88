//! Progress-reporting multipart bodies
//!
//! reqwest has no upload progress hook, so the file part is built from a
//! chunked stream; every chunk handed to the connection advances the
//! reported percentage.

use futures::Stream;
use reqwest::multipart::{Form, Part};
use shared::models::{ProgressFn, UPLOAD_FIELD};

use crate::{ClientError, ClientResult};

/// Percentage of `sent` over `total`, floored and capped at 100
pub fn percent(sent: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((sent as u128 * 100) / total as u128).min(100) as u8
}

/// Split `data` into a stream of chunks, reporting progress as each is pulled
pub fn progress_stream(
    data: Vec<u8>,
    chunk_size: usize,
    progress: ProgressFn,
) -> impl Stream<Item = Result<Vec<u8>, std::io::Error>> + Send + Sync + 'static {
    let total = data.len();
    let chunks: Vec<Vec<u8>> = data
        .chunks(chunk_size.max(1))
        .map(<[u8]>::to_vec)
        .collect();
    let mut sent = 0usize;

    futures::stream::iter(chunks.into_iter().map(move |chunk| {
        sent += chunk.len();
        progress(percent(sent, total));
        Ok(chunk)
    }))
}

/// Build the multipart form carrying one file under [`UPLOAD_FIELD`]
pub fn media_form(
    file_name: &str,
    content_type: &str,
    data: Vec<u8>,
    chunk_size: usize,
    progress: ProgressFn,
) -> ClientResult<Form> {
    let length = data.len() as u64;
    let body = reqwest::Body::wrap_stream(progress_stream(data, chunk_size, progress));
    let part = Part::stream_with_length(body, length)
        .file_name(file_name.to_string())
        .mime_str(content_type)
        .map_err(|e| ClientError::Validation(format!("invalid content type: {}", e)))?;

    Ok(Form::new().part(UPLOAD_FIELD, part))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_percent() {
        assert_eq!(percent(0, 10), 0);
        assert_eq!(percent(5, 10), 50);
        assert_eq!(percent(10, 10), 100);
        assert_eq!(percent(11, 10), 100);
        assert_eq!(percent(0, 0), 100);
        assert_eq!(percent(1, 3), 33);
    }

    #[tokio::test]
    async fn test_progress_stream_reports_monotonic_values() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let progress: ProgressFn = Arc::new(move |p| sink.lock().unwrap().push(p));

        let chunks: Vec<_> = progress_stream(vec![0u8; 10], 4, progress)
            .collect::<Vec<_>>()
            .await;

        assert_eq!(chunks.len(), 3);
        let total: usize = chunks.iter().map(|c| c.as_ref().unwrap().len()).sum();
        assert_eq!(total, 10);
        assert_eq!(*seen.lock().unwrap(), vec![40, 80, 100]);
    }

    #[tokio::test]
    async fn test_progress_is_lazy() {
        let calls = Arc::new(Mutex::new(0));
        let counter = calls.clone();
        let progress: ProgressFn = Arc::new(move |_| *counter.lock().unwrap() += 1);

        let stream = progress_stream(vec![1u8; 8], 8, progress);
        assert_eq!(*calls.lock().unwrap(), 0);
        drop(stream);
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_media_form_rejects_bad_mime() {
        let progress: ProgressFn = Arc::new(|_| {});
        let result = media_form("a.png", "not a mime", vec![1, 2, 3], 2, progress);
        assert!(matches!(result, Err(ClientError::Validation(_))));
    }
}
