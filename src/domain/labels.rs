//! Label vocabulary loading.
//!
//! The vocabulary is read once at startup and shared read-only by every
//! request. Cloning a [`LabelVocabulary`] only bumps a reference count.

use crate::core::{ClassifierError, ClassifierResult, LABELS_FETCH_TIMEOUT, LabelSource};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Ordered class names, indexed `0..len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelVocabulary {
    labels: Arc<[String]>,
}

impl LabelVocabulary {
    /// Creates a vocabulary from an ordered list of labels.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `labels` is empty.
    pub fn new(labels: Vec<String>) -> ClassifierResult<Self> {
        if labels.is_empty() {
            return Err(ClassifierError::config_error(
                "label vocabulary must contain at least one label",
            ));
        }
        Ok(Self {
            labels: labels.into(),
        })
    }

    /// Parses one label per line.
    ///
    /// Interior blank lines are kept so indices stay aligned with the model
    /// output; trailing blank lines are dropped.
    pub fn from_text(text: &str) -> ClassifierResult<Self> {
        let mut labels: Vec<String> = text.lines().map(str::to_string).collect();
        while labels.last().is_some_and(|l| l.trim().is_empty()) {
            labels.pop();
        }
        Self::new(labels)
    }

    /// Reads a label file from disk.
    pub fn from_file(path: &Path) -> ClassifierResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClassifierError::config_error(format!(
                "failed to read label vocabulary from '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_text(&content)
    }

    /// Downloads a label file over HTTP(S).
    pub async fn fetch(url: &str) -> ClassifierResult<Self> {
        Self::fetch_with_timeout(url, LABELS_FETCH_TIMEOUT).await
    }

    /// Downloads a label file, giving up once `timeout` has elapsed.
    pub async fn fetch_with_timeout(url: &str, timeout: Duration) -> ClassifierResult<Self> {
        let fetch_err = |e: reqwest::Error| {
            ClassifierError::config_error(format!(
                "failed to fetch label vocabulary from '{url}': {e}"
            ))
        };
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(fetch_err)?;
        let text = client
            .get(url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(fetch_err)?
            .text()
            .await
            .map_err(fetch_err)?;
        Self::from_text(&text)
    }

    /// Loads the vocabulary from its configured source.
    pub async fn load(source: &LabelSource) -> ClassifierResult<Self> {
        let vocabulary = match source {
            LabelSource::Path(path) => Self::from_file(path)?,
            LabelSource::Url(url) => Self::fetch(url).await?,
        };
        tracing::info!(labels = vocabulary.len(), source = ?source, "loaded label vocabulary");
        Ok(vocabulary)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_text_preserves_order() {
        let vocab = LabelVocabulary::from_text("tench\ngoldfish\r\ngreat white shark\n").unwrap();
        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.get(0), Some("tench"));
        assert_eq!(vocab.get(1), Some("goldfish"));
        assert_eq!(vocab.get(2), Some("great white shark"));
        assert_eq!(vocab.get(3), None);
    }

    #[test]
    fn test_from_text_keeps_interior_blank_lines() {
        let vocab = LabelVocabulary::from_text("a\n\nc\n\n\n").unwrap();
        assert_eq!(vocab.iter().collect::<Vec<_>>(), vec!["a", "", "c"]);
    }

    #[test]
    fn test_empty_vocabulary_is_rejected() {
        assert!(LabelVocabulary::from_text("").is_err());
        assert!(LabelVocabulary::from_text("\n\n").is_err());
        assert!(LabelVocabulary::new(Vec::new()).is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "cat").unwrap();
        writeln!(file, "dog").unwrap();

        let vocab = LabelVocabulary::from_file(file.path()).unwrap();
        assert_eq!(vocab.len(), 2);
        assert!(vocab.contains("dog"));
        assert!(!vocab.contains("bird"));

        let missing = LabelVocabulary::from_file(Path::new("/nonexistent/labels.txt"));
        assert!(missing.is_err());
    }

    #[tokio::test]
    async fn test_load_from_path_source() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "golden retriever").unwrap();
        let source = LabelSource::Path(file.path().to_path_buf());
        let vocab = LabelVocabulary::load(&source).await.unwrap();
        assert_eq!(vocab.get(0), Some("golden retriever"));
    }

    #[tokio::test]
    async fn test_fetch_gives_up_on_unresponsive_host() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/imagenet_classes.txt", listener.local_addr().unwrap());
        // Accept connections and never answer.
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let started = std::time::Instant::now();
        let err = LabelVocabulary::fetch_with_timeout(&url, Duration::from_millis(200))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::core::ErrorKind::Config);
        assert!(started.elapsed() < Duration::from_secs(10));
        server.abort();
    }

    #[test]
    fn test_clone_shares_storage() {
        let vocab = LabelVocabulary::from_text("a\nb").unwrap();
        let clone = vocab.clone();
        assert!(Arc::ptr_eq(&vocab.labels, &clone.labels));
    }
}
