//! Content store: fetches the content document once and shares it across renders.

use std::{sync::Arc, time::Instant};

use async_trait::async_trait;
use metrics::{counter, histogram};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::domain::{content::ContentDocument, gallery::GalleryList};

const METRIC_CONTENT_LOADS: &str = "folio_content_loads_total";
const METRIC_CONTENT_LOAD_MS: &str = "folio_content_load_ms";

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read `{location}`: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{location}` responded with HTTP {status}")]
    Status { location: String, status: u16 },
    #[error("failed to fetch `{location}`: {message}")]
    Transport { location: String, message: String },
    #[error("`{location}` is not a valid content document: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Where the raw content document comes from.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Human-readable location, used in diagnostics.
    fn location(&self) -> String;

    async fn fetch(&self) -> Result<Vec<u8>, ContentError>;
}

/// Holds the parsed content document for the life of the process.
///
/// A successful load is kept; a failed load leaves the slot empty so the
/// next caller retries.
pub struct ContentStore {
    source: Option<Arc<dyn ContentSource>>,
    slot: RwLock<Option<Arc<ContentDocument>>>,
}

impl ContentStore {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self {
            source: Some(source),
            slot: RwLock::new(None),
        }
    }

    /// A store preloaded with a document and no backing source.
    pub fn from_document(document: ContentDocument) -> Self {
        Self {
            source: None,
            slot: RwLock::new(Some(Arc::new(document))),
        }
    }

    pub async fn load(&self) -> Result<Arc<ContentDocument>, ContentError> {
        if let Some(document) = self.slot.read().await.as_ref() {
            return Ok(document.clone());
        }

        let mut slot = self.slot.write().await;
        // Another request may have finished loading while we waited.
        if let Some(document) = slot.as_ref() {
            return Ok(document.clone());
        }

        let Some(source) = self.source.as_ref() else {
            return Err(ContentError::Transport {
                location: "<none>".to_string(),
                message: "no content source configured".to_string(),
            });
        };

        let started = Instant::now();
        let location = source.location();
        let outcome = source.fetch().await.and_then(|bytes| {
            ContentDocument::from_slice(&bytes).map_err(|source| ContentError::Parse {
                location: location.clone(),
                source,
            })
        });
        histogram!(METRIC_CONTENT_LOAD_MS).record(started.elapsed().as_secs_f64() * 1000.0);

        match outcome {
            Ok(document) => {
                counter!(METRIC_CONTENT_LOADS, "outcome" => "ok").increment(1);
                info!(
                    target = "folio::content",
                    location = %location,
                    "content document loaded"
                );
                let document = Arc::new(document);
                *slot = Some(document.clone());
                Ok(document)
            }
            Err(err) => {
                counter!(METRIC_CONTENT_LOADS, "outcome" => "error").increment(1);
                warn!(
                    target = "folio::content",
                    location = %location,
                    error = %err,
                    "content document failed to load"
                );
                Err(err)
            }
        }
    }
}

/// Counts reported by `folio check`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentSummary {
    pub social_links: usize,
    pub experiences: usize,
    pub institutions: usize,
    pub skills: usize,
    pub articles: usize,
    /// Displayable gallery images after normalization.
    pub gallery_images: usize,
    /// Raw gallery entries dropped during normalization.
    pub gallery_skipped: usize,
    pub has_contact: bool,
}

impl ContentSummary {
    pub fn of(document: &ContentDocument) -> Self {
        let about = document.about.as_ref();
        let gallery_entries = document.gallery.as_deref().unwrap_or_default();
        let gallery_images = GalleryList::from_entries(gallery_entries).len();

        Self {
            social_links: document.social.as_ref().map_or(0, Vec::len),
            experiences: about
                .and_then(|about| about.work.as_ref())
                .map_or(0, |work| work.experiences.len()),
            institutions: about
                .and_then(|about| about.education.as_ref())
                .map_or(0, |education| education.institutions.len()),
            skills: about
                .and_then(|about| about.skills.as_ref())
                .map_or(0, |skills| skills.items.len()),
            articles: document.articles.as_ref().map_or(0, Vec::len),
            gallery_images,
            gallery_skipped: gallery_entries.len().saturating_sub(gallery_images),
            has_contact: document.contact.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct FlakySource {
        calls: AtomicUsize,
        fail_first: usize,
    }

    #[async_trait]
    impl ContentSource for FlakySource {
        fn location(&self) -> String {
            "memory://flaky".to_string()
        }

        async fn fetch(&self) -> Result<Vec<u8>, ContentError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.fail_first {
                return Err(ContentError::Status {
                    location: self.location(),
                    status: 404,
                });
            }
            Ok(br#"{"home": {"headline": "Hello"}}"#.to_vec())
        }
    }

    #[tokio::test]
    async fn failed_load_is_retried_and_success_is_kept() {
        let source = Arc::new(FlakySource {
            calls: AtomicUsize::new(0),
            fail_first: 1,
        });
        let store = ContentStore::new(source.clone());

        assert!(matches!(
            store.load().await,
            Err(ContentError::Status { status: 404, .. })
        ));

        let document = store.load().await.expect("second load succeeds");
        assert_eq!(
            document.home.as_ref().and_then(|home| home.headline.as_deref()),
            Some("Hello")
        );

        store.load().await.expect("cached");
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalid_json_is_a_parse_error() {
        struct Garbage;

        #[async_trait]
        impl ContentSource for Garbage {
            fn location(&self) -> String {
                "memory://garbage".to_string()
            }

            async fn fetch(&self) -> Result<Vec<u8>, ContentError> {
                Ok(b"{not json".to_vec())
            }
        }

        let store = ContentStore::new(Arc::new(Garbage));
        let err = store.load().await.expect_err("parse failure");
        assert!(matches!(err, ContentError::Parse { .. }));
        assert!(err.to_string().contains("memory://garbage"));
    }

    #[tokio::test]
    async fn preloaded_store_never_fetches() {
        let store = ContentStore::from_document(ContentDocument::default());
        assert!(store.load().await.is_ok());
    }

    #[test]
    fn summary_counts_normalized_gallery() {
        let document = ContentDocument::from_slice(
            br#"{"gallery": ["a.jpg", " ", "b.jpg"], "articles": [{}, {}], "contact": {}}"#,
        )
        .expect("valid json");
        let summary = ContentSummary::of(&document);
        assert_eq!(summary.gallery_images, 2);
        assert_eq!(summary.gallery_skipped, 1);
        assert_eq!(summary.articles, 2);
        assert!(summary.has_contact);
        assert_eq!(summary.experiences, 0);
    }
}
