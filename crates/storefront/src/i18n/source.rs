//! Where translation trees come from.
//!
//! - [`StaticSource`] - trees held in memory
//! - [`DirectorySource`] - `<dir>/<code>.json` files
//! - [`HttpSource`] - `<base>/<code>.json` over HTTP, cached for 5 minutes
//! - [`ConfiguredSource`] - one of the above, chosen at startup

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bistro_core::LanguageCode;
use moka::future::Cache;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use super::tree::TranslationTree;

/// Errors that can occur while fetching a translation tree.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("translation server returned {status} for '{language}'")]
    Status {
        language: LanguageCode,
        status: reqwest::StatusCode,
    },

    /// Translation file could not be read.
    #[error("cannot read translations for '{language}': {source}")]
    Io {
        language: LanguageCode,
        source: std::io::Error,
    },

    /// Content is not valid JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Content is JSON but not an object.
    #[error("translations for '{0}' are not a JSON object")]
    NotAnObject(LanguageCode),

    /// The source has nothing for this language.
    #[error("no translations available for '{0}'")]
    Missing(LanguageCode),

    /// The translation URL could not be built.
    #[error("invalid translation URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Supplies the translation tree for a language.
pub trait TranslationSource: Send + Sync {
    /// Fetch the whole tree for `language`.
    fn fetch(
        &self,
        language: LanguageCode,
    ) -> impl Future<Output = Result<TranslationTree, SourceError>> + Send;
}

fn parse_tree(language: LanguageCode, raw: &str) -> Result<TranslationTree, SourceError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    TranslationTree::from_value(value).ok_or(SourceError::NotAnObject(language))
}

// =============================================================================
// StaticSource
// =============================================================================

/// Trees supplied up front.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    trees: HashMap<LanguageCode, TranslationTree>,
}

impl StaticSource {
    /// A source with no languages.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the tree for `language`.
    #[must_use]
    pub fn with(mut self, language: LanguageCode, tree: TranslationTree) -> Self {
        self.trees.insert(language, tree);
        self
    }

    /// Add the tree for `language` from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not a JSON object.
    pub fn with_json(self, language: LanguageCode, raw: &str) -> Result<Self, SourceError> {
        let tree = parse_tree(language, raw)?;
        Ok(self.with(language, tree))
    }
}

impl TranslationSource for StaticSource {
    async fn fetch(&self, language: LanguageCode) -> Result<TranslationTree, SourceError> {
        self.trees
            .get(&language)
            .cloned()
            .ok_or(SourceError::Missing(language))
    }
}

// =============================================================================
// DirectorySource
// =============================================================================

/// Reads `<dir>/<code>.json`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    /// Read translation files from `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, language: LanguageCode) -> PathBuf {
        self.dir.join(format!("{}.json", language.code()))
    }
}

impl TranslationSource for DirectorySource {
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    async fn fetch(&self, language: LanguageCode) -> Result<TranslationTree, SourceError> {
        let path = self.path_for(language);
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| SourceError::Io { language, source })?;
        debug!(path = %path.display(), "Read translation file");
        parse_tree(language, &raw)
    }
}

// =============================================================================
// HttpSource
// =============================================================================

/// Fetches `<base>/<code>.json`.
///
/// Trees are cached for 5 minutes.
#[derive(Clone)]
pub struct HttpSource {
    inner: Arc<HttpSourceInner>,
}

struct HttpSourceInner {
    client: reqwest::Client,
    base: Url,
    cache: Cache<LanguageCode, TranslationTree>,
}

impl HttpSource {
    /// Create a source rooted at `base`.
    #[must_use]
    pub fn new(client: reqwest::Client, mut base: Url) -> Self {
        // Url::join replaces the last segment unless the path ends in '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let cache = Cache::builder()
            .max_capacity(LanguageCode::ALL.len() as u64)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(HttpSourceInner {
                client,
                base,
                cache,
            }),
        }
    }

    /// URL of the tree for `language`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built.
    pub fn url_for(&self, language: LanguageCode) -> Result<Url, SourceError> {
        Ok(self.inner.base.join(&format!("{}.json", language.code()))?)
    }
}

impl TranslationSource for HttpSource {
    #[instrument(skip(self))]
    async fn fetch(&self, language: LanguageCode) -> Result<TranslationTree, SourceError> {
        if let Some(tree) = self.inner.cache.get(&language).await {
            debug!("Translation cache hit");
            return Ok(tree);
        }

        let url = self.url_for(language)?;
        let response = self.inner.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status { language, status });
        }

        let raw = response.text().await?;
        let tree = parse_tree(language, &raw)?;
        self.inner.cache.insert(language, tree.clone()).await;
        Ok(tree)
    }
}

// =============================================================================
// ConfiguredSource
// =============================================================================

/// The source selected by configuration.
#[derive(Clone)]
pub enum ConfiguredSource {
    Static(StaticSource),
    Directory(DirectorySource),
    Http(HttpSource),
}

impl TranslationSource for ConfiguredSource {
    async fn fetch(&self, language: LanguageCode) -> Result<TranslationTree, SourceError> {
        match self {
            Self::Static(source) => source.fetch(language).await,
            Self::Directory(source) => source.fetch(language).await,
            Self::Http(source) => source.fetch(language).await,
        }
    }
}
