//! Internationalization.
//!
//! [`I18n`] owns the active language and its [`TranslationTree`]. Display
//! strings are looked up by dotted key (`cart.title`) and `{{name}}`
//! placeholders are filled from caller-supplied variables. Missing keys never
//! fail: the key itself is returned so the UI still shows something.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized -> Loading -> Ready { language, degraded }
//!                     ^             |
//!                     +-------------+  set_language
//! ```
//!
//! A resolver is degraded when neither the requested nor the default
//! language could be loaded. It then translates every key to itself.

mod source;
mod tree;

pub use source::{
    ConfiguredSource, DirectorySource, HttpSource, SourceError, StaticSource, TranslationSource,
};
pub use tree::{TranslationTree, interpolate};

use bistro_core::{LanguageCode, LanguageError};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, error, info, instrument, warn};

use crate::storage::{KeyValueStore, Persistence, keys};

/// Capacity of the language change channel.
const EVENT_CAPACITY: usize = 16;

/// Errors from language changes.
#[derive(Debug, Error)]
pub enum I18nError {
    /// The requested code is not on the allow-list.
    #[error(transparent)]
    Language(#[from] LanguageError),

    /// The translations for the requested language could not be loaded.
    #[error("failed to load translations for '{language}': {source}")]
    Load {
        language: LanguageCode,
        #[source]
        source: SourceError,
    },
}

/// Where the resolver is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolverState {
    #[default]
    Uninitialized,
    /// A tree is being fetched for this language.
    Loading(LanguageCode),
    /// A tree is active. `degraded` means it is empty because loading failed.
    Ready {
        language: LanguageCode,
        degraded: bool,
    },
}

/// A UI element whose text follows the active language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub target: String,
    pub key: String,
}

/// A binding rendered in the active language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBinding {
    pub target: String,
    pub text: String,
}

/// Outcome of a successful language change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageUpdate {
    pub language: LanguageCode,
    pub persistence: Persistence,
    pub bindings: Vec<RenderedBinding>,
}

/// Notifications published by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I18nEvent {
    LanguageChanged {
        language: LanguageCode,
        bindings: Vec<RenderedBinding>,
    },
}

/// Translation resolver bound to a store and a translation source.
pub struct I18n<S, T> {
    store: S,
    source: T,
    state: ResolverState,
    tree: TranslationTree,
    bindings: Vec<Binding>,
    events: broadcast::Sender<I18nEvent>,
}

impl<S: KeyValueStore, T: TranslationSource> I18n<S, T> {
    /// Create an uninitialized resolver. Call [`init`](Self::init) before use.
    #[must_use]
    pub fn new(store: S, source: T) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            source,
            state: ResolverState::Uninitialized,
            tree: TranslationTree::empty(),
            bindings: Vec::new(),
            events,
        }
    }

    /// Load the persisted language, or the default one.
    ///
    /// An absent or unsupported stored code silently selects the default.
    #[instrument(skip(self))]
    pub async fn init(&mut self) -> ResolverState {
        let language = self.stored_preference();
        debug!(%language, "Initializing translations");
        self.load_translation_tree(language).await
    }

    /// Fetch and activate the tree for `language`.
    ///
    /// On failure the default language is tried; if that fails too the
    /// resolver becomes degraded with an empty tree.
    #[instrument(skip(self))]
    pub async fn load_translation_tree(&mut self, language: LanguageCode) -> ResolverState {
        self.state = ResolverState::Loading(language);

        let (language, tree) = match self.source.fetch(language).await {
            Ok(tree) => (language, Some(tree)),
            Err(e) if language.is_default() => {
                error!(%language, error = %e, "Failed to load default translations");
                (language, None)
            }
            Err(e) => {
                let fallback = LanguageCode::default();
                warn!(%language, %fallback, error = %e, "Failed to load translations, falling back");
                match self.source.fetch(fallback).await {
                    Ok(tree) => (fallback, Some(tree)),
                    Err(e) => {
                        error!(%fallback, error = %e, "Failed to load fallback translations");
                        (fallback, None)
                    }
                }
            }
        };

        let degraded = tree.is_none();
        if degraded {
            warn!(%language, "Translations unavailable, keys will be shown as-is");
        }
        self.tree = tree.unwrap_or_default();
        self.state = ResolverState::Ready { language, degraded };
        self.state
    }

    /// Switch the active language.
    ///
    /// The preference is persisted only after the new tree is active. Every
    /// binding is re-rendered and published in [`I18nEvent::LanguageChanged`].
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::Language`] for codes outside the allow-list and
    /// [`I18nError::Load`] if the tree cannot be fetched. In both cases the
    /// previous language and tree stay active.
    #[instrument(skip(self))]
    pub async fn set_language(&mut self, code: &str) -> Result<LanguageUpdate, I18nError> {
        let language: LanguageCode = code.parse().map_err(|e: LanguageError| {
            warn!(code, "Rejected unsupported language");
            e
        })?;

        let previous = self.state;
        self.state = ResolverState::Loading(language);

        let tree = match self.source.fetch(language).await {
            Ok(tree) => tree,
            Err(source) => {
                error!(%language, error = %source, "Failed to switch language");
                self.state = previous;
                return Err(I18nError::Load { language, source });
            }
        };

        self.tree = tree;
        self.state = ResolverState::Ready {
            language,
            degraded: false,
        };
        info!(%language, "Language changed");

        let persistence = self.persist_preference(language);
        let bindings = self.render_bindings();
        // No subscribers is fine.
        let _ = self.events.send(I18nEvent::LanguageChanged {
            language,
            bindings: bindings.clone(),
        });

        Ok(LanguageUpdate {
            language,
            persistence,
            bindings,
        })
    }

    /// Translate a key with no variables.
    #[must_use]
    pub fn translate(&self, key: &str) -> String {
        self.translate_with(key, &[])
    }

    /// Translate a key, filling `{{name}}` placeholders from `variables`.
    ///
    /// A missing key or a non-string value yields the key itself.
    #[must_use]
    pub fn translate_with(&self, key: &str, variables: &[(&str, &str)]) -> String {
        match self.tree.resolve(key) {
            Some(template) => interpolate(template, variables),
            None => {
                if self.is_degraded() {
                    debug!(key, "No translations loaded");
                } else {
                    warn!(key, language = %self.language(), "Missing translation");
                }
                key.to_owned()
            }
        }
    }

    /// The active language. The default before initialization.
    #[must_use]
    pub fn language(&self) -> LanguageCode {
        match self.state {
            ResolverState::Uninitialized => LanguageCode::default(),
            ResolverState::Loading(language) | ResolverState::Ready { language, .. } => language,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ResolverState {
        self.state
    }

    /// Whether every lookup falls back to the key.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self.state, ResolverState::Ready { degraded: true, .. })
    }

    /// Register a UI element to follow language changes and render it now.
    ///
    /// Binding the same target again replaces its key.
    pub fn bind(&mut self, target: impl Into<String>, key: impl Into<String>) -> RenderedBinding {
        let binding = Binding {
            target: target.into(),
            key: key.into(),
        };
        let rendered = self.render(&binding);

        if let Some(existing) = self.bindings.iter_mut().find(|b| b.target == binding.target) {
            *existing = binding;
        } else {
            self.bindings.push(binding);
        }
        rendered
    }

    /// Every binding rendered in the active language.
    #[must_use]
    pub fn bindings(&self) -> Vec<RenderedBinding> {
        self.render_bindings()
    }

    /// Subscribe to language changes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<I18nEvent> {
        self.events.subscribe()
    }

    fn render(&self, binding: &Binding) -> RenderedBinding {
        RenderedBinding {
            target: binding.target.clone(),
            text: self.translate(&binding.key),
        }
    }

    fn render_bindings(&self) -> Vec<RenderedBinding> {
        self.bindings.iter().map(|b| self.render(b)).collect()
    }

    fn stored_preference(&self) -> LanguageCode {
        match self.store.get(keys::LANGUAGE_PREFERENCE) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|_| {
                debug!(stored = %raw, "Ignoring unsupported stored language");
                LanguageCode::default()
            }),
            Ok(None) => LanguageCode::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read language preference");
                LanguageCode::default()
            }
        }
    }

    fn persist_preference(&self, language: LanguageCode) -> Persistence {
        let result = self.store.set(keys::LANGUAGE_PREFERENCE, language.code());
        if let Err(e) = &result {
            warn!(error = %e, "Failed to persist language preference");
        }
        Persistence::from(result)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::MemoryStore;

    fn source() -> StaticSource {
        StaticSource::new()
            .with_json(
                LanguageCode::De,
                r#"{"a": {"b": {"c": "X {{n}}"}}, "cart": {"title": "Warenkorb"}}"#,
            )
            .unwrap()
            .with_json(LanguageCode::En, r#"{"cart": {"title": "Cart"}}"#)
            .unwrap()
    }

    fn resolver(source: StaticSource) -> (I18n<Arc<MemoryStore>, StaticSource>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (I18n::new(Arc::clone(&store), source), store)
    }

    #[tokio::test]
    async fn test_init_defaults_to_primary_language() {
        let (mut i18n, _) = resolver(source());
        assert_eq!(i18n.state(), ResolverState::Uninitialized);

        let state = i18n.init().await;
        assert_eq!(
            state,
            ResolverState::Ready {
                language: LanguageCode::De,
                degraded: false
            }
        );
        assert_eq!(i18n.translate("cart.title"), "Warenkorb");
    }

    #[tokio::test]
    async fn test_init_uses_stored_preference() {
        let (mut i18n, store) = resolver(source());
        store.set(keys::LANGUAGE_PREFERENCE, "en").unwrap();
        i18n.init().await;
        assert_eq!(i18n.language(), LanguageCode::En);
        assert_eq!(i18n.translate("cart.title"), "Cart");
    }

    #[tokio::test]
    async fn test_init_ignores_invalid_stored_preference() {
        let (mut i18n, store) = resolver(source());
        store.set(keys::LANGUAGE_PREFERENCE, "klingon").unwrap();
        i18n.init().await;
        assert_eq!(i18n.language(), LanguageCode::De);
    }

    #[tokio::test]
    async fn test_init_falls_back_when_stored_language_fails() {
        let (mut i18n, store) = resolver(source());
        store.set(keys::LANGUAGE_PREFERENCE, "fr").unwrap();
        let state = i18n.init().await;
        assert_eq!(
            state,
            ResolverState::Ready {
                language: LanguageCode::De,
                degraded: false
            }
        );
    }

    #[tokio::test]
    async fn test_degraded_mode_returns_keys() {
        let (mut i18n, _) = resolver(StaticSource::new());
        i18n.init().await;
        assert!(i18n.is_degraded());
        assert_eq!(i18n.translate("cart.title"), "cart.title");
    }

    #[tokio::test]
    async fn test_translate() {
        let (mut i18n, _) = resolver(source());
        i18n.init().await;
        assert_eq!(i18n.translate_with("a.b.c", &[("n", "5")]), "X 5");
        assert_eq!(i18n.translate("a.b.c"), "X {{n}}");
        assert_eq!(i18n.translate("missing.key"), "missing.key");
        assert_eq!(i18n.translate("a.b"), "a.b");
    }

    #[tokio::test]
    async fn test_set_language_switches_and_persists() {
        let (mut i18n, store) = resolver(source());
        i18n.init().await;

        let update = i18n.set_language("en").await.unwrap();
        assert_eq!(update.language, LanguageCode::En);
        assert!(update.persistence.is_saved());
        assert_eq!(i18n.translate("cart.title"), "Cart");
        assert_eq!(
            store.get(keys::LANGUAGE_PREFERENCE).unwrap().as_deref(),
            Some("en")
        );
    }

    #[tokio::test]
    async fn test_set_language_rejects_unsupported_code() {
        let (mut i18n, store) = resolver(source());
        i18n.init().await;
        let before = i18n.state();

        let result = i18n.set_language("xx").await;
        assert!(matches!(result, Err(I18nError::Language(_))));
        assert_eq!(i18n.state(), before);
        assert_eq!(i18n.translate("cart.title"), "Warenkorb");
        assert!(store.get(keys::LANGUAGE_PREFERENCE).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_language_load_failure_keeps_previous_tree() {
        let (mut i18n, store) = resolver(source());
        i18n.init().await;
        i18n.set_language("en").await.unwrap();

        let result = i18n.set_language("fr").await;
        assert!(matches!(
            result,
            Err(I18nError::Load {
                language: LanguageCode::Fr,
                ..
            })
        ));
        assert_eq!(i18n.language(), LanguageCode::En);
        assert_eq!(i18n.translate("cart.title"), "Cart");
        assert_eq!(
            store.get(keys::LANGUAGE_PREFERENCE).unwrap().as_deref(),
            Some("en")
        );
    }

    #[tokio::test]
    async fn test_bindings_follow_language() {
        let (mut i18n, _) = resolver(source());
        i18n.init().await;
        let mut rx = i18n.subscribe();

        let rendered = i18n.bind("sidebar-title", "cart.title");
        assert_eq!(rendered.text, "Warenkorb");

        let update = i18n.set_language("en").await.unwrap();
        let expected = vec![RenderedBinding {
            target: "sidebar-title".to_string(),
            text: "Cart".to_string(),
        }];
        assert_eq!(update.bindings, expected);
        assert_eq!(
            rx.try_recv().unwrap(),
            I18nEvent::LanguageChanged {
                language: LanguageCode::En,
                bindings: expected,
            }
        );
    }

    #[tokio::test]
    async fn test_rebinding_target_replaces_key() {
        let (mut i18n, _) = resolver(source());
        i18n.init().await;
        i18n.bind("title", "cart.title");
        i18n.bind("title", "a.b.c");
        let bindings = i18n.bindings();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].text, "X {{n}}");
    }
}
