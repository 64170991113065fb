//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the config and one [`Registry`]: the cap store every page writes
//! through to, plus a live widget for each page with hover or lock state.
//! Both sit behind a single lock so an interaction reads its cap and updates
//! fills atomically.
//!
//! Reads never create sessions; a page with no live widget is rendered from
//! the store and thrown away. A widget that goes back to idle after an event
//! is dropped, so the map stays bounded by pages with state.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use shards::cascade::{Action, Cascade, ShardEvent};
use shards::store::{CapStore, MemoryStore, PageKey};
use shards::widget::{PentagonWidget, generate_pentagon};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::ApiError;

// =============================================================================
// REGISTRY
// =============================================================================

/// Cap store and live widgets, keyed by page.
#[derive(Debug, Default)]
pub struct Registry {
    pub store: MemoryStore,
    pub widgets: HashMap<PageKey, PentagonWidget>,
}

impl Registry {
    #[must_use]
    pub fn new(store: MemoryStore) -> Self {
        Self { store, widgets: HashMap::new() }
    }

    /// Run `f` on the page's widget without keeping a new session around.
    pub fn view<R>(&self, config: &AppConfig, page: &PageKey, f: impl FnOnce(&PentagonWidget) -> R) -> Result<R, ApiError> {
        if let Some(widget) = self.widgets.get(page) {
            return Ok(f(widget));
        }
        let widget = restore(&self.store, config, page)?;
        Ok(f(&widget))
    }

    /// Route one interaction on `page`.
    pub fn handle(&mut self, config: &AppConfig, page: &PageKey, event: ShardEvent) -> Result<Vec<Action>, ApiError> {
        let widget = match self.widgets.entry(page.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let widget = restore(&self.store, config, page)?;
                debug!(%page, "page session created");
                entry.insert(widget)
            }
        };
        let result = widget.handle(event, &mut self.store).map_err(ApiError::InvalidShard);
        if widget.cascade().is_idle() {
            self.widgets.remove(page);
            debug!(%page, "idle page session dropped");
        }
        result
    }

    /// Swap in a new store, dropping every live session.
    ///
    /// Each page's locks are checked against the configured pentagon first;
    /// on failure nothing changes.
    pub fn replace_store(&mut self, config: &AppConfig, store: MemoryStore) -> Result<(), ApiError> {
        validate_store(config, &store)?;
        self.store = store;
        self.widgets.clear();
        info!(pages = self.store.pages().count(), "state replaced");
        Ok(())
    }
}

fn restore(store: &MemoryStore, config: &AppConfig, page: &PageKey) -> Result<PentagonWidget, ApiError> {
    let locked = store.locked_shards(page);
    generate_pentagon(&config.options(page.clone()), &locked).map_err(|source| ApiError::LocksDoNotFit { page: page.clone(), source })
}

/// Check that every page in `store` can be restored onto the configured pentagon.
pub fn validate_store(config: &AppConfig, store: &MemoryStore) -> Result<(), ApiError> {
    for page in store.pages() {
        let layout = config.options(page.clone()).layout();
        Cascade::from_store(layout, page.clone(), store)
            .map_err(|source| ApiError::LocksDoNotFit { page: page.clone(), source })?;
    }
    Ok(())
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub registry: Arc<RwLock<Registry>>,
}

impl AppState {
    /// Build state seeded with the config's initial locks.
    pub fn new(config: AppConfig) -> Result<Self, ApiError> {
        validate_store(&config, &config.initial_state)?;
        let registry = Registry::new(config.initial_state.clone());
        Ok(Self { config: Arc::new(config), registry: Arc::new(RwLock::new(registry)) })
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
