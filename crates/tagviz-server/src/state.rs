use std::sync::Arc;

use tagviz_core::{Catalog, TagvizConfig};

use crate::error::ServerError;
use crate::page::PageTemplate;

/// Shared application state, cloned into every handler.
///
/// Everything here is built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub page: Arc<PageTemplate>,
    /// Artist names as a JSON array, serialized once for `/_autocomplete`.
    pub autocomplete: Arc<str>,
}

impl AppState {
    pub fn new(catalog: Catalog, page: PageTemplate) -> Self {
        // a list of strings always serializes
        let autocomplete = serde_json::to_string(catalog.artist_names())
            .unwrap_or_else(|_| "[]".to_owned());
        Self {
            catalog: Arc::new(catalog),
            page: Arc::new(page),
            autocomplete: autocomplete.into(),
        }
    }

    /// Load the dataset and the index template named by the config.
    pub fn load(config: &TagvizConfig) -> Result<Self, ServerError> {
        let catalog = Catalog::load(config).map_err(ServerError::Dataset)?;
        let page = PageTemplate::load(&config.templates_dir())?;
        tracing::debug!(
            artists = catalog.artist_names().len(),
            templates = %config.templates_dir().display(),
            "AppState loaded"
        );
        Ok(Self::new(catalog, page))
    }
}
