use std::sync::Arc;

use composition::CatalogDraft;
use shared::{
    domain::{CoffeeId, CoffeeKind},
    protocol::{CatalogEntry, CoffeeCatalog},
};
use tracing::{info, warn};

use crate::{
    backend::CatalogStore,
    error::{GatewayError, SubmitError},
};

pub struct CatalogEditor {
    store: Arc<dyn CatalogStore>,
    catalog: CoffeeCatalog,
    draft: Option<CatalogDraft>,
}

impl CatalogEditor {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            store,
            catalog: CoffeeCatalog::default(),
            draft: None,
        }
    }

    pub fn catalog(&self) -> &CoffeeCatalog {
        &self.catalog
    }

    /// Reloads the catalog. The previous snapshot is kept if the round trip fails.
    pub async fn refresh(&mut self) -> Result<&CoffeeCatalog, GatewayError> {
        match self.store.fetch_catalog().await {
            Ok(catalog) => {
                self.catalog = catalog;
                Ok(&self.catalog)
            }
            Err(err) => {
                warn!(error = %err, "failed to load coffee catalog");
                Err(err)
            }
        }
    }

    /// Opens an empty draft, replacing any draft already open.
    pub fn open_new(&mut self, kind: CoffeeKind) -> &mut CatalogDraft {
        self.draft.insert(CatalogDraft::new(kind))
    }

    pub fn open_edit(&mut self, id: &CoffeeId) -> Result<&mut CatalogDraft, SubmitError> {
        let entry = self
            .catalog
            .find(id)
            .cloned()
            .ok_or_else(|| SubmitError::UnknownCoffee(id.clone()))?;
        Ok(self.draft.insert(CatalogDraft::from_entry(entry)))
    }

    pub fn draft(&self) -> Option<&CatalogDraft> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut CatalogDraft> {
        self.draft.as_mut()
    }

    /// Discards the open draft without saving.
    pub fn close(&mut self) -> Option<CatalogDraft> {
        self.draft.take()
    }

    /// Names offered in a component picker.
    pub fn source_options(&self) -> Vec<&str> {
        self.catalog.single_origin_names()
    }

    /// Component names in the open draft that match no loaded single-origin coffee.
    pub fn dangling_components(&self) -> Vec<&str> {
        let Some(draft) = &self.draft else {
            return Vec::new();
        };
        draft
            .components()
            .iter()
            .map(|component| component.source_name.as_str())
            .filter(|name| !name.is_empty())
            .filter(|name| {
                !self
                    .catalog
                    .single_origins
                    .iter()
                    .any(|entry| entry.name == *name)
            })
            .collect()
    }

    /// Creates or updates the open draft. On success the draft is closed and the catalog
    /// reloaded; on any failure the draft stays open exactly as it was.
    pub async fn submit(&mut self) -> Result<CatalogEntry, SubmitError> {
        let draft = self.draft.as_ref().ok_or(SubmitError::NoDraft)?;
        let payload = draft.to_persistable_payload().map_err(|err| {
            warn!(name = draft.name(), error = %err, "coffee draft is not submittable");
            err
        })?;

        let result = match draft.id() {
            Some(id) => self.store.update_coffee(id, &payload).await,
            None => self.store.create_coffee(&payload).await,
        };
        let saved = result.map_err(|err| {
            warn!(name = %payload.name, error = %err, "failed to save coffee");
            err
        })?;

        info!(name = %saved.name, kind = %saved.kind, "saved coffee");
        self.draft = None;
        self.remember(saved.clone());
        self.reload_after_write().await;
        Ok(saved)
    }

    pub async fn delete(&mut self, id: &CoffeeId) -> Result<(), GatewayError> {
        self.store.delete_coffee(id).await.map_err(|err| {
            warn!(%id, error = %err, "failed to delete coffee");
            err
        })?;
        self.catalog.single_origins.retain(|entry| entry.id.as_ref() != Some(id));
        self.catalog.blends.retain(|entry| entry.id.as_ref() != Some(id));
        self.reload_after_write().await;
        Ok(())
    }

    /// Applies a confirmed write to the local snapshot so it stays current if the reload fails.
    fn remember(&mut self, saved: CatalogEntry) {
        if let Some(id) = &saved.id {
            self.catalog.single_origins.retain(|entry| entry.id.as_ref() != Some(id));
            self.catalog.blends.retain(|entry| entry.id.as_ref() != Some(id));
        }
        match saved.kind {
            CoffeeKind::SingleOrigin => self.catalog.single_origins.push(saved),
            CoffeeKind::Blend => self.catalog.blends.push(saved),
        }
    }

    async fn reload_after_write(&mut self) {
        if let Err(err) = self.refresh().await {
            warn!(error = %err, "write succeeded but catalog reload failed; showing local copy");
        }
    }
}
