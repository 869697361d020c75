use async_trait::async_trait;
use shared::{
    domain::{CoffeeId, CoffeeKind, OrderId},
    error::ErrorCode,
    protocol::{CatalogEntry, CoffeeCatalog, CoffeePayload, OrderRecord, ProductionSummary},
};
use tokio::sync::Mutex;

use crate::{
    backend::{CatalogStore, OrderGateway},
    error::GatewayError,
};

#[derive(Default)]
struct MemoryState {
    next_id: u64,
    catalog: CoffeeCatalog,
    orders: Vec<OrderRecord>,
    production: ProductionSummary,
    unavailable: bool,
    writes: usize,
}

impl MemoryState {
    fn ensure_available(&self) -> Result<(), GatewayError> {
        if self.unavailable {
            Err(GatewayError::Unavailable("in-memory backend is offline".into()))
        } else {
            Ok(())
        }
    }

    fn allocate_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }

    fn list_for(&mut self, kind: CoffeeKind) -> &mut Vec<CatalogEntry> {
        match kind {
            CoffeeKind::SingleOrigin => &mut self.catalog.single_origins,
            CoffeeKind::Blend => &mut self.catalog.blends,
        }
    }

    fn name_taken(&self, name: &str, except: Option<&CoffeeId>) -> bool {
        self.catalog
            .entries()
            .any(|entry| entry.name == name && entry.id.as_ref() != except)
    }

    fn remove_coffee(&mut self, id: &CoffeeId) -> Option<CatalogEntry> {
        for list in [&mut self.catalog.single_origins, &mut self.catalog.blends] {
            if let Some(position) = list.iter().position(|entry| entry.id.as_ref() == Some(id)) {
                return Some(list.remove(position));
            }
        }
        None
    }
}

fn not_found(what: &str, id: &str) -> GatewayError {
    GatewayError::rejected(404, ErrorCode::NotFound, format!("{what} {id} not found"))
}

/// Catalog store and order gateway backed by process memory. Assigns sequential ids,
/// rejects duplicate coffee names, and serves whatever production summary it was given.
#[derive(Default)]
pub struct InMemoryBackend {
    state: Mutex<MemoryState>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the catalog; entries without ids are given one above any numeric id seen.
    pub fn with_catalog(mut self, catalog: CoffeeCatalog) -> Self {
        let state = self.state.get_mut();
        let seeded = catalog.single_origins.iter().chain(&catalog.blends);
        if let Some(highest) = seeded
            .filter_map(|entry| entry.id.as_ref()?.as_str().parse::<u64>().ok())
            .max()
        {
            state.next_id = state.next_id.max(highest);
        }
        for mut entry in catalog.single_origins.into_iter().chain(catalog.blends) {
            if entry.id.is_none() {
                entry.id = Some(CoffeeId::new(state.allocate_id()));
            }
            state.list_for(entry.kind).push(entry);
        }
        self
    }

    pub fn with_production(mut self, summary: ProductionSummary) -> Self {
        self.state.get_mut().production = summary;
        self
    }

    /// Makes every following call fail until switched back.
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().await.unavailable = unavailable;
    }

    pub async fn catalog(&self) -> CoffeeCatalog {
        self.state.lock().await.catalog.clone()
    }

    pub async fn orders(&self) -> Vec<OrderRecord> {
        self.state.lock().await.orders.clone()
    }

    pub async fn production(&self) -> ProductionSummary {
        self.state.lock().await.production.clone()
    }

    /// Number of successful writes so far.
    pub async fn write_count(&self) -> usize {
        self.state.lock().await.writes
    }
}

#[async_trait]
impl CatalogStore for InMemoryBackend {
    async fn fetch_catalog(&self) -> Result<CoffeeCatalog, GatewayError> {
        let state = self.state.lock().await;
        state.ensure_available()?;
        Ok(state.catalog.clone())
    }

    async fn create_coffee(&self, payload: &CoffeePayload) -> Result<CatalogEntry, GatewayError> {
        let mut state = self.state.lock().await;
        state.ensure_available()?;
        if state.name_taken(&payload.name, None) {
            return Err(GatewayError::rejected(
                409,
                ErrorCode::Conflict,
                format!("coffee '{}' already exists", payload.name),
            ));
        }
        let id = CoffeeId::new(state.allocate_id());
        let entry = payload.clone().into_entry(Some(id));
        state.list_for(entry.kind).push(entry.clone());
        state.writes += 1;
        Ok(entry)
    }

    async fn update_coffee(
        &self,
        id: &CoffeeId,
        payload: &CoffeePayload,
    ) -> Result<CatalogEntry, GatewayError> {
        let mut state = self.state.lock().await;
        state.ensure_available()?;
        if state.name_taken(&payload.name, Some(id)) {
            return Err(GatewayError::rejected(
                409,
                ErrorCode::Conflict,
                format!("coffee '{}' already exists", payload.name),
            ));
        }
        state
            .remove_coffee(id)
            .ok_or_else(|| not_found("coffee", id.as_str()))?;
        let entry = payload.clone().into_entry(Some(id.clone()));
        state.list_for(entry.kind).push(entry.clone());
        state.writes += 1;
        Ok(entry)
    }

    async fn delete_coffee(&self, id: &CoffeeId) -> Result<(), GatewayError> {
        let mut state = self.state.lock().await;
        state.ensure_available()?;
        state
            .remove_coffee(id)
            .ok_or_else(|| not_found("coffee", id.as_str()))?;
        state.writes += 1;
        Ok(())
    }
}

#[async_trait]
impl OrderGateway for InMemoryBackend {
    async fn submit_orders(
        &self,
        records: &[OrderRecord],
    ) -> Result<Vec<OrderRecord>, GatewayError> {
        let mut state = self.state.lock().await;
        state.ensure_available()?;
        let mut persisted = Vec::with_capacity(records.len());
        for record in records {
            let mut record = record.clone();
            record.id = Some(OrderId::new(state.allocate_id()));
            persisted.push(record);
        }
        state.orders.extend(persisted.iter().cloned());
        state.writes += 1;
        Ok(persisted)
    }

    async fn delete_order(&self, id: &OrderId) -> Result<(), GatewayError> {
        let mut state = self.state.lock().await;
        state.ensure_available()?;
        let before = state.orders.len();
        state.orders.retain(|record| record.id.as_ref() != Some(id));
        let mut removed = state.orders.len() != before;
        for orders in state.production.orders_by_delivery_method.values_mut() {
            let before = orders.len();
            orders.retain(|order| &order.id != id);
            removed |= orders.len() != before;
        }
        if !removed {
            return Err(not_found("order", id.as_str()));
        }
        state.writes += 1;
        Ok(())
    }

    async fn set_order_completed(
        &self,
        id: &OrderId,
        completed: bool,
    ) -> Result<(), GatewayError> {
        let mut state = self.state.lock().await;
        state.ensure_available()?;
        let mut found = false;
        for record in state
            .orders
            .iter_mut()
            .filter(|record| record.id.as_ref() == Some(id))
        {
            record.completed = completed;
            found = true;
        }
        for order in state
            .production
            .orders_by_delivery_method
            .values_mut()
            .flatten()
            .filter(|order| &order.id == id)
        {
            order.completed = completed;
            found = true;
        }
        if !found {
            return Err(not_found("order", id.as_str()));
        }
        state.writes += 1;
        Ok(())
    }

    async fn set_roast_completed(
        &self,
        coffee_type: &str,
        completed: bool,
    ) -> Result<(), GatewayError> {
        let mut state = self.state.lock().await;
        state.ensure_available()?;
        state
            .production
            .completed_roasts
            .insert(coffee_type.to_string(), completed);
        state.writes += 1;
        Ok(())
    }

    async fn production_summary(&self) -> Result<ProductionSummary, GatewayError> {
        let state = self.state.lock().await;
        state.ensure_available()?;
        Ok(state.production.clone())
    }
}
