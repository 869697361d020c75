use async_trait::async_trait;
use shared::{
    domain::{CoffeeId, OrderId},
    protocol::{CatalogEntry, CoffeeCatalog, CoffeePayload, OrderRecord, ProductionSummary},
};

use crate::error::GatewayError;

/// Authoritative list of single-origin coffees and blends.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn fetch_catalog(&self) -> Result<CoffeeCatalog, GatewayError>;
    async fn create_coffee(&self, payload: &CoffeePayload) -> Result<CatalogEntry, GatewayError>;
    async fn update_coffee(
        &self,
        id: &CoffeeId,
        payload: &CoffeePayload,
    ) -> Result<CatalogEntry, GatewayError>;
    async fn delete_coffee(&self, id: &CoffeeId) -> Result<(), GatewayError>;
}

/// Order persistence plus the read-only production aggregate.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn submit_orders(&self, records: &[OrderRecord])
        -> Result<Vec<OrderRecord>, GatewayError>;
    async fn delete_order(&self, id: &OrderId) -> Result<(), GatewayError>;
    async fn set_order_completed(&self, id: &OrderId, completed: bool)
        -> Result<(), GatewayError>;
    async fn set_roast_completed(
        &self,
        coffee_type: &str,
        completed: bool,
    ) -> Result<(), GatewayError>;
    async fn production_summary(&self) -> Result<ProductionSummary, GatewayError>;
}
