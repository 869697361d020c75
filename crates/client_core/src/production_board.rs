use std::sync::Arc;

use chrono::{DateTime, Utc};
use shared::{domain::OrderId, protocol::ProductionSummary};
use tracing::{debug, info, warn};

use crate::{backend::OrderGateway, dashboard::DashboardStats, error::GatewayError};

pub struct ProductionBoard {
    gateway: Arc<dyn OrderGateway>,
    summary: ProductionSummary,
    loaded_at: Option<DateTime<Utc>>,
}

impl ProductionBoard {
    pub fn new(gateway: Arc<dyn OrderGateway>) -> Self {
        Self {
            gateway,
            summary: ProductionSummary::default(),
            loaded_at: None,
        }
    }

    pub fn summary(&self) -> &ProductionSummary {
        &self.summary
    }

    /// When the summary was last loaded successfully; `None` before the first load.
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    pub fn dashboard(&self) -> DashboardStats {
        DashboardStats::from_summary(&self.summary)
    }

    pub async fn refresh(&mut self) -> Result<&ProductionSummary, GatewayError> {
        let mut summary = self.gateway.production_summary().await.map_err(|err| {
            warn!(error = %err, "failed to load roasting calculations");
            err
        })?;
        summary.sort_roasting_by_batch_size();
        self.summary = summary;
        self.loaded_at = Some(Utc::now());
        debug!(
            roasts = self.summary.roasting_calculations.len(),
            orders = self.summary.customer_orders().count(),
            "production board refreshed"
        );
        Ok(&self.summary)
    }

    pub async fn set_order_completed(
        &mut self,
        id: &OrderId,
        completed: bool,
    ) -> Result<(), GatewayError> {
        self.gateway
            .set_order_completed(id, completed)
            .await
            .map_err(|err| {
                warn!(%id, completed, error = %err, "failed to update order status");
                err
            })?;
        for orders in self.summary.orders_by_delivery_method.values_mut() {
            for order in orders.iter_mut().filter(|order| &order.id == id) {
                order.completed = completed;
            }
        }
        info!(%id, completed, "order status updated");
        self.reload_after_write().await;
        Ok(())
    }

    pub async fn delete_order(&mut self, id: &OrderId) -> Result<(), GatewayError> {
        self.gateway.delete_order(id).await.map_err(|err| {
            warn!(%id, error = %err, "failed to delete order");
            err
        })?;
        for orders in self.summary.orders_by_delivery_method.values_mut() {
            orders.retain(|order| &order.id != id);
        }
        info!(%id, "order deleted");
        self.reload_after_write().await;
        Ok(())
    }

    pub async fn set_roast_completed(
        &mut self,
        coffee_type: &str,
        completed: bool,
    ) -> Result<(), GatewayError> {
        self.gateway
            .set_roast_completed(coffee_type, completed)
            .await
            .map_err(|err| {
                warn!(coffee_type, completed, error = %err, "failed to update roast completion");
                err
            })?;
        self.summary
            .completed_roasts
            .insert(coffee_type.to_string(), completed);
        info!(coffee_type, completed, "roast completion updated");
        self.reload_after_write().await;
        Ok(())
    }

    async fn reload_after_write(&mut self) {
        if let Err(err) = self.refresh().await {
            warn!(error = %err, "write succeeded but production reload failed; showing local copy");
        }
    }
}
