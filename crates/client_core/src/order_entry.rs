use std::sync::Arc;

use composition::OrderDraft;
use shared::protocol::OrderRecord;
use tracing::{info, warn};

use crate::{backend::OrderGateway, error::SubmitError};

pub struct OrderEntry {
    gateway: Arc<dyn OrderGateway>,
    draft: OrderDraft,
}

impl OrderEntry {
    pub fn new(gateway: Arc<dyn OrderGateway>) -> Self {
        Self {
            gateway,
            draft: OrderDraft::new(),
        }
    }

    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut OrderDraft {
        &mut self.draft
    }

    /// Resets the form to a single empty line.
    pub fn discard(&mut self) {
        self.draft.start_new();
    }

    /// Sends every line as its own record. The form is reset only once the gateway
    /// accepts the batch; a rejected or unreachable submit leaves it untouched.
    pub async fn submit(&mut self) -> Result<Vec<OrderRecord>, SubmitError> {
        let records = self.draft.flatten_for_submit().map_err(|err| {
            warn!(customer = self.draft.customer(), error = %err, "order draft is not submittable");
            err
        })?;

        let persisted = self.gateway.submit_orders(&records).await.map_err(|err| {
            warn!(
                customer = self.draft.customer(),
                records = records.len(),
                error = %err,
                "failed to submit order"
            );
            err
        })?;

        info!(
            customer = self.draft.customer(),
            records = persisted.len(),
            "order submitted"
        );
        self.draft.start_new();
        Ok(persisted)
    }
}
