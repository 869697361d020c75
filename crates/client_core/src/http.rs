use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    domain::{CoffeeId, OrderId},
    error::ApiError,
    protocol::{
        CatalogEntry, CoffeeCatalog, CoffeePayload, OrderCompletionPatch, OrderRecord,
        ProductionSummary, RoastCompletion,
    },
};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    backend::{CatalogStore, OrderGateway},
    error::GatewayError,
};

const COFFEES: &str = "coffees";
const ORDERS: &str = "orders";
const ROASTING_CALCULATIONS: &str = "roasting-calculations";
const COMPLETED_ROASTS: &str = "completed-roasts";

#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: Client,
    base_url: Url,
}

impl HttpBackend {
    /// `base_url` is the API prefix, e.g. `http://localhost:3001/api/`.
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, GatewayError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        Ok(self.base_url.join(path)?)
    }

    fn resource(&self, collection: &str, id: &str) -> Result<Url, GatewayError> {
        let mut url = self.endpoint(collection)?;
        url.path_segments_mut()
            .map_err(|()| {
                GatewayError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase)
            })?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    /// Sends the request and returns the body of a successful response.
    async fn execute(
        &self,
        request: RequestBuilder,
        method: &'static str,
        url: &Url,
    ) -> Result<String, GatewayError> {
        let path = url.path();
        let response = request.send().await.map_err(|err| {
            warn!(method, path, error = %err, "backend unreachable");
            GatewayError::from(err)
        })?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        if !response_ok(status) {
            let error = ApiError::from_response(status, &body);
            warn!(method, path, status, message = %error.message, "backend rejected request");
            return Err(GatewayError::Rejected { status, error });
        }

        debug!(method, path, status, bytes = body.len(), "backend request completed");
        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, GatewayError> {
        let body = self.execute(self.http.get(url.clone()), "GET", &url).await?;
        decode(&body, &url)
    }
}

fn response_ok(status: u16) -> bool {
    (200..300).contains(&status)
}

fn decode<T: DeserializeOwned>(body: &str, url: &Url) -> Result<T, GatewayError> {
    serde_json::from_str(body).map_err(|err| {
        warn!(path = url.path(), error = %err, "backend returned an unreadable body");
        GatewayError::Decode(format!("{}: {err}", url.path()))
    })
}

/// Body of a successful write. `None` when the backend sent nothing; an unreadable body
/// is logged at warn since any backend-assigned fields in it are lost.
fn decode_written<T: DeserializeOwned>(body: &str, url: &Url) -> Option<T> {
    if body.trim().is_empty() {
        debug!(path = url.path(), "write acknowledged without a body");
        return None;
    }
    match serde_json::from_str(body) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(
                path = url.path(),
                error = %err,
                "write succeeded but the response is not a record; using the submitted values"
            );
            None
        }
    }
}

/// The stored entry, filling whatever the backend left out from what was sent.
fn saved_entry(
    written: Option<CatalogEntry>,
    payload: &CoffeePayload,
    id: Option<&CoffeeId>,
) -> CatalogEntry {
    match written {
        Some(mut entry) if !entry.name.is_empty() => {
            entry.id = entry.id.or_else(|| id.cloned());
            entry
        }
        Some(ack) => payload.clone().into_entry(ack.id.or_else(|| id.cloned())),
        None => payload.clone().into_entry(id.cloned()),
    }
}

#[async_trait]
impl CatalogStore for HttpBackend {
    async fn fetch_catalog(&self) -> Result<CoffeeCatalog, GatewayError> {
        let catalog: CoffeeCatalog = self.get_json(self.endpoint(COFFEES)?).await?;
        info!(
            single_origins = catalog.single_origins.len(),
            blends = catalog.blends.len(),
            "loaded coffee catalog"
        );
        Ok(catalog)
    }

    async fn create_coffee(&self, payload: &CoffeePayload) -> Result<CatalogEntry, GatewayError> {
        let url = self.endpoint(COFFEES)?;
        let body = self
            .execute(self.http.post(url.clone()).json(payload), "POST", &url)
            .await?;
        info!(name = %payload.name, kind = %payload.kind, "created coffee");
        Ok(saved_entry(decode_written(&body, &url), payload, None))
    }

    async fn update_coffee(
        &self,
        id: &CoffeeId,
        payload: &CoffeePayload,
    ) -> Result<CatalogEntry, GatewayError> {
        let url = self.resource(COFFEES, id.as_str())?;
        let body = self
            .execute(self.http.put(url.clone()).json(payload), "PUT", &url)
            .await?;
        info!(%id, name = %payload.name, "updated coffee");
        Ok(saved_entry(decode_written(&body, &url), payload, Some(id)))
    }

    async fn delete_coffee(&self, id: &CoffeeId) -> Result<(), GatewayError> {
        let url = self.resource(COFFEES, id.as_str())?;
        self.execute(self.http.delete(url.clone()), "DELETE", &url)
            .await?;
        info!(%id, "deleted coffee");
        Ok(())
    }
}

#[async_trait]
impl OrderGateway for HttpBackend {
    async fn submit_orders(
        &self,
        records: &[OrderRecord],
    ) -> Result<Vec<OrderRecord>, GatewayError> {
        let url = self.endpoint(ORDERS)?;
        let body = self
            .execute(self.http.post(url.clone()).json(records), "POST", &url)
            .await?;
        info!(records = records.len(), "submitted order records");
        Ok(decode_written(&body, &url).unwrap_or_else(|| records.to_vec()))
    }

    async fn delete_order(&self, id: &OrderId) -> Result<(), GatewayError> {
        let url = self.resource(ORDERS, id.as_str())?;
        self.execute(self.http.delete(url.clone()), "DELETE", &url)
            .await?;
        info!(%id, "deleted order");
        Ok(())
    }

    async fn set_order_completed(
        &self,
        id: &OrderId,
        completed: bool,
    ) -> Result<(), GatewayError> {
        let url = self.resource(ORDERS, id.as_str())?;
        let patch = OrderCompletionPatch { completed };
        self.execute(self.http.patch(url.clone()).json(&patch), "PATCH", &url)
            .await?;
        info!(%id, completed, "updated order completion");
        Ok(())
    }

    async fn set_roast_completed(
        &self,
        coffee_type: &str,
        completed: bool,
    ) -> Result<(), GatewayError> {
        let url = self.endpoint(COMPLETED_ROASTS)?;
        let body = RoastCompletion {
            coffee_type: coffee_type.to_string(),
            completed,
        };
        self.execute(self.http.post(url.clone()).json(&body), "POST", &url)
            .await?;
        info!(coffee_type, completed, "updated roast completion");
        Ok(())
    }

    async fn production_summary(&self) -> Result<ProductionSummary, GatewayError> {
        let summary: ProductionSummary = self
            .get_json(self.endpoint(ROASTING_CALCULATIONS)?)
            .await?;
        debug!(
            roasts = summary.roasting_calculations.len(),
            total_batches = summary.total_batches,
            "loaded production summary"
        );
        Ok(summary)
    }
}
