use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use serde::{Deserialize, Serialize};

use crate::{
    domain::{BagSize, CoffeeId, CoffeeKind, DeliveryMethod, GrindSize, OrderId},
    numeric::{lenient_f64, lenient_u32, lenient_u32_map},
};

/// One single-origin share of a blend. `source_name` is a name lookup into the catalog,
/// never an owning reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlendComponent {
    #[serde(rename = "coffee", default)]
    pub source_name: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub percentage: u32,
}

impl BlendComponent {
    pub fn new(source_name: impl Into<String>, percentage: u32) -> Self {
        Self {
            source_name: source_name.into(),
            percentage,
        }
    }
}

impl fmt::Display for BlendComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}%)", self.source_name, self.percentage)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CatalogEntryWire", into = "CatalogEntryWire")]
pub struct CatalogEntry {
    pub id: Option<CoffeeId>,
    pub name: String,
    pub kind: CoffeeKind,
    pub components: Vec<BlendComponent>,
}

impl CatalogEntry {
    pub fn single_origin(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            kind: CoffeeKind::SingleOrigin,
            components: Vec::new(),
        }
    }

    pub fn blend(name: impl Into<String>, components: Vec<BlendComponent>) -> Self {
        Self {
            id: None,
            name: name.into(),
            kind: CoffeeKind::Blend,
            components,
        }
    }

    pub fn with_id(mut self, id: impl Into<CoffeeId>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[derive(Serialize, Deserialize)]
struct CatalogEntryWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<CoffeeId>,
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<CoffeeKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    components: Option<Vec<BlendComponent>>,
}

impl From<CatalogEntryWire> for CatalogEntry {
    fn from(wire: CatalogEntryWire) -> Self {
        // An explicit type wins; older records only carry `components` on blends.
        let kind = wire.kind.unwrap_or(if wire.components.is_some() {
            CoffeeKind::Blend
        } else {
            CoffeeKind::SingleOrigin
        });
        let components = match kind {
            CoffeeKind::Blend => wire.components.unwrap_or_default(),
            CoffeeKind::SingleOrigin => Vec::new(),
        };
        Self {
            id: wire.id,
            name: wire.name,
            kind,
            components,
        }
    }
}

impl From<CatalogEntry> for CatalogEntryWire {
    fn from(entry: CatalogEntry) -> Self {
        let components = match entry.kind {
            CoffeeKind::Blend => Some(entry.components),
            CoffeeKind::SingleOrigin => None,
        };
        Self {
            id: entry.id,
            name: entry.name,
            kind: Some(entry.kind),
            components,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoffeeCatalog {
    pub single_origins: Vec<CatalogEntry>,
    pub blends: Vec<CatalogEntry>,
}

impl CoffeeCatalog {
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.single_origins.iter().chain(self.blends.iter())
    }

    pub fn single_origin_names(&self) -> Vec<&str> {
        self.single_origins
            .iter()
            .map(|entry| entry.name.as_str())
            .collect()
    }

    pub fn find(&self, id: &CoffeeId) -> Option<&CatalogEntry> {
        self.entries().find(|entry| entry.id.as_ref() == Some(id))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries().find(|entry| entry.name == name)
    }
}

/// Create/update body for the catalog store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoffeePayload {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CoffeeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<BlendComponent>>,
}

impl CoffeePayload {
    pub fn into_entry(self, id: Option<CoffeeId>) -> CatalogEntry {
        CatalogEntry {
            id,
            name: self.name,
            kind: self.kind,
            components: self.components.unwrap_or_default(),
        }
    }
}

/// One persisted order line carrying its customer-level fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OrderId>,
    pub customer: String,
    pub delivery_method: DeliveryMethod,
    #[serde(default)]
    pub custom_labels: bool,
    #[serde(default)]
    pub completed: bool,
    pub coffee_type: String,
    #[serde(deserialize_with = "lenient_u32")]
    pub quantity: u32,
    pub bag_size: BagSize,
    #[serde(default)]
    pub grind_size: GrindSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCompletionPatch {
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoastCompletion {
    pub coffee_type: String,
    pub completed: bool,
}

/// Pre-computed production aggregate. Produced by the backend and only displayed here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductionSummary {
    pub roasting_calculations: Vec<RoastingCalculation>,
    pub packaging_needs: PackagingNeeds,
    #[serde(deserialize_with = "lenient_u32")]
    pub total_batches: u32,
    pub orders_by_delivery_method: BTreeMap<String, Vec<CustomerOrder>>,
    pub ground_coffee: BTreeMap<String, Vec<GroundCoffeeEntry>>,
    pub completed_roasts: BTreeMap<String, bool>,
}

impl ProductionSummary {
    /// Smallest batches first, keeping backend order for ties.
    pub fn sort_roasting_by_batch_size(&mut self) {
        self.roasting_calculations
            .sort_by(|a, b| a.batch_size.total_cmp(&b.batch_size));
    }

    pub fn total_pounds(&self) -> f64 {
        self.roasting_calculations
            .iter()
            .map(|calc| calc.total_pounds)
            .sum()
    }

    pub fn is_roast_completed(&self, coffee_type: &str) -> bool {
        self.completed_roasts
            .get(coffee_type)
            .copied()
            .unwrap_or(false)
    }

    pub fn label_names(&self) -> BTreeSet<&str> {
        let labels = &self.packaging_needs.labels;
        labels
            .five_lb
            .keys()
            .chain(labels.two_lb.keys())
            .chain(labels.ten_oz.keys())
            .map(String::as_str)
            .collect()
    }

    pub fn customer_orders(&self) -> impl Iterator<Item = (&str, &CustomerOrder)> {
        self.orders_by_delivery_method
            .iter()
            .flat_map(|(method, orders)| orders.iter().map(move |order| (method.as_str(), order)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoastingCalculation {
    pub coffee_type: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub total_pounds: f64,
    #[serde(deserialize_with = "lenient_u32")]
    pub number_of_roasts: u32,
    #[serde(deserialize_with = "lenient_f64")]
    pub batch_size: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackagingNeeds {
    #[serde(deserialize_with = "lenient_u32")]
    pub five_lb_bags: u32,
    #[serde(deserialize_with = "lenient_u32")]
    pub two_lb_bags: u32,
    #[serde(deserialize_with = "lenient_u32")]
    pub ten_oz_bags: u32,
    pub labels: LabelCounts,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelCounts {
    #[serde(deserialize_with = "lenient_u32_map")]
    pub five_lb: BTreeMap<String, u32>,
    #[serde(deserialize_with = "lenient_u32_map")]
    pub two_lb: BTreeMap<String, u32>,
    #[serde(deserialize_with = "lenient_u32_map")]
    pub ten_oz: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerOrder {
    pub id: OrderId,
    #[serde(default)]
    pub customer: String,
    #[serde(default)]
    pub coffees: Vec<OrderLineSummary>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderLineSummary {
    pub coffee_type: String,
    #[serde(deserialize_with = "lenient_u32")]
    pub quantity: u32,
    pub bag_size: String,
    pub grind_size: String,
}

impl fmt::Display for OrderLineSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {} {}", self.quantity, self.bag_size, self.coffee_type)?;
        if !self.grind_size.is_empty() && self.grind_size != GrindSize::WholeBean.as_str() {
            write!(f, " ({})", self.grind_size)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroundCoffeeEntry {
    pub customer: String,
    pub coffee_type: String,
    #[serde(deserialize_with = "lenient_u32")]
    pub quantity: u32,
    pub bag_size: String,
}
