use shared::{
    domain::{BagSize, DeliveryMethod, GrindSize},
    protocol::OrderRecord,
};

use crate::error::{DraftError, ValidationError, ValidationIssue};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderLine {
    pub coffee_type: String,
    pub quantity: u32,
    pub bag_size: Option<BagSize>,
    pub grind_size: GrindSize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderField {
    Customer(String),
    DeliveryMethod(Option<DeliveryMethod>),
    CustomLabels(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineField {
    CoffeeType(String),
    Quantity(u32),
    BagSize(Option<BagSize>),
    GrindSize(GrindSize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    customer: String,
    delivery_method: Option<DeliveryMethod>,
    custom_labels: bool,
    lines: Vec<OrderLine>,
}

impl Default for OrderDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderDraft {
    pub fn new() -> Self {
        Self {
            customer: String::new(),
            delivery_method: None,
            custom_labels: false,
            lines: vec![OrderLine::default()],
        }
    }

    pub fn start_new(&mut self) {
        *self = Self::new();
    }

    pub fn customer(&self) -> &str {
        &self.customer
    }

    pub fn delivery_method(&self) -> Option<DeliveryMethod> {
        self.delivery_method
    }

    pub fn custom_labels(&self) -> bool {
        self.custom_labels
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn set_customer_field(&mut self, field: OrderField) {
        match field {
            OrderField::Customer(value) => self.customer = value,
            OrderField::DeliveryMethod(value) => self.delivery_method = value,
            OrderField::CustomLabels(value) => self.custom_labels = value,
        }
    }

    /// Appends an empty line and returns its index.
    pub fn add_line(&mut self) -> usize {
        self.lines.push(OrderLine::default());
        self.lines.len() - 1
    }

    pub fn remove_line(&mut self, index: usize) -> Result<OrderLine, DraftError> {
        self.check_index(index)?;
        if self.lines.len() == 1 {
            return Err(DraftError::LastSlot("order line"));
        }
        Ok(self.lines.remove(index))
    }

    pub fn set_line_field(&mut self, index: usize, field: LineField) -> Result<(), DraftError> {
        self.check_index(index)?;
        let line = &mut self.lines[index];
        match field {
            LineField::CoffeeType(value) => line.coffee_type = value,
            LineField::Quantity(value) => line.quantity = value,
            LineField::BagSize(value) => line.bag_size = value,
            LineField::GrindSize(value) => line.grind_size = value,
        }
        Ok(())
    }

    pub fn validate_for_submit(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();
        if self.customer.trim().is_empty() {
            issues.push(ValidationIssue::MissingCustomer);
        }
        if self.delivery_method.is_none() {
            issues.push(ValidationIssue::MissingDeliveryMethod);
        }
        for (line, entry) in self.lines.iter().enumerate() {
            if entry.coffee_type.trim().is_empty() {
                issues.push(ValidationIssue::MissingCoffeeType { line });
            }
            if entry.quantity == 0 {
                issues.push(ValidationIssue::InvalidQuantity { line });
            }
            if entry.bag_size.is_none() {
                issues.push(ValidationIssue::MissingBagSize { line });
            }
        }
        ValidationError::check(issues)
    }

    pub fn is_submittable(&self) -> bool {
        self.validate_for_submit().is_ok()
    }

    /// One record per line, each repeating the customer-level fields, in line order.
    pub fn flatten_for_submit(&self) -> Result<Vec<OrderRecord>, DraftError> {
        self.validate_for_submit()?;
        let delivery_method = self
            .delivery_method
            .ok_or_else(|| ValidationError::single(ValidationIssue::MissingDeliveryMethod))?;
        let customer = self.customer.trim();

        self.lines
            .iter()
            .enumerate()
            .map(|(line, entry)| -> Result<OrderRecord, DraftError> {
                let bag_size = entry.bag_size.ok_or_else(|| {
                    ValidationError::single(ValidationIssue::MissingBagSize { line })
                })?;
                Ok(OrderRecord {
                    id: None,
                    customer: customer.to_string(),
                    delivery_method,
                    custom_labels: self.custom_labels,
                    completed: false,
                    coffee_type: entry.coffee_type.clone(),
                    quantity: entry.quantity,
                    bag_size,
                    grind_size: entry.grind_size,
                })
            })
            .collect()
    }

    fn check_index(&self, index: usize) -> Result<(), DraftError> {
        if index < self.lines.len() {
            Ok(())
        } else {
            Err(DraftError::IndexOutOfRange {
                what: "order line",
                index,
                len: self.lines.len(),
            })
        }
    }
}
