use std::fmt;

use composition::{DraftError, ValidationIssue};

use crate::error::SubmitError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    AddCoffee,
    UpdateCoffee,
    DeleteCoffee,
    LoadCatalog,
    SubmitOrder,
    LoadProduction,
    UpdateOrderStatus,
    DeleteOrder,
    UpdateRoast,
}

impl Action {
    fn success_message(self) -> Option<&'static str> {
        match self {
            Action::AddCoffee => Some("Coffee added successfully"),
            Action::UpdateCoffee => Some("Coffee updated successfully"),
            Action::DeleteCoffee => Some("Coffee deleted successfully"),
            Action::SubmitOrder => Some("Order submitted successfully!"),
            Action::UpdateOrderStatus => Some("Order status updated"),
            Action::DeleteOrder => Some("Order deleted"),
            Action::UpdateRoast => Some("Roast completion updated"),
            Action::LoadCatalog | Action::LoadProduction => None,
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Action::AddCoffee | Action::UpdateCoffee => "Error saving coffee",
            Action::DeleteCoffee => "Error deleting coffee",
            Action::LoadCatalog => "Error fetching coffees",
            Action::SubmitOrder => "Error submitting order. Please try again.",
            Action::LoadProduction => "Error fetching roasting calculations",
            Action::UpdateOrderStatus => "Error updating order status",
            Action::DeleteOrder => "Error deleting order",
            Action::UpdateRoast => "Error updating roast completion",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    /// Underlying error text, for logs or an expandable detail line.
    pub detail: Option<String>,
}

impl Notification {
    /// `None` for silent actions such as loads.
    pub fn success(action: Action) -> Option<Self> {
        action.success_message().map(|message| Notification {
            severity: Severity::Success,
            message: message.to_string(),
            detail: None,
        })
    }

    pub fn failure(action: Action, error: &dyn std::error::Error) -> Self {
        Notification {
            severity: Severity::Error,
            message: action.failure_message().to_string(),
            detail: Some(error.to_string()),
        }
    }

    /// Like [`Notification::failure`], but a blend whose percentages are off gets the
    /// dedicated message instead of the generic save error.
    pub fn submit_failure(action: Action, error: &SubmitError) -> Self {
        let mut notification = Notification::failure(action, error);
        if let SubmitError::Draft(DraftError::Validation(validation)) = error {
            if validation
                .issues()
                .iter()
                .any(|issue| matches!(issue, ValidationIssue::PercentageTotal { .. }))
            {
                notification.message = "Blend percentages must total 100%".to_string();
            }
        }
        notification
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{} ({detail})", self.message),
            None => f.write_str(&self.message),
        }
    }
}
