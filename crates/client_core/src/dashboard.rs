use serde::Serialize;
use shared::{domain::DeliveryMethod, protocol::ProductionSummary};

/// Headline counters shown above the production board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_orders: usize,
    /// Pounds still to roast, excluding coffees already marked roasted.
    pub pounds_to_roast: f64,
    pub completed_orders: usize,
    /// Open orders that leave by delivery or shipping rather than pickup.
    pub pending_deliveries: usize,
}

impl DashboardStats {
    pub fn from_summary(summary: &ProductionSummary) -> Self {
        let mut stats = DashboardStats {
            pounds_to_roast: summary
                .roasting_calculations
                .iter()
                .filter(|calc| !summary.is_roast_completed(&calc.coffee_type))
                .map(|calc| calc.total_pounds)
                .sum(),
            ..DashboardStats::default()
        };

        for (method, order) in summary.customer_orders() {
            stats.total_orders += 1;
            if order.completed {
                stats.completed_orders += 1;
            } else if leaves_the_roastery(method) {
                stats.pending_deliveries += 1;
            }
        }
        stats
    }
}

fn leaves_the_roastery(method: &str) -> bool {
    matches!(
        method.parse::<DeliveryMethod>(),
        Ok(DeliveryMethod::Deliver | DeliveryMethod::Shipped)
    )
}
