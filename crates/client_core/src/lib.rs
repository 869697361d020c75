pub mod backend;
pub mod catalog_editor;
pub mod dashboard;
pub mod error;
pub mod http;
pub mod memory;
pub mod notify;
pub mod order_entry;
pub mod production_board;

pub use backend::{CatalogStore, OrderGateway};
pub use catalog_editor::CatalogEditor;
pub use dashboard::DashboardStats;
pub use error::{GatewayError, SubmitError};
pub use http::HttpBackend;
pub use memory::InMemoryBackend;
pub use notify::{Action, Notification, Severity};
pub use order_entry::OrderEntry;
pub use production_board::ProductionBoard;

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod http_tests;

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod controller_tests;
