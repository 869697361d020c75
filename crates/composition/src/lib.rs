//! Draft models behind the catalog editor and the order form.
//!
//! Both drafts follow the same shape: created empty, mutated only through their own
//! operations, allowed to sit in an invalid state while the user types, and checked
//! once on submit before they are turned into the backend's wire records.

pub mod balance;
pub mod catalog_draft;
pub mod error;
pub mod order_draft;

pub use balance::{
    balance_percentage, coerce_percentage, sum_percentages, FULL_BLEND, MAX_BLEND_COMPONENTS,
};
pub use catalog_draft::{CatalogDraft, ComponentField};
pub use error::{DraftError, IssueTarget, ValidationError, ValidationIssue};
pub use order_draft::{LineField, OrderDraft, OrderField, OrderLine};

#[cfg(test)]
#[path = "tests/catalog_draft_tests.rs"]
mod catalog_draft_tests;

#[cfg(test)]
#[path = "tests/order_draft_tests.rs"]
mod order_draft_tests;
