use std::{collections::BTreeMap, sync::Arc};

use composition::{ComponentField, DraftError, LineField, OrderField, ValidationIssue};
use shared::{
    domain::{BagSize, CoffeeId, CoffeeKind, DeliveryMethod, GrindSize, OrderId},
    error::ErrorCode,
    protocol::{
        BlendComponent, CatalogEntry, CoffeeCatalog, CustomerOrder, OrderLineSummary,
        ProductionSummary, RoastingCalculation,
    },
};

use super::*;

fn seeded_catalog() -> CoffeeCatalog {
    CoffeeCatalog {
        single_origins: vec![
            CatalogEntry::single_origin("Brasil").with_id("1"),
            CatalogEntry::single_origin("Ethiopia").with_id("2"),
        ],
        blends: vec![CatalogEntry::blend(
            "House",
            vec![
                BlendComponent::new("Brasil", 60),
                BlendComponent::new("Ethiopia", 50),
            ],
        )
        .with_id("3")],
    }
}

fn roast(coffee_type: &str, total_pounds: f64, batch_size: f64) -> RoastingCalculation {
    RoastingCalculation {
        coffee_type: coffee_type.into(),
        total_pounds,
        number_of_roasts: 1,
        batch_size,
    }
}

fn customer_order(id: &str, customer: &str, completed: bool) -> CustomerOrder {
    CustomerOrder {
        id: OrderId::new(id),
        customer: customer.into(),
        coffees: vec![OrderLineSummary {
            coffee_type: "Brasil".into(),
            quantity: 1,
            bag_size: "5lb".into(),
            grind_size: "Whole Bean".into(),
        }],
        completed,
    }
}

fn seeded_production() -> ProductionSummary {
    let mut orders_by_delivery_method = BTreeMap::new();
    orders_by_delivery_method.insert(
        "Deliver".to_string(),
        vec![
            customer_order("10", "Cafe Uno", false),
            customer_order("11", "Cafe Dos", true),
        ],
    );
    orders_by_delivery_method.insert(
        "Shipped".to_string(),
        vec![customer_order("12", "Mail Order", false)],
    );
    orders_by_delivery_method.insert(
        "Pickup".to_string(),
        vec![customer_order("13", "Jane", false)],
    );
    ProductionSummary {
        roasting_calculations: vec![
            roast("Brasil", 40.0, 20.0),
            roast("Ethiopia", 12.5, 12.5),
            roast("Colombia", 30.0, 15.0),
        ],
        total_batches: 5,
        orders_by_delivery_method,
        ..ProductionSummary::default()
    }
}

fn fill_jane_order(entry: &mut OrderEntry) {
    let draft = entry.draft_mut();
    draft.set_customer_field(OrderField::Customer("Jane".into()));
    draft.set_customer_field(OrderField::DeliveryMethod(Some(DeliveryMethod::Pickup)));
    draft.set_customer_field(OrderField::CustomLabels(true));
    draft
        .set_line_field(0, LineField::CoffeeType("Brasil".into()))
        .expect("coffee");
    draft
        .set_line_field(0, LineField::Quantity(2))
        .expect("quantity");
    draft
        .set_line_field(0, LineField::BagSize(Some(BagSize::FiveLb)))
        .expect("bag");
    let second = draft.add_line();
    draft
        .set_line_field(second, LineField::CoffeeType("Ethiopia".into()))
        .expect("coffee");
    draft
        .set_line_field(second, LineField::Quantity(1))
        .expect("quantity");
    draft
        .set_line_field(second, LineField::BagSize(Some(BagSize::TwoLb)))
        .expect("bag");
    draft
        .set_line_field(second, LineField::GrindSize(GrindSize::Drip))
        .expect("grind");
}

#[tokio::test]
async fn new_blend_is_created_and_catalog_reloaded() {
    let backend = Arc::new(InMemoryBackend::new().with_catalog(seeded_catalog()));
    let mut editor = CatalogEditor::new(backend.clone());
    editor.refresh().await.expect("load");

    let draft = editor.open_new(CoffeeKind::Blend);
    draft.set_name("Espresso");
    draft
        .set_component_field(0, ComponentField::SourceName("Brasil".into()))
        .expect("source");
    draft
        .set_component_field(0, ComponentField::percentage_input("70"))
        .expect("percentage");
    let second = draft.add_component().expect("add");
    draft
        .set_component_field(second, ComponentField::SourceName("Ethiopia".into()))
        .expect("source");
    draft
        .set_component_field(second, ComponentField::Percentage(30))
        .expect("percentage");

    let saved = editor.submit().await.expect("submit");

    assert!(saved.id.is_some());
    assert!(editor.draft().is_none());
    assert!(editor.catalog().find_by_name("Espresso").is_some());
    assert_eq!(backend.catalog().await.blends.len(), 2);
    assert_eq!(
        Notification::success(Action::AddCoffee).map(|n| n.message),
        Some("Coffee added successfully".to_string())
    );
}

#[tokio::test]
async fn invalid_blend_keeps_draft_and_skips_backend() {
    let backend = Arc::new(InMemoryBackend::new().with_catalog(seeded_catalog()));
    let mut editor = CatalogEditor::new(backend.clone());
    editor.refresh().await.expect("load");

    editor
        .open_edit(&CoffeeId::new("3"))
        .expect("open house blend");
    let before = editor.draft().cloned();

    let err = editor.submit().await.expect_err("sum is 110");

    assert_eq!(editor.draft().cloned(), before);
    assert_eq!(backend.write_count().await, 0);
    let SubmitError::Draft(DraftError::Validation(validation)) = &err else {
        panic!("unexpected error: {err:?}");
    };
    assert!(validation.has(&ValidationIssue::PercentageTotal { total: 110 }));
    let notification = Notification::submit_failure(Action::UpdateCoffee, &err);
    assert!(notification.is_error());
    assert_eq!(notification.message, "Blend percentages must total 100%");
}

#[tokio::test]
async fn rejected_save_keeps_draft_open() {
    let backend = Arc::new(InMemoryBackend::new().with_catalog(seeded_catalog()));
    let mut editor = CatalogEditor::new(backend.clone());
    editor.refresh().await.expect("load");

    editor.open_new(CoffeeKind::SingleOrigin).set_name("Brasil");
    let before = editor.draft().cloned();

    let err = editor.submit().await.expect_err("duplicate name");

    assert_eq!(editor.draft().cloned(), before);
    let SubmitError::Gateway(gateway) = &err else {
        panic!("unexpected error: {err:?}");
    };
    assert_eq!(gateway.code(), Some(ErrorCode::Conflict));
    assert_eq!(
        Notification::submit_failure(Action::AddCoffee, &err).message,
        "Error saving coffee"
    );
}

#[tokio::test]
async fn editing_existing_coffee_updates_in_place() {
    let backend = Arc::new(InMemoryBackend::new().with_catalog(seeded_catalog()));
    let mut editor = CatalogEditor::new(backend.clone());
    editor.refresh().await.expect("load");

    editor
        .open_edit(&CoffeeId::new("2"))
        .expect("open")
        .set_name("  Ethiopia Guji ");
    let saved = editor.submit().await.expect("update");

    assert_eq!(saved.id, Some(CoffeeId::new("2")));
    assert_eq!(saved.name, "Ethiopia Guji");
    assert_eq!(editor.catalog().single_origins.len(), 2);
    assert!(editor.catalog().find_by_name("Ethiopia").is_none());
}

#[tokio::test]
async fn closing_a_draft_discards_it_without_writing() {
    let backend = Arc::new(InMemoryBackend::new().with_catalog(seeded_catalog()));
    let mut editor = CatalogEditor::new(backend.clone());
    editor.refresh().await.expect("load");

    let draft = editor.open_new(CoffeeKind::Blend);
    draft.set_name("Unsaved");
    draft
        .set_component_field(0, ComponentField::SourceName("Brasil".into()))
        .expect("source");
    draft
        .set_component_field(0, ComponentField::Percentage(100))
        .expect("percentage");

    let discarded = editor.close().expect("draft was open");

    assert_eq!(discarded.name(), "Unsaved");
    assert!(editor.draft().is_none());
    assert!(editor.close().is_none());
    assert!(matches!(editor.submit().await, Err(SubmitError::NoDraft)));
    assert_eq!(backend.write_count().await, 0);
    assert_eq!(backend.catalog().await, seeded_catalog());
}

#[tokio::test]
async fn open_edit_requires_loaded_coffee() {
    let backend = Arc::new(InMemoryBackend::new());
    let mut editor = CatalogEditor::new(backend);

    let err = editor
        .open_edit(&CoffeeId::new("99"))
        .expect_err("unknown id");

    assert!(matches!(err, SubmitError::UnknownCoffee(id) if id.as_str() == "99"));
    assert!(editor.draft().is_none());
}

#[tokio::test]
async fn submit_without_draft_is_an_error() {
    let mut editor = CatalogEditor::new(Arc::new(InMemoryBackend::new()));
    assert!(matches!(
        editor.submit().await,
        Err(SubmitError::NoDraft)
    ));
}

#[tokio::test]
async fn dangling_components_lists_unknown_sources() {
    let backend = Arc::new(InMemoryBackend::new().with_catalog(seeded_catalog()));
    let mut editor = CatalogEditor::new(backend);
    editor.refresh().await.expect("load");

    let draft = editor.open_new(CoffeeKind::Blend);
    draft
        .set_component_field(0, ComponentField::SourceName("Sumatra".into()))
        .expect("source");
    draft.add_component().expect("add");
    draft
        .set_component_field(1, ComponentField::SourceName("Brasil".into()))
        .expect("source");
    draft.add_component().expect("add");

    assert_eq!(editor.dangling_components(), vec!["Sumatra"]);
    assert_eq!(editor.source_options(), vec!["Brasil", "Ethiopia"]);
}

#[tokio::test]
async fn delete_removes_coffee_locally_and_remotely() {
    let backend = Arc::new(InMemoryBackend::new().with_catalog(seeded_catalog()));
    let mut editor = CatalogEditor::new(backend.clone());
    editor.refresh().await.expect("load");

    editor.delete(&CoffeeId::new("1")).await.expect("delete");

    assert_eq!(editor.source_options(), vec!["Ethiopia"]);
    assert!(backend.catalog().await.find(&CoffeeId::new("1")).is_none());

    let err = editor
        .delete(&CoffeeId::new("1"))
        .await
        .expect_err("already gone");
    assert_eq!(err.code(), Some(ErrorCode::NotFound));
}

#[tokio::test]
async fn failed_refresh_keeps_previous_catalog() {
    let backend = Arc::new(InMemoryBackend::new().with_catalog(seeded_catalog()));
    let mut editor = CatalogEditor::new(backend.clone());
    editor.refresh().await.expect("load");

    backend.set_unavailable(true).await;
    let err = editor.refresh().await.expect_err("offline");

    assert!(matches!(err, GatewayError::Unavailable(_)));
    assert_eq!(editor.catalog(), &seeded_catalog());
}

#[tokio::test]
async fn order_submit_resets_form_on_success() {
    let backend = Arc::new(InMemoryBackend::new());
    let mut entry = OrderEntry::new(backend.clone());
    fill_jane_order(&mut entry);

    let persisted = entry.submit().await.expect("submit");

    assert_eq!(persisted.len(), 2);
    assert!(persisted.iter().all(|record| record.id.is_some()));
    assert!(persisted.iter().all(|record| !record.completed));
    assert_eq!(entry.draft(), &composition::OrderDraft::new());
    let stored = backend.orders().await;
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[1].grind_size, GrindSize::Drip);
}

#[tokio::test]
async fn order_submit_failure_preserves_form() {
    let backend = Arc::new(InMemoryBackend::new());
    backend.set_unavailable(true).await;
    let mut entry = OrderEntry::new(backend.clone());
    fill_jane_order(&mut entry);
    let before = entry.draft().clone();

    let err = entry.submit().await.expect_err("offline");

    assert_eq!(entry.draft(), &before);
    assert!(matches!(err, SubmitError::Gateway(GatewayError::Unavailable(_))));
    assert_eq!(
        Notification::submit_failure(Action::SubmitOrder, &err).message,
        "Error submitting order. Please try again."
    );
}

#[tokio::test]
async fn incomplete_order_is_not_sent() {
    let backend = Arc::new(InMemoryBackend::new());
    let mut entry = OrderEntry::new(backend.clone());
    entry
        .draft_mut()
        .set_customer_field(OrderField::Customer("Jane".into()));

    let err = entry.submit().await.expect_err("missing delivery method");

    assert!(matches!(err, SubmitError::Draft(DraftError::Validation(_))));
    assert!(backend.orders().await.is_empty());
    assert_eq!(entry.draft().customer(), "Jane");

    entry.discard();
    assert_eq!(entry.draft().customer(), "");
}

#[tokio::test]
async fn board_sorts_rows_and_stamps_load_time() {
    let backend = Arc::new(InMemoryBackend::new().with_production(seeded_production()));
    let mut board = ProductionBoard::new(backend);
    assert!(board.loaded_at().is_none());

    board.refresh().await.expect("load");

    let order: Vec<&str> = board
        .summary()
        .roasting_calculations
        .iter()
        .map(|calc| calc.coffee_type.as_str())
        .collect();
    assert_eq!(order, vec!["Ethiopia", "Colombia", "Brasil"]);
    assert!(board.loaded_at().is_some());
}

#[tokio::test]
async fn dashboard_counts_orders_and_remaining_pounds() {
    let backend = Arc::new(InMemoryBackend::new().with_production(seeded_production()));
    let mut board = ProductionBoard::new(backend);
    board.refresh().await.expect("load");

    assert_eq!(
        board.dashboard(),
        DashboardStats {
            total_orders: 4,
            pounds_to_roast: 82.5,
            completed_orders: 1,
            pending_deliveries: 2,
        }
    );

    board
        .set_roast_completed("Brasil", true)
        .await
        .expect("roast done");
    assert!(board.summary().is_roast_completed("Brasil"));
    assert_eq!(board.dashboard().pounds_to_roast, 42.5);
}

#[tokio::test]
async fn completing_and_deleting_orders_reloads_board() {
    let backend = Arc::new(InMemoryBackend::new().with_production(seeded_production()));
    let mut board = ProductionBoard::new(backend.clone());
    board.refresh().await.expect("load");

    board
        .set_order_completed(&OrderId::new("10"), true)
        .await
        .expect("complete");
    assert_eq!(board.dashboard().completed_orders, 2);
    assert_eq!(board.dashboard().pending_deliveries, 1);

    board.delete_order(&OrderId::new("13")).await.expect("delete");
    assert_eq!(board.dashboard().total_orders, 3);
    assert!(!board
        .summary()
        .customer_orders()
        .any(|(_, order)| order.customer == "Jane"));
    assert_eq!(backend.write_count().await, 2);
}

#[tokio::test]
async fn failed_board_write_leaves_summary_unchanged() {
    let backend = Arc::new(InMemoryBackend::new().with_production(seeded_production()));
    let mut board = ProductionBoard::new(backend.clone());
    board.refresh().await.expect("load");
    let before = board.summary().clone();

    backend.set_unavailable(true).await;
    let err = board
        .set_order_completed(&OrderId::new("10"), true)
        .await
        .expect_err("offline");

    assert_eq!(board.summary(), &before);
    let notification = Notification::failure(Action::UpdateOrderStatus, &err);
    assert_eq!(notification.message, "Error updating order status");
    assert_eq!(
        notification.detail.as_deref(),
        Some("backend unavailable: in-memory backend is offline")
    );
}

#[test]
fn loads_are_silent_on_success() {
    assert!(Notification::success(Action::LoadCatalog).is_none());
    assert!(Notification::success(Action::LoadProduction).is_none());
    let done = Notification::success(Action::SubmitOrder).expect("message");
    assert_eq!(done.severity, Severity::Success);
    assert_eq!(done.to_string(), "Order submitted successfully!");
}
