use composition::{CatalogDraft, ComponentField, LineField, OrderDraft, OrderField};
use serde_json::json;
use shared::domain::{BagSize, CoffeeKind, DeliveryMethod, GrindSize};

#[test]
fn flattened_order_matches_backend_array_shape() {
    let mut draft = OrderDraft::new();
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

    let records = draft.flatten_for_submit().expect("flatten");
    let body = serde_json::to_value(&records).expect("serialize");
    assert_eq!(
        body,
        json!([
            {
                "customer": "Jane",
                "deliveryMethod": "Pickup",
                "customLabels": true,
                "completed": false,
                "coffeeType": "Brasil",
                "quantity": 2,
                "bagSize": "5lb",
                "grindSize": "Whole Bean"
            },
            {
                "customer": "Jane",
                "deliveryMethod": "Pickup",
                "customLabels": true,
                "completed": false,
                "coffeeType": "Ethiopia",
                "quantity": 1,
                "bagSize": "2lb",
                "grindSize": "Drip"
            }
        ])
    );
}

#[test]
fn interactive_blend_edit_produces_catalog_payload() {
    let mut draft = CatalogDraft::new(CoffeeKind::Blend);
    draft.set_name("Two Tigers");
    draft
        .set_component_field(0, ComponentField::SourceName("Brasil".into()))
        .expect("source");
    draft
        .set_component_field(0, ComponentField::percentage_input("60"))
        .expect("percentage");
    let second = draft.add_component().expect("add");
    draft
        .set_component_field(second, ComponentField::SourceName("Ethiopia".into()))
        .expect("source");
    draft
        .set_component_field(second, ComponentField::percentage_input("55"))
        .expect("percentage");

    let payload = draft.to_persistable_payload().expect("payload");
    assert_eq!(
        serde_json::to_value(&payload).expect("serialize"),
        json!({
            "name": "Two Tigers",
            "type": "blend",
            "components": [
                { "coffee": "Brasil", "percentage": 60 },
                { "coffee": "Ethiopia", "percentage": 40 }
            ]
        })
    );
}
