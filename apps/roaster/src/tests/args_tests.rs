use composition::{CatalogDraft, DraftError, OrderDraft};
use shared::{
    domain::{BagSize, CoffeeKind, GrindSize},
    protocol::{BlendComponent, CatalogEntry},
};

use super::*;

fn component(name: &str, percentage: &str) -> ComponentArg {
    ComponentArg {
        source_name: name.into(),
        percentage: percentage.into(),
    }
}

#[test]
fn component_splits_on_last_equals() {
    assert_eq!(
        parse_component("Brasil=60").expect("component"),
        component("Brasil", "60")
    );
    assert_eq!(
        parse_component("Decaf=Swiss Water = 15").expect("component"),
        component("Decaf=Swiss Water", "15")
    );
    assert!(parse_component("Brasil").is_err());
    assert!(parse_component("=40").is_err());
}

#[test]
fn line_accepts_optional_grind() {
    assert_eq!(
        parse_line("Brasil:2:5lb").expect("line"),
        LineArg {
            coffee_type: "Brasil".into(),
            quantity: 2,
            bag_size: BagSize::FiveLb,
            grind_size: GrindSize::WholeBean,
        }
    );
    assert_eq!(
        parse_line("Ethiopia:1:2LB:cold brew")
            .expect("line")
            .grind_size,
        GrindSize::ColdBrew
    );
}

#[test]
fn line_rejects_bad_parts() {
    assert!(parse_line("Brasil:2").is_err());
    assert!(parse_line("Brasil:two:5lb").is_err());
    assert_eq!(
        parse_line("Brasil:2:3lb").expect_err("bag size"),
        "unknown bag size '3lb'"
    );
}

#[test]
fn components_report_clamped_percentages() {
    let mut draft = CatalogDraft::new(CoffeeKind::Blend);

    let clamped = apply_components(
        &mut draft,
        &[component("Brasil", "60"), component("Ethiopia", "55")],
    )
    .expect("apply");

    assert_eq!(
        draft.components(),
        &[
            BlendComponent::new("Brasil", 60),
            BlendComponent::new("Ethiopia", 40)
        ]
    );
    assert_eq!(
        clamped,
        vec![ClampedPercentage {
            source_name: "Ethiopia".into(),
            requested: 55,
            applied: 40,
        }]
    );
}

#[test]
fn components_replace_existing_blend() {
    let mut draft = CatalogDraft::from_entry(
        CatalogEntry::blend(
            "House",
            vec![
                BlendComponent::new("Brasil", 50),
                BlendComponent::new("Ethiopia", 30),
                BlendComponent::new("Colombia", 20),
            ],
        )
        .with_id("3"),
    );

    let clamped = apply_components(
        &mut draft,
        &[component("Colombia", "70"), component("Sumatra", "30")],
    )
    .expect("apply");

    assert!(clamped.is_empty());
    assert_eq!(
        draft.components(),
        &[
            BlendComponent::new("Colombia", 70),
            BlendComponent::new("Sumatra", 30)
        ]
    );
    assert!(draft.is_submittable());
}

#[test]
fn components_on_single_origin_are_refused() {
    let mut draft = CatalogDraft::new(CoffeeKind::SingleOrigin);
    let err = apply_components(&mut draft, &[component("Brasil", "100")]).expect_err("single");
    assert_eq!(err, DraftError::NotABlend);
}

#[test]
fn lines_fill_order_in_sequence() {
    let mut draft = OrderDraft::new();
    let lines = [
        parse_line("Brasil:2:5lb").expect("line"),
        parse_line("Ethiopia:1:2lb:Drip").expect("line"),
    ];

    apply_lines(&mut draft, &lines).expect("apply");

    assert_eq!(draft.lines().len(), 2);
    assert_eq!(draft.lines()[1].coffee_type, "Ethiopia");
    assert_eq!(draft.lines()[1].bag_size, Some(BagSize::TwoLb));
    assert_eq!(draft.lines()[1].grind_size, GrindSize::Drip);
}
