//! Parsers for the repeated `--component` and `--line` flags, and the code that feeds
//! them through the same draft operations a form would use.

use composition::{
    coerce_percentage, CatalogDraft, ComponentField, DraftError, LineField, OrderDraft,
};
use shared::domain::{BagSize, GrindSize};

/// `NAME=PCT`, e.g. `Brasil=60`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentArg {
    pub source_name: String,
    pub percentage: String,
}

/// `COFFEE:QTY:BAG[:GRIND]`, e.g. `Brasil:2:5lb:Drip`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineArg {
    pub coffee_type: String,
    pub quantity: u32,
    pub bag_size: BagSize,
    pub grind_size: GrindSize,
}

/// A percentage the blend total forced down from what was asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClampedPercentage {
    pub source_name: String,
    pub requested: u32,
    pub applied: u32,
}

pub fn parse_component(raw: &str) -> Result<ComponentArg, String> {
    let (name, percentage) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=PCT, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("component '{raw}' is missing a coffee name"));
    }
    Ok(ComponentArg {
        source_name: name.to_string(),
        percentage: percentage.trim().to_string(),
    })
}

pub fn parse_line(raw: &str) -> Result<LineArg, String> {
    let parts: Vec<&str> = raw.split(':').map(str::trim).collect();
    let (coffee_type, quantity, bag_size, grind_size) = match parts.as_slice() {
        [coffee, quantity, bag] => (*coffee, *quantity, *bag, None),
        [coffee, quantity, bag, grind] => (*coffee, *quantity, *bag, Some(*grind)),
        _ => return Err(format!("expected COFFEE:QTY:BAG[:GRIND], got '{raw}'")),
    };
    let quantity = quantity
        .parse::<u32>()
        .map_err(|_| format!("quantity '{quantity}' in '{raw}' is not a whole number"))?;
    let bag_size = bag_size.parse::<BagSize>().map_err(|err| err.to_string())?;
    let grind_size = match grind_size {
        Some(grind) => grind.parse::<GrindSize>().map_err(|err| err.to_string())?,
        None => GrindSize::default(),
    };
    Ok(LineArg {
        coffee_type: coffee_type.to_string(),
        quantity,
        bag_size,
        grind_size,
    })
}

/// Replaces the draft's components with `components`, entered in order as if typed
/// into an empty blend form. Returns every percentage the running total clamped.
pub fn apply_components(
    draft: &mut CatalogDraft,
    components: &[ComponentArg],
) -> Result<Vec<ClampedPercentage>, DraftError> {
    while draft.components().len() > components.len().max(1) {
        draft.remove_component(draft.components().len() - 1)?;
    }
    for index in 0..draft.components().len() {
        draft.set_component_field(index, ComponentField::Percentage(0))?;
    }

    let mut clamped = Vec::new();
    for (index, component) in components.iter().enumerate() {
        if index >= draft.components().len() {
            draft.add_component()?;
        }
        draft.set_component_field(
            index,
            ComponentField::SourceName(component.source_name.clone()),
        )?;
        draft.set_component_field(index, ComponentField::percentage_input(&component.percentage))?;

        let requested = coerce_percentage(&component.percentage);
        let applied = draft.components()[index].percentage;
        if applied != requested {
            clamped.push(ClampedPercentage {
                source_name: component.source_name.clone(),
                requested,
                applied,
            });
        }
    }
    Ok(clamped)
}

/// Fills the draft's lines from `lines`, reusing the initial empty line.
pub fn apply_lines(draft: &mut OrderDraft, lines: &[LineArg]) -> Result<(), DraftError> {
    for (position, line) in lines.iter().enumerate() {
        let index = if position < draft.lines().len() {
            position
        } else {
            draft.add_line()
        };
        draft.set_line_field(index, LineField::CoffeeType(line.coffee_type.clone()))?;
        draft.set_line_field(index, LineField::Quantity(line.quantity))?;
        draft.set_line_field(index, LineField::BagSize(Some(line.bag_size)))?;
        draft.set_line_field(index, LineField::GrindSize(line.grind_size))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/args_tests.rs"]
mod tests;
