use shared::{numeric::count_from_text, protocol::BlendComponent};

/// Total every valid blend adds up to.
pub const FULL_BLEND: u32 = 100;

/// Upper bound on components in one blend.
pub const MAX_BLEND_COMPONENTS: usize = 4;

/// Sum of all component percentages. Saturates instead of overflowing.
pub fn sum_percentages(components: &[BlendComponent]) -> u32 {
    components
        .iter()
        .fold(0u32, |total, component| total.saturating_add(component.percentage))
}

/// Reads a percentage typed into a form field. Anything that is not a non-negative
/// number reads as 0.
pub fn coerce_percentage(raw: &str) -> u32 {
    count_from_text(raw)
}

/// Clamps one edited percentage so the blend total does not pass 100.
///
/// `others_total` is the sum of every other component. The edited value absorbs the
/// whole overflow; totals at or below 100 are accepted as they are.
pub fn balance_percentage(others_total: u32, requested: u32) -> u32 {
    if others_total.saturating_add(requested) > FULL_BLEND {
        FULL_BLEND.saturating_sub(others_total)
    } else {
        requested
    }
}
