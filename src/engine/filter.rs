use crate::model::{FilterCriteria, Villa};

// ── Filter Algorithm ──────────────────────────────────────────────

/// Narrow a villa collection to those matching every active constraint.
///
/// Stable: the result preserves the input's relative order; this is a filter,
/// not a sort. Total: missing amenity data fails the amenity predicate rather
/// than erroring, and a swapped price range is normalized, so the function
/// never fails.
pub fn apply(villas: &[Villa], criteria: &FilterCriteria) -> Vec<Villa> {
    villas
        .iter()
        .filter(|v| matches(v, criteria))
        .cloned()
        .collect()
}

/// One villa against one criteria set. Conjunctive: every active constraint
/// must pass, and every required amenity must be present (exact,
/// case-sensitive string match) — not just any of them.
pub fn matches(villa: &Villa, criteria: &FilterCriteria) -> bool {
    let (min_price, max_price) = criteria.price_bounds();
    if villa.price_per_night < min_price || villa.price_per_night > max_price {
        return false;
    }
    if let Some(guests) = criteria.max_guests
        && villa.max_guests < guests {
            return false;
        }
    criteria
        .amenities
        .iter()
        .all(|required| villa.amenities.iter().any(|a| a == required))
}
