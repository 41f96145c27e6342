//! Weighted sampling over template pools.

use super::seed::SeededRng;

/// Pick one item by weight: sum the weights, draw `random() * total`, and
/// walk the list subtracting weights until the remainder reaches zero.
/// Ties resolve to the first qualifying item.
///
/// Items with a non-positive or non-finite weight are never selected. An
/// empty or fully zero-weighted pool returns `None`; callers treat that as
/// "pool exhausted", not as an error.
pub fn weighted_pick<'a, T, F>(items: &'a [T], weight_fn: F, rng: &mut SeededRng) -> Option<&'a T>
where
    F: Fn(&T) -> f64,
{
    let weight_of = |item: &T| {
        let w = weight_fn(item);
        if w.is_finite() && w > 0.0 {
            w
        } else {
            0.0
        }
    };

    let total: f64 = items.iter().map(weight_of).sum();
    if total <= 0.0 {
        return None;
    }

    let mut remaining = rng.next_f64() * total;
    for item in items {
        let w = weight_of(item);
        if w <= 0.0 {
            continue;
        }
        remaining -= w;
        if remaining <= 0.0 {
            return Some(item);
        }
    }

    // Float slack can leave a sliver of remainder after the walk; the last
    // weighted item absorbs it.
    items.iter().rev().find(|item| weight_of(item) > 0.0)
}
