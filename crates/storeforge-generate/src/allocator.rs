use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

/// The requested item total cannot be split across the orders within bounds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "cannot distribute {total_items} items across {order_count} orders \
     with {min_per_order}..={max_per_order} items each"
)]
pub struct AllocationError {
    pub order_count: usize,
    pub total_items: usize,
    pub min_per_order: usize,
    pub max_per_order: usize,
}

/// Split `total_items` line items across `order_count` orders.
///
/// Every order starts at `min_per_order`; the remainder is handed out one unit
/// at a time in a freshly shuffled order each pass, skipping orders already at
/// `max_per_order`. Only the final sum and the bounds are guaranteed, never a
/// particular per-order value.
pub fn allocate(
    order_count: usize,
    total_items: usize,
    min_per_order: usize,
    max_per_order: usize,
    rng: &mut impl Rng,
) -> Result<Vec<usize>, AllocationError> {
    let infeasible = || AllocationError {
        order_count,
        total_items,
        min_per_order,
        max_per_order,
    };

    if min_per_order > max_per_order {
        return Err(infeasible());
    }

    let mut counts = vec![min_per_order; order_count];
    let mut remaining = order_count
        .checked_mul(min_per_order)
        .and_then(|floor| total_items.checked_sub(floor))
        .ok_or_else(infeasible)?;

    let mut indices: Vec<usize> = (0..order_count).collect();
    while remaining > 0 {
        indices.shuffle(rng);
        for &idx in &indices {
            if remaining == 0 {
                break;
            }
            if counts[idx] < max_per_order {
                counts[idx] += 1;
                remaining -= 1;
            }
        }
        if counts.iter().all(|count| *count == max_per_order) {
            break;
        }
    }

    if counts.iter().sum::<usize>() != total_items {
        return Err(infeasible());
    }
    Ok(counts)
}
