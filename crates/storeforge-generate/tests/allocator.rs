use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use storeforge_generate::{AllocationError, allocate};

#[test]
fn feasible_requests_sum_exactly_within_bounds() {
    let cases = [
        (1, 1, 1, 5),
        (1, 5, 1, 5),
        (10, 10, 1, 5),
        (10, 37, 1, 5),
        (200, 400, 1, 5),
        (200, 1000, 1, 5),
        (7, 21, 2, 4),
        (5, 0, 0, 3),
        (13, 13, 0, 1),
    ];

    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for (orders, total, min, max) in cases {
            let counts = allocate(orders, total, min, max, &mut rng)
                .unwrap_or_else(|err| panic!("seed {seed}: {err}"));
            assert_eq!(counts.len(), orders);
            assert_eq!(counts.iter().sum::<usize>(), total, "seed {seed}");
            assert!(
                counts.iter().all(|count| (min..=max).contains(count)),
                "seed {seed}: {counts:?} outside {min}..={max}"
            );
        }
    }
}

#[test]
fn over_capacity_request_is_infeasible() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let err = allocate(3, 20, 1, 5, &mut rng).expect_err("3 * 5 < 20");
    assert_eq!(
        err,
        AllocationError {
            order_count: 3,
            total_items: 20,
            min_per_order: 1,
            max_per_order: 5,
        }
    );
}

#[test]
fn under_floor_request_is_infeasible() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    assert!(allocate(10, 5, 1, 5, &mut rng).is_err());
}

#[test]
fn allocation_is_reproducible_per_seed() {
    let mut a = ChaCha8Rng::seed_from_u64(99);
    let mut b = ChaCha8Rng::seed_from_u64(99);
    assert_eq!(
        allocate(50, 120, 1, 5, &mut a),
        allocate(50, 120, 1, 5, &mut b)
    );
}
