//! Reference instances with known answers.

use ferry_core::{
    find_minimal_horizon, solve_at_horizon, verify_schedule, Error, Instance, MinisatBackend,
    SearchOptions,
};

// (durations, capacity, horizon): feasible, and minimal
const POSITIVE: &[(&[u32], usize, u32)] = &[
    (&[1, 3, 6, 8], 2, 18),
    (&[1, 1], 2, 1),
    (&[1, 1, 1, 1], 4, 1),
    (&[1, 1, 1, 1], 2, 5),
    (&[2, 3, 4], 2, 9),
    (&[1, 2, 5, 10], 2, 17),
    (&[1, 4, 10, 12, 5], 2, 31),
];

// (durations, capacity, horizon): infeasible
const NEGATIVE: &[(&[u32], usize, u32)] = &[
    (&[1, 1, 1, 1], 3, 1),
    (&[1, 1, 1, 1], 2, 4),
    (&[2, 3, 4], 2, 8),
    (&[1, 2, 5, 10], 2, 16),
    (&[1, 4, 10, 12, 5], 2, 15),
    (&[1, 4, 10, 12, 5], 2, 30),
];

fn instance(durations: &[u32], capacity: usize) -> Instance {
    Instance::new(durations.to_vec(), capacity).unwrap()
}

#[test]
fn test_fixed_horizon_positive() {
    for &(durations, capacity, horizon) in POSITIVE {
        let instance = instance(durations, capacity);
        let schedule = solve_at_horizon(&instance, horizon, &mut MinisatBackend::default())
            .unwrap()
            .unwrap_or_else(|| panic!("{:?} c={} T={} should be feasible", durations, capacity, horizon));
        verify_schedule(durations, capacity, horizon, &schedule).unwrap();
    }
}

#[test]
fn test_fixed_horizon_negative() {
    for &(durations, capacity, horizon) in NEGATIVE {
        let instance = instance(durations, capacity);
        let schedule =
            solve_at_horizon(&instance, horizon, &mut MinisatBackend::default()).unwrap();
        assert!(
            schedule.is_none(),
            "{:?} c={} T={} should be infeasible",
            durations,
            capacity,
            horizon
        );
    }
}

#[test]
fn test_minimal_horizons() {
    for &(durations, capacity, horizon) in POSITIVE {
        let instance = instance(durations, capacity);
        let solution = find_minimal_horizon(
            &instance,
            &SearchOptions::default(),
            &mut MinisatBackend::default(),
        )
        .unwrap();
        assert_eq!(solution.horizon, horizon, "{:?} c={}", durations, capacity);
        verify_schedule(durations, capacity, solution.horizon, &solution.schedule).unwrap();
    }
}

#[test]
fn test_minimum_is_tight() {
    for &(durations, capacity, horizon) in POSITIVE {
        let instance = instance(durations, capacity);
        let below = solve_at_horizon(&instance, horizon - 1, &mut MinisatBackend::default())
            .unwrap();
        assert!(below.is_none(), "{:?} c={} T={}", durations, capacity, horizon - 1);
    }
}

#[test]
fn test_large_instance_at_fixed_horizon() {
    let durations = [1, 3, 6, 8, 2, 10, 4, 12, 15];
    let instance = instance(&durations, 2);
    let schedule = solve_at_horizon(&instance, 52, &mut MinisatBackend::default())
        .unwrap()
        .expect("52 is feasible");
    verify_schedule(&durations, 2, 52, &schedule).unwrap();
}

#[test]
#[ignore = "proves infeasibility for 52 horizons of a 9-agent instance"]
fn test_large_instance_minimal_horizon() {
    let durations = [1, 3, 6, 8, 2, 10, 4, 12, 15];
    let instance = instance(&durations, 2);
    assert!(solve_at_horizon(&instance, 26, &mut MinisatBackend::default())
        .unwrap()
        .is_none());

    let solution = find_minimal_horizon(
        &instance,
        &SearchOptions::default(),
        &mut MinisatBackend::default(),
    )
    .unwrap();
    assert_eq!(solution.horizon, 52);
}

#[test]
fn test_single_seat_shuttle_terminates() {
    // Rejected up front instead of scanning forever
    let err = Instance::new(vec![1, 2, 3], 1).unwrap_err();
    assert!(matches!(err, Error::InvalidInput { .. }));

    // A lone agent needs no return trip
    let solution = find_minimal_horizon(
        &instance(&[7], 1),
        &SearchOptions::default(),
        &mut MinisatBackend::default(),
    )
    .unwrap();
    assert_eq!(solution.horizon, 7);
    assert_eq!(solution.schedule.len(), 1);
}

#[test]
fn test_larger_capacity_single_trip() {
    let solution = find_minimal_horizon(
        &instance(&[3, 1, 4, 1, 5], 5),
        &SearchOptions::default(),
        &mut MinisatBackend::default(),
    )
    .unwrap();
    assert_eq!(solution.horizon, 5);
}
