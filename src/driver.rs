//! Horizon search: encode, solve and decode at increasing horizons until the
//! first satisfiable one.
//!
//! Feasibility is monotone in the horizon (the vehicle can always idle), so
//! the first satisfiable horizon of a linear scan is the true minimum.

use tracing::{debug, info, warn};

use crate::decoder::{decode, Schedule};
use crate::encoder::encode;
use crate::error::{Error, Result};
use crate::instance::Instance;
use crate::solver::{SatBackend, Verdict};

/// Where the horizon scan starts and where the caller wants it to give up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchOptions {
    pub min_horizon: u32,
    /// Caller cap. The escort bound of the instance always applies as well.
    pub max_horizon: Option<u32>,
}

/// Minimal crossing time and a schedule achieving it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub horizon: u32,
    pub schedule: Schedule,
}

/// Looks for a schedule that gets everyone across within `horizon`.
///
/// Returns `Ok(None)` when no such schedule exists.
pub fn solve_at_horizon<B: SatBackend>(
    instance: &Instance,
    horizon: u32,
    backend: &mut B,
) -> Result<Option<Schedule>> {
    let encoding = encode(instance, horizon);
    let formula = encoding.formula();

    match backend.solve(formula.cnf(), formula.n_vars())? {
        Verdict::Sat(model) => {
            model.ensure_covers(formula.cnf())?;
            let schedule = decode(&model, &encoding)?;
            debug!(horizon, trips = schedule.len(), "horizon is feasible");
            Ok(Some(schedule))
        }
        Verdict::Unsat => {
            debug!(horizon, "horizon is infeasible");
            Ok(None)
        }
    }
}

/// Finds the minimal horizon and a schedule achieving it.
pub fn find_minimal_horizon<B: SatBackend>(
    instance: &Instance,
    options: &SearchOptions,
    backend: &mut B,
) -> Result<Solution> {
    if let Some(cap) = options.max_horizon {
        if options.min_horizon > cap {
            return Err(Error::invalid(format!(
                "min horizon {} is above max horizon {}",
                options.min_horizon, cap
            )));
        }
    }
    let escort_bound = instance.escort_upper_bound();
    let limit = options
        .max_horizon
        .map_or(escort_bound, |cap| cap.min(escort_bound));
    info!(
        agents = instance.agent_count(),
        capacity = instance.capacity(),
        min_horizon = options.min_horizon,
        limit,
        "searching for minimal crossing time"
    );

    let mut horizon = options.min_horizon;
    loop {
        if let Some(schedule) = solve_at_horizon(instance, horizon, backend)? {
            info!(horizon, trips = schedule.len(), "minimal crossing time found");
            return Ok(Solution { horizon, schedule });
        }
        if horizon >= limit {
            break;
        }
        horizon += 1;
    }

    if limit < escort_bound {
        warn!(max_horizon = limit, "horizon cap reached without a schedule");
        return Err(Error::HorizonExhausted { max_horizon: limit });
    }
    Err(Error::contract(format!(
        "solver rejected horizon {} although the escort schedule fits in it",
        horizon
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{MinisatBackend, SignedBackend};
    use crate::verify::verify_schedule;

    fn minimal(durations: &[u32], capacity: usize) -> Solution {
        let instance = Instance::new(durations.to_vec(), capacity).unwrap();
        find_minimal_horizon(&instance, &SearchOptions::default(), &mut MinisatBackend::default())
            .unwrap()
    }

    #[test]
    fn test_minimal_joint_trip() {
        let solution = minimal(&[1, 1], 2);
        assert_eq!(solution.horizon, 1);
        assert_eq!(solution.schedule.len(), 1);
    }

    #[test]
    fn test_minimal_schedule_verifies() {
        let solution = minimal(&[2, 3, 4], 2);
        assert_eq!(solution.horizon, 9);
        verify_schedule(&[2, 3, 4], 2, solution.horizon, &solution.schedule).unwrap();
    }

    #[test]
    fn test_min_horizon_above_optimum_returns_it() {
        let instance = Instance::new(vec![1, 1], 2).unwrap();
        let options = SearchOptions {
            min_horizon: 4,
            max_horizon: None,
        };
        let solution =
            find_minimal_horizon(&instance, &options, &mut MinisatBackend::default()).unwrap();
        assert_eq!(solution.horizon, 4);
    }

    #[test]
    fn test_min_horizon_above_cap_is_rejected() {
        let instance = Instance::new(vec![1, 1], 2).unwrap();
        let options = SearchOptions {
            min_horizon: 4,
            max_horizon: Some(3),
        };
        let mut calls = 0;
        let mut backend = SignedBackend::new(|_: &[Vec<i32>]| {
            calls += 1;
            Ok(None)
        });
        let err = find_minimal_horizon(&instance, &options, &mut backend).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
        drop(backend);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_fixed_horizon_query() {
        let instance = Instance::new(vec![1, 1, 1, 1], 2).unwrap();
        let mut backend = MinisatBackend::default();
        assert!(solve_at_horizon(&instance, 4, &mut backend).unwrap().is_none());
        let schedule = solve_at_horizon(&instance, 5, &mut backend).unwrap().unwrap();
        verify_schedule(&[1, 1, 1, 1], 2, 5, &schedule).unwrap();
    }

    #[test]
    fn test_caller_cap_is_reported() {
        let instance = Instance::new(vec![1, 2, 5, 10], 2).unwrap();
        let options = SearchOptions {
            min_horizon: 0,
            max_horizon: Some(10),
        };
        let err =
            find_minimal_horizon(&instance, &options, &mut MinisatBackend::default()).unwrap_err();
        assert!(matches!(err, Error::HorizonExhausted { max_horizon: 10 }));
    }

    #[test]
    fn test_solver_that_never_agrees_is_caught() {
        let instance = Instance::new(vec![1, 3], 2).unwrap();
        let mut calls = 0;
        let mut backend = SignedBackend::new(|_: &[Vec<i32>]| {
            calls += 1;
            Ok(None)
        });
        let err =
            find_minimal_horizon(&instance, &SearchOptions::default(), &mut backend).unwrap_err();
        assert!(matches!(err, Error::SolverContract { .. }));
        drop(backend);
        // Horizons 0 through the escort bound of 3
        assert_eq!(calls, 4);
    }

    #[test]
    fn test_incomplete_model_is_fatal() {
        let instance = Instance::new(vec![1], 2).unwrap();
        let mut backend = SignedBackend::new(|_: &[Vec<i32>]| Ok(Some(vec![1])));
        let err = solve_at_horizon(&instance, 1, &mut backend).unwrap_err();
        assert!(matches!(err, Error::SolverContract { .. }));
    }

    #[test]
    fn test_backend_failure_propagates() {
        let instance = Instance::new(vec![1], 2).unwrap();
        let mut backend = SignedBackend::new(|_: &[Vec<i32>]| {
            Err(Error::Backend("process exited".to_string()))
        });
        let err = solve_at_horizon(&instance, 1, &mut backend).unwrap_err();
        assert!(matches!(err, Error::Backend(_)));
    }
}
