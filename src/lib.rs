//! SAT-based scheduler for the bounded-capacity river crossing problem.
//!
//! N agents with individual crossing times share one vehicle that carries at
//! most C of them per trip; a trip lasts as long as its slowest passenger.
//! For a fixed horizon T the problem is encoded as CNF whose models are
//! exactly the schedules that get everyone across by T. The horizon search
//! raises T until the formula becomes satisfiable, which yields the minimal
//! crossing time together with a schedule achieving it.
//!
//! The boolean search itself is delegated to a [`SatBackend`]. The default is
//! Minisat through `rustsat`.
//!
//! ```no_run
//! use ferry_core::{find_minimal_horizon, Instance, MinisatBackend, SearchOptions};
//!
//! let instance = Instance::new(vec![1, 2, 5, 10], 2)?;
//! let solution = find_minimal_horizon(
//!     &instance,
//!     &SearchOptions::default(),
//!     &mut MinisatBackend::default(),
//! )?;
//! assert_eq!(solution.horizon, 17);
//! # Ok::<(), ferry_core::Error>(())
//! ```

pub mod cardinality;
pub mod decoder;
pub mod driver;
pub mod encoder;
pub mod error;
pub mod formula;
pub mod instance;
pub mod pool;
pub mod solver;
pub mod verify;

pub use decoder::{decode, Schedule, Trip};
pub use driver::{find_minimal_horizon, solve_at_horizon, SearchOptions, Solution};
pub use encoder::{encode, Encoding};
pub use error::{Error, Result};
pub use instance::Instance;
pub use pool::{Direction, ShoreState, Side, VarKey, VarPool};
pub use solver::{MinisatBackend, Model, RustSatBackend, SatBackend, SignedBackend, Verdict};
pub use verify::{verify_schedule, ScheduleViolation};
