//! Variable pool: maps typed semantic keys to SAT variables.
//!
//! A pool lives exactly as long as one encoding attempt. Nothing is shared
//! between horizons, so identifiers from one formula never leak into another.

use std::collections::HashMap;

use rustsat::instances::{BasicVarManager, ManageVars};
use rustsat::types::{Lit, Var};

/// Where an agent is at a given time step. Exactly one variant holds for
/// every (agent, time) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShoreState {
    AtA,
    AtB,
    InTransitForward,
    InTransitReturn,
}

impl ShoreState {
    pub const ALL: [ShoreState; 4] = [
        ShoreState::AtA,
        ShoreState::AtB,
        ShoreState::InTransitForward,
        ShoreState::InTransitReturn,
    ];
}

/// A river bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::A, Side::B];
}

/// Direction of a vehicle trip: `Forward` goes from A to B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Forward,
    Return,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Forward, Direction::Return];

    pub fn origin(self) -> Side {
        match self {
            Direction::Forward => Side::A,
            Direction::Return => Side::B,
        }
    }

    pub fn destination(self) -> Side {
        match self {
            Direction::Forward => Side::B,
            Direction::Return => Side::A,
        }
    }

    /// State an agent must be in to board a trip in this direction
    pub fn boarding_state(self) -> ShoreState {
        match self {
            Direction::Forward => ShoreState::AtA,
            Direction::Return => ShoreState::AtB,
        }
    }

    /// State an agent holds strictly between departure and arrival
    pub fn transit_state(self) -> ShoreState {
        match self {
            Direction::Forward => ShoreState::InTransitForward,
            Direction::Return => ShoreState::InTransitReturn,
        }
    }

    pub fn arrival_state(self) -> ShoreState {
        match self {
            Direction::Forward => ShoreState::AtB,
            Direction::Return => ShoreState::AtA,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Forward => f.pad("forward"),
            Direction::Return => f.pad("return"),
        }
    }
}

/// Semantic identity of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKey {
    /// `agent` is in `state` at `time`
    State {
        agent: usize,
        state: ShoreState,
        time: u32,
    },
    /// A trip of length `duration` departs at `time`
    Trip {
        time: u32,
        duration: u32,
        direction: Direction,
    },
    /// The vehicle is moored at `side` at `time`
    Vehicle { side: Side, time: u32 },
    /// `agent` boards the vehicle at `time`
    Embark {
        agent: usize,
        time: u32,
        direction: Direction,
    },
}

/// Bijection between semantic keys and variables, plus anonymous auxiliary
/// variables for the cardinality encodings.
#[derive(Default)]
pub struct VarPool {
    manager: BasicVarManager,
    ids: HashMap<VarKey, Var>,
}

impl VarPool {
    pub fn new() -> Self {
        VarPool::default()
    }

    /// Returns the variable bound to `key`, allocating it on first request.
    /// Structurally equal keys always yield the same variable.
    pub fn id(&mut self, key: VarKey) -> Var {
        let manager = &mut self.manager;
        *self.ids.entry(key).or_insert_with(|| manager.new_var())
    }

    /// Looks a key up without allocating.
    pub fn get(&self, key: &VarKey) -> Option<Var> {
        self.ids.get(key).copied()
    }

    /// Allocates an auxiliary variable that no key refers to.
    pub fn fresh(&mut self) -> Var {
        self.manager.new_var()
    }

    /// Number of variables allocated so far, keyed or auxiliary
    pub fn n_vars(&self) -> u32 {
        self.manager.n_used()
    }

    pub fn n_keys(&self) -> usize {
        self.ids.len()
    }

    pub fn lit(&mut self, key: VarKey) -> Lit {
        self.id(key).pos_lit()
    }
}
