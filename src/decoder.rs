//! Reads a schedule back out of a satisfying model.

use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;

use crate::encoder::Encoding;
use crate::error::{Error, Result};
use crate::pool::Direction;
use crate::solver::Model;

/// One vehicle departure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    pub departure: u32,
    pub direction: Direction,
    /// Length of the slot the vehicle is under way for
    pub duration: u32,
    agents: BTreeSet<usize>,
}

impl Trip {
    /// `agents` holds 0-based indices into the instance's durations.
    pub fn new(departure: u32, direction: Direction, duration: u32, agents: BTreeSet<usize>) -> Self {
        Trip {
            departure,
            direction,
            duration,
            agents,
        }
    }

    /// 0-based indices of the riders, for indexing into the durations
    pub fn agents(&self) -> &BTreeSet<usize> {
        &self.agents
    }

    /// 1-based agent ids, as reported to users
    pub fn agent_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.agents.iter().map(|agent| agent + 1)
    }
}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<String> = self.agent_ids().map(|id| id.to_string()).collect();
        write!(
            f,
            "t={:<3} {:<7} [{}] {{{}}}",
            self.departure,
            self.direction,
            self.duration,
            ids.join(", ")
        )
    }
}

/// Trips in departure order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schedule {
    trips: Vec<Trip>,
}

impl Schedule {
    pub fn new(trips: Vec<Trip>) -> Self {
        Schedule { trips }
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trip> {
        self.trips.iter()
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a Trip;
    type IntoIter = std::slice::Iter<'a, Trip>;

    fn into_iter(self) -> Self::IntoIter {
        self.trips.iter()
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for trip in &self.trips {
            writeln!(f, "{}", trip)?;
        }
        Ok(())
    }
}

/// Scans every step for the departure the model selected and collects the
/// agents marked as boarding it. Steps without a departure produce nothing.
pub fn decode(model: &Model, encoding: &Encoding) -> Result<Schedule> {
    let mut trips = Vec::new();

    for time in 0..encoding.horizon() {
        let mut departed = None;
        for slot in encoding.departures(time) {
            if model.lit_value(slot.lit)? {
                departed = Some(*slot);
                break;
            }
        }
        let Some(slot) = departed else {
            continue;
        };

        let mut agents = BTreeSet::new();
        for agent in 0..encoding.agent_count() {
            let lit = encoding
                .embark_lit(agent, time, slot.direction)
                .ok_or_else(|| {
                    Error::contract(format!("no boarding variable for agent {} at t={}", agent + 1, time))
                })?;
            if model.lit_value(lit)? {
                agents.insert(agent);
            }
        }

        let trip = Trip::new(time, slot.direction, slot.duration, agents);
        debug!(%trip, "decoded trip");
        trips.push(trip);
    }

    Ok(Schedule::new(trips))
}
