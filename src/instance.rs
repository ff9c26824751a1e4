//! Problem input: per-agent crossing durations and the vehicle capacity.

use crate::error::{Error, Result};

/// A validated river-crossing instance.
///
/// Agents are identified by their index into `durations`. A trip lasts as
/// long as the slowest agent aboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    durations: Vec<u32>,
    capacity: usize,
    escort_bound: u32,
}

impl Instance {
    /// Validates the input up front so that nothing malformed ever reaches
    /// the encoder or the horizon search.
    pub fn new(durations: Vec<u32>, capacity: usize) -> Result<Self> {
        if durations.is_empty() {
            return Err(Error::invalid("no agents to ferry"));
        }
        if capacity < 1 {
            return Err(Error::invalid("vehicle capacity must be at least 1"));
        }
        if let Some(agent) = durations.iter().position(|&d| d == 0) {
            return Err(Error::invalid(format!(
                "agent {} has a zero crossing duration",
                agent + 1
            )));
        }
        // Every trip carries somebody, so with a single seat the vehicle can
        // only come back with the agent who just crossed.
        if capacity == 1 && durations.len() > 1 {
            return Err(Error::invalid(format!(
                "a vehicle of capacity 1 can never ferry {} agents: every return trip needs a rider",
                durations.len()
            )));
        }
        let escort_bound = escort_bound(&durations).ok_or_else(|| {
            Error::invalid("total crossing time does not fit in a 32-bit horizon")
        })?;
        Ok(Instance {
            durations,
            capacity,
            escort_bound,
        })
    }

    pub fn durations(&self) -> &[u32] {
        &self.durations
    }

    pub fn duration(&self, agent: usize) -> u32 {
        self.durations[agent]
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn agent_count(&self) -> usize {
        self.durations.len()
    }

    /// Candidate trip lengths: the distinct agent durations, ascending.
    pub fn trip_durations(&self) -> Vec<u32> {
        let mut distinct = self.durations.clone();
        distinct.sort_unstable();
        distinct.dedup();
        distinct
    }

    /// Length of the escort schedule in which the fastest agent ferries every
    /// other agent across one by one and rows back alone in between.
    ///
    /// The escort schedule is always valid for a validated instance, so this
    /// bounds the minimal horizon from above.
    pub fn escort_upper_bound(&self) -> u32 {
        self.escort_bound
    }
}

/// `None` when the escort schedule would not fit in a `u32` horizon.
fn escort_bound(durations: &[u32]) -> Option<u32> {
    let fastest = u64::from(*durations.iter().min()?);
    if durations.len() == 1 {
        return u32::try_from(fastest).ok();
    }
    // The escort itself is counted once among the crossings.
    let total: u64 = durations.iter().copied().map(u64::from).sum();
    let crossings = total - fastest;
    let returns = (durations.len() as u64 - 2).checked_mul(fastest)?;
    u32::try_from(crossings.checked_add(returns)?).ok()
}
