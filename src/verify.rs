//! Independent schedule checker.
//!
//! Replays a schedule against nothing but the raw durations and capacity,
//! without touching any encoder state. Agent numbers in violations are the
//! 1-based ids users see.

use thiserror::Error;

use crate::decoder::Schedule;
use crate::pool::Direction;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleViolation {
    #[error("[t={departure}] departure at or after the horizon {horizon}")]
    AfterHorizon { departure: u32, horizon: u32 },

    #[error("[t={departure}] departs before the previous departure at t={previous}")]
    OutOfOrder { departure: u32, previous: u32 },

    #[error("[t={departure}] vehicle is on the other bank for a {direction} trip")]
    WrongBank { departure: u32, direction: Direction },

    #[error("[t={departure}] trip carries nobody")]
    Empty { departure: u32 },

    #[error("[t={departure}] trip carries {carried} agents, capacity is {capacity}")]
    OverCapacity {
        departure: u32,
        carried: usize,
        capacity: usize,
    },

    #[error("[t={departure}] agent {agent} does not exist")]
    UnknownAgent { departure: u32, agent: usize },

    #[error("[t={departure}] agent {agent} is not on the vehicle's bank")]
    NotAtVehicle { departure: u32, agent: usize },

    #[error("[t={departure}] agent {agent} needs {needed} to cross but only got {available}")]
    TooSlow {
        departure: u32,
        agent: usize,
        needed: u32,
        available: u32,
    },

    #[error("agents {agents:?} not on bank B")]
    Stranded { agents: Vec<usize> },
}

pub fn verify_schedule(
    durations: &[u32],
    capacity: usize,
    horizon: u32,
    schedule: &Schedule,
) -> Result<(), ScheduleViolation> {
    let mut on_a = vec![true; durations.len()];
    let mut vehicle_on_a = true;
    let trips = schedule.trips();

    for (i, trip) in trips.iter().enumerate() {
        let departure = trip.departure;
        if departure >= horizon {
            return Err(ScheduleViolation::AfterHorizon { departure, horizon });
        }
        // Time until the vehicle is needed again
        let available = match trips.get(i + 1) {
            Some(next) if next.departure <= departure => {
                return Err(ScheduleViolation::OutOfOrder {
                    departure: next.departure,
                    previous: departure,
                });
            }
            Some(next) => next.departure - departure,
            None => horizon - departure,
        };

        let expected = if vehicle_on_a {
            Direction::Forward
        } else {
            Direction::Return
        };
        if trip.direction != expected {
            return Err(ScheduleViolation::WrongBank {
                departure,
                direction: trip.direction,
            });
        }
        if trip.agents().is_empty() {
            return Err(ScheduleViolation::Empty { departure });
        }
        if trip.agents().len() > capacity {
            return Err(ScheduleViolation::OverCapacity {
                departure,
                carried: trip.agents().len(),
                capacity,
            });
        }

        for &agent in trip.agents() {
            let Some(&needed) = durations.get(agent) else {
                return Err(ScheduleViolation::UnknownAgent {
                    departure,
                    agent: agent + 1,
                });
            };
            if on_a[agent] != vehicle_on_a {
                return Err(ScheduleViolation::NotAtVehicle {
                    departure,
                    agent: agent + 1,
                });
            }
            if needed > available {
                return Err(ScheduleViolation::TooSlow {
                    departure,
                    agent: agent + 1,
                    needed,
                    available,
                });
            }
            on_a[agent] = !on_a[agent];
        }
        vehicle_on_a = !vehicle_on_a;
    }

    let stranded: Vec<usize> = on_a
        .iter()
        .enumerate()
        .filter(|(_, &still_on_a)| still_on_a)
        .map(|(agent, _)| agent + 1)
        .collect();
    if !stranded.is_empty() {
        return Err(ScheduleViolation::Stranded { agents: stranded });
    }
    Ok(())
}
