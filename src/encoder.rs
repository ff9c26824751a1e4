//! Constraint encoder: the clause set whose models are exactly the valid
//! schedules that finish within a fixed horizon.
//!
//! Every (agent, time) pair carries one of four shore states, the vehicle
//! carries a mooring flag per bank, and departures are `Trip` events keyed by
//! start time, slot length and direction. Agents board through `Embark`
//! markers, which tie an agent's state change to the trip that carries it.
//! Frame clauses keep every flag unchanged unless some event explains the
//! change.

use rustsat::types::Lit;
use tracing::debug;

use crate::cardinality::{encode_at_most_k, encode_at_most_one, encode_exactly_one};
use crate::formula::Formula;
use crate::instance::Instance;
use crate::pool::{Direction, ShoreState, Side, VarKey};

/// One candidate departure whose arrival still fits the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripSlot {
    pub departure: u32,
    pub duration: u32,
    pub direction: Direction,
    pub lit: Lit,
}

impl TripSlot {
    pub fn arrival(&self) -> u32 {
        self.departure + self.duration
    }
}

/// Per-step event causation table. `departures[t]` lists the trips that may
/// leave at `t`, `arrivals[t]` the trips that would land at `t`.
#[derive(Debug, Default)]
struct EventTable {
    departures: Vec<Vec<TripSlot>>,
    arrivals: Vec<Vec<TripSlot>>,
}

impl EventTable {
    fn departing_from(&self, side: Side, time: u32) -> impl Iterator<Item = &TripSlot> {
        self.departures[time as usize]
            .iter()
            .filter(move |slot| slot.direction.origin() == side)
    }

    fn arriving_at(&self, side: Side, time: u32) -> impl Iterator<Item = &TripSlot> {
        self.arrivals[time as usize]
            .iter()
            .filter(move |slot| slot.direction.destination() == side)
    }
}

/// The formula for one horizon, together with what the decoder needs to
/// read a model back.
pub struct Encoding {
    formula: Formula,
    horizon: u32,
    agents: usize,
    table: EventTable,
}

impl Encoding {
    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    pub fn into_formula(self) -> Formula {
        self.formula
    }

    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    pub fn agent_count(&self) -> usize {
        self.agents
    }

    /// Trips that may depart at `time`; empty at or beyond the horizon.
    pub fn departures(&self, time: u32) -> &[TripSlot] {
        self.table
            .departures
            .get(time as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn embark_lit(&self, agent: usize, time: u32, direction: Direction) -> Option<Lit> {
        self.formula.lookup(&VarKey::Embark {
            agent,
            time,
            direction,
        })
    }

    pub fn state_lit(&self, agent: usize, state: ShoreState, time: u32) -> Option<Lit> {
        self.formula.lookup(&VarKey::State { agent, state, time })
    }
}

/// Builds the formula for `instance` with every agent on bank B at `horizon`.
pub fn encode(instance: &Instance, horizon: u32) -> Encoding {
    let mut encoder = Encoder::new(instance, horizon);

    encoder.encode_initial_state();
    encoder.encode_goal();
    encoder.encode_state_uniqueness();
    encoder.encode_vehicle_exclusivity();
    encoder.encode_transit_capacity();
    encoder.encode_trip_exclusivity();
    encoder.encode_trips();
    encoder.encode_embarking();
    encoder.encode_transitions();
    encoder.encode_vehicle_frame();

    let encoding = encoder.finish();
    debug!(
        horizon,
        vars = encoding.formula.n_vars(),
        clauses = encoding.formula.n_clauses(),
        "encoded crossing instance"
    );
    encoding
}

struct Encoder<'a> {
    instance: &'a Instance,
    horizon: u32,
    formula: Formula,
    table: EventTable,
}

impl<'a> Encoder<'a> {
    fn new(instance: &'a Instance, horizon: u32) -> Self {
        let mut formula = Formula::new();
        let steps = horizon as usize + 1;
        let mut table = EventTable {
            departures: vec![Vec::new(); steps],
            arrivals: vec![Vec::new(); steps],
        };

        let durations = instance.trip_durations();
        for time in 0..horizon {
            for &duration in &durations {
                for direction in Direction::ALL {
                    let lit = formula.lit(VarKey::Trip {
                        time,
                        duration,
                        direction,
                    });
                    if duration > horizon - time {
                        // Would land after the horizon
                        formula.add_unit(!lit);
                        continue;
                    }
                    let slot = TripSlot {
                        departure: time,
                        duration,
                        direction,
                        lit,
                    };
                    table.departures[time as usize].push(slot);
                    table.arrivals[slot.arrival() as usize].push(slot);
                }
            }
        }

        Encoder {
            instance,
            horizon,
            formula,
            table,
        }
    }

    fn finish(self) -> Encoding {
        Encoding {
            formula: self.formula,
            horizon: self.horizon,
            agents: self.instance.agent_count(),
            table: self.table,
        }
    }

    fn state(&mut self, agent: usize, state: ShoreState, time: u32) -> Lit {
        self.formula.lit(VarKey::State { agent, state, time })
    }

    fn vehicle(&mut self, side: Side, time: u32) -> Lit {
        self.formula.lit(VarKey::Vehicle { side, time })
    }

    fn embark(&mut self, agent: usize, time: u32, direction: Direction) -> Lit {
        self.formula.lit(VarKey::Embark {
            agent,
            time,
            direction,
        })
    }

    fn agents(&self) -> std::ops::Range<usize> {
        0..self.instance.agent_count()
    }

    // Everyone on bank A, vehicle moored at A
    fn encode_initial_state(&mut self) {
        let at_a = self.vehicle(Side::A, 0);
        let at_b = self.vehicle(Side::B, 0);
        self.formula.add_unit(at_a);
        self.formula.add_unit(!at_b);
        for agent in self.agents() {
            let lit = self.state(agent, ShoreState::AtA, 0);
            self.formula.add_unit(lit);
        }
    }

    fn encode_goal(&mut self) {
        let horizon = self.horizon;
        for agent in self.agents() {
            let lit = self.state(agent, ShoreState::AtB, horizon);
            self.formula.add_unit(lit);
        }
    }

    fn encode_state_uniqueness(&mut self) {
        for agent in self.agents() {
            for time in 0..=self.horizon {
                let lits: Vec<Lit> = ShoreState::ALL
                    .iter()
                    .map(|&state| self.state(agent, state, time))
                    .collect();
                encode_exactly_one(&mut self.formula, &lits);
            }
        }
    }

    // Moored at one bank at most; neither while under way
    fn encode_vehicle_exclusivity(&mut self) {
        for time in 0..=self.horizon {
            let at_a = self.vehicle(Side::A, time);
            let at_b = self.vehicle(Side::B, time);
            self.formula.add_binary(!at_a, !at_b);
        }
    }

    fn encode_transit_capacity(&mut self) {
        let capacity = self.instance.capacity();
        for time in 0..=self.horizon {
            for direction in Direction::ALL {
                let lits: Vec<Lit> = self
                    .agents()
                    .map(|agent| self.state(agent, direction.transit_state(), time))
                    .collect();
                encode_at_most_k(&mut self.formula, &lits, capacity);
            }
        }
    }

    // At most one departure per step, over all lengths and both directions
    fn encode_trip_exclusivity(&mut self) {
        for time in 0..self.horizon {
            let lits: Vec<Lit> = self.table.departures[time as usize]
                .iter()
                .map(|slot| slot.lit)
                .collect();
            encode_at_most_one(&mut self.formula, &lits);
        }
    }

    fn encode_trips(&mut self) {
        let slots: Vec<TripSlot> = self.table.departures.iter().flatten().copied().collect();
        for slot in slots {
            self.encode_trip(slot);
        }
    }

    fn encode_trip(&mut self, slot: TripSlot) {
        let TripSlot {
            departure,
            duration,
            direction,
            lit: trip,
        } = slot;
        let origin = direction.origin();
        let destination = direction.destination();
        let arrival = slot.arrival();

        // Vehicle leaves the origin at once, is under way until arrival,
        // and lands exactly at departure + duration.
        let leaves = self.vehicle(origin, departure);
        self.formula.add_binary(!trip, leaves);
        let gone = self.vehicle(origin, departure + 1);
        self.formula.add_binary(!trip, !gone);
        for step in departure + 1..arrival {
            let at_origin = self.vehicle(origin, step);
            let at_destination = self.vehicle(destination, step);
            self.formula.add_binary(!trip, !at_origin);
            self.formula.add_binary(!trip, !at_destination);
        }
        let lands = self.vehicle(destination, arrival);
        self.formula.add_binary(!trip, lands);

        // No other departure while under way
        for step in departure + 1..arrival {
            let others: Vec<Lit> = self.table.departures[step as usize]
                .iter()
                .map(|other| other.lit)
                .collect();
            for other in others {
                self.formula.add_binary(!trip, !other);
            }
        }

        // Somebody rides
        let mut riders = vec![!trip];
        riders.extend(self.agents().map(|agent| self.embark(agent, departure, direction)));
        self.formula.add_clause(riders);

        for agent in self.agents() {
            let boards = self.embark(agent, departure, direction);
            if self.instance.duration(agent) > duration {
                // Too slow for this slot
                self.formula.add_binary(!trip, !boards);
                continue;
            }
            for step in departure + 1..arrival {
                let in_transit = self.state(agent, direction.transit_state(), step);
                self.formula.add_ternary(!trip, !boards, in_transit);
            }
            let arrived = self.state(agent, direction.arrival_state(), arrival);
            self.formula.add_ternary(!trip, !boards, arrived);
        }
    }

    fn encode_embarking(&mut self) {
        let capacity = self.instance.capacity();
        for time in 0..self.horizon {
            for direction in Direction::ALL {
                let mut boarding = Vec::with_capacity(self.instance.agent_count());
                for agent in self.agents() {
                    let boards = self.embark(agent, time, direction);
                    boarding.push(boards);

                    // Board only from the matching bank
                    let on_bank = self.state(agent, direction.boarding_state(), time);
                    self.formula.add_binary(!boards, on_bank);

                    // ...and only onto a departing trip the agent is fast enough for
                    let needed = self.instance.duration(agent);
                    let mut carriers = vec![!boards];
                    carriers.extend(
                        self.table.departures[time as usize]
                            .iter()
                            .filter(|slot| slot.direction == direction && slot.duration >= needed)
                            .map(|slot| slot.lit),
                    );
                    self.formula.add_clause(carriers);
                }
                encode_at_most_k(&mut self.formula, &boarding, capacity);
            }
        }
    }

    fn encode_transitions(&mut self) {
        for agent in self.agents() {
            for time in 0..self.horizon {
                self.encode_agent_step(agent, time);
            }
        }
    }

    fn encode_agent_step(&mut self, agent: usize, time: u32) {
        let a = self.state(agent, ShoreState::AtA, time);
        let b = self.state(agent, ShoreState::AtB, time);
        let fwd = self.state(agent, ShoreState::InTransitForward, time);
        let ret = self.state(agent, ShoreState::InTransitReturn, time);

        let next = time + 1;
        let a_next = self.state(agent, ShoreState::AtA, next);
        let b_next = self.state(agent, ShoreState::AtB, next);
        let fwd_next = self.state(agent, ShoreState::InTransitForward, next);
        let ret_next = self.state(agent, ShoreState::InTransitReturn, next);

        let boards_fwd = self.embark(agent, time, Direction::Forward);
        let boards_ret = self.embark(agent, time, Direction::Return);

        // Successor states
        self.formula.add_clause([!a, a_next, fwd_next, b_next]);
        self.formula.add_clause([!b, b_next, ret_next, a_next]);
        self.formula.add_ternary(!fwd, fwd_next, b_next);
        self.formula.add_ternary(!ret, ret_next, a_next);

        // Leaving a bank needs a boarding
        self.formula.add_ternary(!a, a_next, boards_fwd);
        self.formula.add_ternary(!b, b_next, boards_ret);

        // Entering transit needs a boarding
        self.formula.add_ternary(!fwd_next, fwd, boards_fwd);
        self.formula.add_ternary(!ret_next, ret, boards_ret);

        // Landing needs a transit or a single-step boarding
        self.formula.add_clause([!b_next, b, fwd, boards_fwd]);
        self.formula.add_clause([!a_next, a, ret, boards_ret]);
    }

    // A mooring flag changes only if a trip leaves from or lands at that bank
    fn encode_vehicle_frame(&mut self) {
        for time in 0..self.horizon {
            let next = time + 1;
            for side in Side::ALL {
                let moored = self.vehicle(side, time);
                let moored_next = self.vehicle(side, next);

                let mut cleared = vec![!moored, moored_next];
                cleared.extend(self.table.departing_from(side, time).map(|slot| slot.lit));
                self.formula.add_clause(cleared);

                let mut set = vec![moored, !moored_next];
                set.extend(self.table.arriving_at(side, next).map(|slot| slot.lit));
                self.formula.add_clause(set);
            }
        }
    }
}
