//! Solver boundary. The encoder never searches: a `SatBackend` takes the
//! clause set and answers SAT with a model, or UNSAT.

use std::marker::PhantomData;

use rustsat::instances::Cnf;
use rustsat::solvers::{Solve, SolverResult};
use rustsat::types::{Lit, TernaryVal, Var};
use rustsat_minisat::core::Minisat;

use crate::error::{Error, Result};
use crate::formula::signed_clauses;

/// Answer of a solver collaborator for one formula
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Sat(Model),
    Unsat,
}

/// Truth values returned by a solver, indexed by variable.
///
/// A variable the solver said nothing about has no value; asking for it is a
/// contract violation, not a default.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Model {
    values: Vec<Option<bool>>,
}

impl Model {
    /// Builds a model from DIMACS literals (`v` true, `-v` false). Zeros and
    /// variables beyond `n_vars` are ignored.
    pub fn from_signed<I: IntoIterator<Item = i32>>(n_vars: u32, lits: I) -> Self {
        let mut values = vec![None; n_vars as usize];
        for lit in lits {
            if lit == 0 {
                continue;
            }
            let idx = (lit.unsigned_abs() - 1) as usize;
            if let Some(slot) = values.get_mut(idx) {
                *slot = Some(lit > 0);
            }
        }
        Model { values }
    }

    pub fn value(&self, var: Var) -> Result<bool> {
        self.values
            .get(var.idx())
            .copied()
            .flatten()
            .ok_or_else(|| {
                Error::contract(format!("model assigns no value to variable {}", var.idx() + 1))
            })
    }

    pub fn lit_value(&self, lit: Lit) -> Result<bool> {
        Ok(self.value(lit.var())? != lit.is_neg())
    }

    /// Checks that every variable referenced by `cnf` is assigned.
    pub fn ensure_covers(&self, cnf: &Cnf) -> Result<()> {
        for clause in cnf.iter() {
            for lit in clause.iter() {
                self.value(lit.var())?;
            }
        }
        Ok(())
    }
}

/// A satisfiability collaborator.
pub trait SatBackend {
    /// Decides `cnf`, whose variables all lie below `n_vars`. May block for
    /// as long as the underlying search takes.
    fn solve(&mut self, cnf: &Cnf, n_vars: u32) -> Result<Verdict>;
}

/// Adapter for any in-process `rustsat` solver. A fresh solver is built for
/// every call, so no learnt state crosses horizons.
pub struct RustSatBackend<S> {
    _solver: PhantomData<S>,
}

impl<S> Default for RustSatBackend<S> {
    fn default() -> Self {
        RustSatBackend {
            _solver: PhantomData,
        }
    }
}

pub type MinisatBackend = RustSatBackend<Minisat>;

impl<S: Solve + Default> SatBackend for RustSatBackend<S> {
    fn solve(&mut self, cnf: &Cnf, n_vars: u32) -> Result<Verdict> {
        let mut solver = S::default();
        solver.add_cnf(cnf.clone()).map_err(Error::backend)?;

        match solver.solve().map_err(Error::backend)? {
            SolverResult::Sat => {
                // Only variables the solver has seen can be queried
                let mut referenced = vec![false; n_vars as usize];
                for clause in cnf.iter() {
                    for lit in clause.iter() {
                        if let Some(seen) = referenced.get_mut(lit.var().idx()) {
                            *seen = true;
                        }
                    }
                }

                let mut values = vec![None; n_vars as usize];
                for idx in (0..referenced.len()).filter(|&idx| referenced[idx]) {
                    let lit = Lit::new(idx as u32, false);
                    values[idx] = match solver.lit_val(lit).map_err(Error::backend)? {
                        TernaryVal::True => Some(true),
                        TernaryVal::False => Some(false),
                        TernaryVal::DontCare => None,
                    };
                }
                Ok(Verdict::Sat(Model { values }))
            }
            SolverResult::Unsat => Ok(Verdict::Unsat),
            SolverResult::Interrupted => Err(Error::Backend("solver was interrupted".to_string())),
        }
    }
}

/// Adapter for a collaborator speaking DIMACS-style signed integers, such as
/// an external solver process. The closure gets the clauses and returns the
/// satisfying literals, or `None` for UNSAT.
pub struct SignedBackend<F> {
    solve: F,
}

impl<F> SignedBackend<F>
where
    F: FnMut(&[Vec<i32>]) -> Result<Option<Vec<i32>>>,
{
    pub fn new(solve: F) -> Self {
        SignedBackend { solve }
    }
}

impl<F> SatBackend for SignedBackend<F>
where
    F: FnMut(&[Vec<i32>]) -> Result<Option<Vec<i32>>>,
{
    fn solve(&mut self, cnf: &Cnf, n_vars: u32) -> Result<Verdict> {
        let clauses = signed_clauses(cnf);
        match (self.solve)(&clauses)? {
            Some(assignment) => Ok(Verdict::Sat(Model::from_signed(n_vars, assignment))),
            None => Ok(Verdict::Unsat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::Formula;
    use crate::pool::{Side, VarKey};

    fn vehicle_formula() -> (Formula, Lit, Lit) {
        let mut formula = Formula::new();
        let a = formula.lit(VarKey::Vehicle {
            side: Side::A,
            time: 0,
        });
        let b = formula.lit(VarKey::Vehicle {
            side: Side::B,
            time: 0,
        });
        formula.add_unit(a);
        formula.add_binary(!a, !b);
        (formula, a, b)
    }

    #[test]
    fn test_minisat_backend_sat() {
        let (formula, a, b) = vehicle_formula();
        let mut backend = MinisatBackend::default();
        let verdict = backend.solve(formula.cnf(), formula.n_vars()).unwrap();
        let Verdict::Sat(model) = verdict else {
            panic!("expected SAT");
        };
        assert!(model.lit_value(a).unwrap());
        assert!(!model.lit_value(b).unwrap());
        assert!(model.lit_value(!b).unwrap());
        model.ensure_covers(formula.cnf()).unwrap();
    }

    #[test]
    fn test_minisat_backend_unsat() {
        let (mut formula, a, _) = vehicle_formula();
        formula.add_unit(!a);
        let mut backend = MinisatBackend::default();
        assert_eq!(
            backend.solve(formula.cnf(), formula.n_vars()).unwrap(),
            Verdict::Unsat
        );
    }

    #[test]
    fn test_model_from_signed() {
        let model = Model::from_signed(3, [1, -2, 0, 7]);
        assert!(model.value(Var::new(0)).unwrap());
        assert!(!model.value(Var::new(1)).unwrap());
        assert!(matches!(
            model.value(Var::new(2)),
            Err(Error::SolverContract { .. })
        ));
    }

    #[test]
    fn test_incomplete_model_breaks_contract() {
        let (formula, _, _) = vehicle_formula();
        let model = Model::from_signed(formula.n_vars(), [1]);
        assert!(model.ensure_covers(formula.cnf()).is_err());
    }

    #[test]
    fn test_signed_backend_sees_dimacs_clauses() {
        let (formula, _, _) = vehicle_formula();
        let mut seen = Vec::new();
        let mut backend = SignedBackend::new(|clauses: &[Vec<i32>]| {
            seen = clauses.to_vec();
            Ok(Some(vec![1, -2]))
        });
        let verdict = backend.solve(formula.cnf(), formula.n_vars()).unwrap();
        assert!(matches!(verdict, Verdict::Sat(_)));
        drop(backend);
        assert_eq!(seen, vec![vec![1], vec![-1, -2]]);
    }
}
