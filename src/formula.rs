//! Clause sink for one encoding attempt: a variable pool plus the CNF built
//! over it.

use rustsat::instances::Cnf;
use rustsat::types::{Clause, Lit};

use crate::pool::{VarKey, VarPool};

#[derive(Default)]
pub struct Formula {
    pool: VarPool,
    cnf: Cnf,
}

impl Formula {
    pub fn new() -> Self {
        Formula::default()
    }

    /// Positive literal of the variable bound to `key`
    pub fn lit(&mut self, key: VarKey) -> Lit {
        self.pool.lit(key)
    }

    /// Positive literal of a new auxiliary variable
    pub fn fresh_lit(&mut self) -> Lit {
        self.pool.fresh().pos_lit()
    }

    pub fn lookup(&self, key: &VarKey) -> Option<Lit> {
        self.pool.get(key).map(|var| var.pos_lit())
    }

    pub fn add_clause<I: IntoIterator<Item = Lit>>(&mut self, lits: I) {
        let clause: Clause = lits.into_iter().collect();
        self.cnf.add_clause(clause);
    }

    pub fn add_unit(&mut self, lit: Lit) {
        self.cnf.add_unit(lit);
    }

    pub fn add_binary(&mut self, a: Lit, b: Lit) {
        self.cnf.add_binary(a, b);
    }

    pub fn add_ternary(&mut self, a: Lit, b: Lit, c: Lit) {
        self.add_clause([a, b, c]);
    }

    pub fn pool(&self) -> &VarPool {
        &self.pool
    }

    pub fn cnf(&self) -> &Cnf {
        &self.cnf
    }

    pub fn n_vars(&self) -> u32 {
        self.pool.n_vars()
    }

    pub fn n_clauses(&self) -> usize {
        self.cnf.len()
    }

    /// Clauses in DIMACS form: variable `i` is `i + 1`, negation flips sign.
    pub fn signed_clauses(&self) -> Vec<Vec<i32>> {
        signed_clauses(&self.cnf)
    }

    pub fn into_cnf(self) -> Cnf {
        self.cnf
    }
}

pub(crate) fn signed_clauses(cnf: &Cnf) -> Vec<Vec<i32>> {
    cnf.iter()
        .map(|clause| clause.iter().map(|lit| lit.to_ipasir()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Direction, ShoreState, Side};

    #[test]
    fn test_signed_clauses_are_one_based() {
        let mut formula = Formula::new();
        let a = formula.lit(VarKey::Vehicle {
            side: Side::A,
            time: 0,
        });
        let b = formula.lit(VarKey::State {
            agent: 0,
            state: ShoreState::AtA,
            time: 0,
        });
        formula.add_unit(a);
        formula.add_binary(!a, !b);

        assert_eq!(formula.signed_clauses(), vec![vec![1], vec![-1, -2]]);
        assert_eq!(formula.n_clauses(), 2);
        assert_eq!(formula.n_vars(), 2);
    }

    #[test]
    fn test_lookup_sees_allocated_keys_only() {
        let mut formula = Formula::new();
        let key = VarKey::Embark {
            agent: 1,
            time: 0,
            direction: Direction::Forward,
        };
        assert!(formula.lookup(&key).is_none());
        let lit = formula.lit(key);
        assert_eq!(formula.lookup(&key), Some(lit));
    }
}
