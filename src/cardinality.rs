//! Cardinality constraints over literal sets.
//!
//! Small sets use pairwise exclusion, which needs no auxiliary variables.
//! Larger bounds use Sinz's sequential counter: `(n - 1) * k` auxiliaries
//! where `s[i][j]` means "at least `j + 1` of the first `i + 1` literals are
//! true".

use rustsat::types::Lit;

use crate::formula::Formula;

/// Up to this many literals, at-most-one is encoded pairwise
const PAIRWISE_LIMIT: usize = 6;

pub fn encode_at_least_one(formula: &mut Formula, lits: &[Lit]) {
    formula.add_clause(lits.iter().copied());
}

pub fn encode_at_most_one(formula: &mut Formula, lits: &[Lit]) {
    if lits.len() <= PAIRWISE_LIMIT {
        for i in 0..lits.len() {
            for j in i + 1..lits.len() {
                formula.add_binary(!lits[i], !lits[j]);
            }
        }
    } else {
        encode_sequential_counter(formula, lits, 1);
    }
}

pub fn encode_exactly_one(formula: &mut Formula, lits: &[Lit]) {
    encode_at_least_one(formula, lits);
    encode_at_most_one(formula, lits);
}

/// Encode "at most k of these literals are true"
pub fn encode_at_most_k(formula: &mut Formula, lits: &[Lit], k: usize) {
    if k >= lits.len() {
        // Trivially satisfied
        return;
    }
    if k == 0 {
        for &lit in lits {
            formula.add_unit(!lit);
        }
        return;
    }
    if k == 1 {
        encode_at_most_one(formula, lits);
        return;
    }
    encode_sequential_counter(formula, lits, k);
}

/// Encode "exactly k of these literals are true"
pub fn encode_exactly_k(formula: &mut Formula, lits: &[Lit], k: usize) {
    if k > lits.len() {
        // Impossible - add a contradiction
        let false_lit = formula.fresh_lit();
        formula.add_unit(false_lit);
        formula.add_unit(!false_lit);
        return;
    }
    if k == 1 {
        encode_exactly_one(formula, lits);
        return;
    }
    encode_at_most_k(formula, lits, k);
    // At least k true is at most (n - k) false
    let negated: Vec<Lit> = lits.iter().map(|&lit| !lit).collect();
    encode_at_most_k(formula, &negated, lits.len() - k);
}

// Requires 1 <= k < lits.len()
fn encode_sequential_counter(formula: &mut Formula, lits: &[Lit], k: usize) {
    let n = lits.len();
    debug_assert!(k >= 1 && k < n);

    let s: Vec<Vec<Lit>> = (0..n - 1)
        .map(|_| (0..k).map(|_| formula.fresh_lit()).collect())
        .collect();

    // First literal
    formula.add_binary(!lits[0], s[0][0]);
    for j in 1..k {
        formula.add_unit(!s[0][j]);
    }

    for i in 1..n - 1 {
        let x = lits[i];
        formula.add_binary(!x, s[i][0]);
        formula.add_binary(!s[i - 1][0], s[i][0]);
        for j in 1..k {
            // x AND s[i-1][j-1] => s[i][j]
            formula.add_ternary(!x, !s[i - 1][j - 1], s[i][j]);
            formula.add_binary(!s[i - 1][j], s[i][j]);
        }
        // k already reached among the first i: x must be false
        formula.add_binary(!x, !s[i - 1][k - 1]);
    }

    formula.add_binary(!lits[n - 1], !s[n - 2][k - 1]);
}
