//! WalkSAT stochastic local search
//!
//! Starts from a uniformly random total assignment and repairs unsatisfied
//! clauses by flipping one symbol at a time: a random symbol of a random
//! unsatisfied clause with probability `p`, otherwise the clause symbol
//! whose flip satisfies the most clauses. The procedure is incomplete --
//! exhausting the flip budget returns a failure sentinel that proves
//! nothing about unsatisfiability.
//!
//! Randomness is supplied by the caller so runs are reproducible; see
//! [`walk_sat_seeded`] for a convenience wrapper over a seeded `StdRng`.

use indexmap::IndexSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::error::ModusResult;
use crate::expr::Expr;

use super::{pl_true, Model};

/// Try to satisfy `clauses` by stochastic local search.
///
/// Returns a satisfying model, or `None` once `max_flips` flips have been
/// spent without success.
pub fn walk_sat<R: Rng>(
    clauses: &[Expr],
    p: f64,
    max_flips: usize,
    rng: &mut R,
) -> ModusResult<Option<Model>> {
    let mut symbols: IndexSet<Expr> = IndexSet::new();
    for clause in clauses {
        symbols.extend(clause.prop_symbols());
    }

    let mut model: Model = symbols
        .iter()
        .map(|s| (s.clone(), rng.gen::<bool>()))
        .collect();

    for flip in 0..max_flips {
        let mut unsatisfied = Vec::new();
        for clause in clauses {
            if pl_true(clause, &model)? != Some(true) {
                unsatisfied.push(clause);
            }
        }
        if unsatisfied.is_empty() {
            trace!(flips = flip, "walksat satisfied all clauses");
            return Ok(Some(model));
        }

        let clause = unsatisfied[rng.gen_range(0..unsatisfied.len())];
        let clause_symbols: Vec<Expr> = clause.prop_symbols().into_iter().collect();
        if clause_symbols.is_empty() {
            // A constant clause cannot be repaired by flipping anything.
            return Ok(None);
        }

        let symbol = if rng.gen::<f64>() < p {
            clause_symbols[rng.gen_range(0..clause_symbols.len())].clone()
        } else {
            // Greedy: flip whichever symbol of this clause satisfies the
            // most clauses. Ties go to the first candidate.
            let mut best_symbol = clause_symbols[0].clone();
            let mut best_count = -1i64;
            for candidate in &clause_symbols {
                let mut trial = model.clone();
                if let Some(v) = trial.get(candidate).copied() {
                    trial.insert(candidate.clone(), !v);
                }
                let mut count = 0i64;
                for c in clauses {
                    if pl_true(c, &trial)? == Some(true) {
                        count += 1;
                    }
                }
                if count > best_count {
                    best_count = count;
                    best_symbol = candidate.clone();
                }
            }
            best_symbol
        };

        if let Some(v) = model.get(&symbol).copied() {
            model.insert(symbol, !v);
        }
    }

    Ok(None)
}

/// [`walk_sat`] with a `StdRng` seeded from `seed`.
pub fn walk_sat_seeded(
    clauses: &[Expr],
    p: f64,
    max_flips: usize,
    seed: u64,
) -> ModusResult<Option<Model>> {
    let mut rng = StdRng::seed_from_u64(seed);
    walk_sat(clauses, p, max_flips, &mut rng)
}
