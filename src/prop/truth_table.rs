//! Truth-table entailment
//!
//! Exhaustive enumeration of all 2^n assignments. Exponential but exact,
//! which makes it the oracle the other solvers are cross-checked against.

use crate::error::ModusResult;
use crate::expr::Expr;

use super::{pl_true, Model};

/// Decide whether `kb` entails `alpha` by enumerating every assignment of
/// the symbols appearing in `kb & alpha`.
pub fn tt_entails(kb: &Expr, alpha: &Expr) -> ModusResult<bool> {
    let symbols: Vec<Expr> = (kb.clone() & alpha.clone())
        .prop_symbols()
        .into_iter()
        .collect();
    tt_check_all(kb, alpha, &symbols, &Model::new())
}

/// Is `alpha` a tautology?
pub fn tt_true(alpha: &Expr) -> ModusResult<bool> {
    tt_entails(&Expr::truth(), alpha)
}

fn tt_check_all(kb: &Expr, alpha: &Expr, symbols: &[Expr], model: &Model) -> ModusResult<bool> {
    match symbols.split_first() {
        None => {
            if pl_true(kb, model)? == Some(true) {
                Ok(pl_true(alpha, model)? == Some(true))
            } else {
                // The premises are false here; the assignment is vacuous.
                Ok(true)
            }
        }
        Some((p, rest)) => {
            let mut with_true = model.clone();
            with_true.insert(p.clone(), true);
            if !tt_check_all(kb, alpha, rest, &with_true)? {
                return Ok(false);
            }
            let mut with_false = model.clone();
            with_false.insert(p.clone(), false);
            tt_check_all(kb, alpha, rest, &with_false)
        }
    }
}
