//! DPLL satisfiability search
//!
//! Davis-Putnam-Logemann-Loveland backtracking over the CNF clauses of a
//! sentence, with pure-literal elimination and unit propagation applied
//! before every branch. Branch order beyond those two heuristics is
//! unspecified.

use tracing::{debug, trace};

use crate::cnf::{conjuncts, disjuncts, to_cnf};
use crate::error::{ErrorCode, ModusError, ModusResult};
use crate::expr::Expr;

use super::{pl_true, Model};

/// Check satisfiability of a propositional sentence.
///
/// Returns a satisfying model, or `None` when the search space is
/// exhausted (the sentence is unsatisfiable).
pub fn dpll_satisfiable(s: &Expr) -> ModusResult<Option<Model>> {
    dpll_satisfiable_with(s, 0)
}

/// DPLL with a decision limit (`0` means unlimited).
///
/// Exceeding the limit is an error, not an unsatisfiability verdict.
pub fn dpll_satisfiable_with(s: &Expr, max_decisions: usize) -> ModusResult<Option<Model>> {
    let clauses = conjuncts(&to_cnf(s));
    let symbols: Vec<Expr> = s.prop_symbols().into_iter().collect();
    let mut decisions = 0usize;
    dpll(&clauses, symbols, Model::new(), &mut decisions, max_decisions)
}

fn dpll(
    clauses: &[Expr],
    symbols: Vec<Expr>,
    model: Model,
    decisions: &mut usize,
    max_decisions: usize,
) -> ModusResult<Option<Model>> {
    // Evaluate every clause under the partial model.
    let mut unknown_clauses = Vec::new();
    for c in clauses {
        match pl_true(c, &model)? {
            Some(false) => return Ok(None),
            Some(true) => {}
            None => unknown_clauses.push(c.clone()),
        }
    }
    if unknown_clauses.is_empty() {
        return Ok(Some(model));
    }

    if let Some((p, value)) = find_pure_symbol(&symbols, &unknown_clauses) {
        trace!(symbol = %p, value, "pure literal");
        let rest = remove_symbol(&symbols, &p);
        return dpll(clauses, rest, extend(model, p, value), decisions, max_decisions);
    }

    if let Some((p, value)) = find_unit_clause(&unknown_clauses, &model) {
        trace!(symbol = %p, value, "unit clause");
        let rest = remove_symbol(&symbols, &p);
        return dpll(clauses, rest, extend(model, p, value), decisions, max_decisions);
    }

    let mut symbols = symbols;
    let p = match symbols.pop() {
        Some(p) => p,
        None => {
            return Err(ModusError::internal(
                "undetermined clauses remain but no symbol is left to branch on",
            ))
        }
    };

    *decisions += 1;
    if max_decisions != 0 && *decisions > max_decisions {
        return Err(ModusError::new(
            ErrorCode::MaxDecisionsExceeded,
            format!("DPLL stopped after {} decisions", max_decisions),
        ));
    }
    debug!(symbol = %p, decisions = *decisions, "branching");

    if let Some(m) = dpll(
        clauses,
        symbols.clone(),
        extend(model.clone(), p.clone(), true),
        decisions,
        max_decisions,
    )? {
        return Ok(Some(m));
    }
    dpll(clauses, symbols, extend(model, p, false), decisions, max_decisions)
}

/// Find a symbol that appears with only one polarity across the
/// undetermined clauses, together with the value that satisfies it.
fn find_pure_symbol(symbols: &[Expr], unknown_clauses: &[Expr]) -> Option<(Expr, bool)> {
    for s in symbols {
        let negated = !s.clone();
        let mut found_pos = false;
        let mut found_neg = false;
        for c in unknown_clauses {
            let ds = disjuncts(c);
            if !found_pos && ds.contains(s) {
                found_pos = true;
            }
            if !found_neg && ds.contains(&negated) {
                found_neg = true;
            }
        }
        if found_pos != found_neg {
            return Some((s.clone(), found_pos));
        }
    }
    None
}

/// Find an undetermined clause with exactly one unbound literal; that
/// literal is forced (every bound literal in such a clause is false).
fn find_unit_clause(unknown_clauses: &[Expr], model: &Model) -> Option<(Expr, bool)> {
    for clause in unknown_clauses {
        let mut unbound = None;
        let mut count = 0;
        for literal in disjuncts(clause) {
            let (symbol, positive) = literal_symbol(&literal);
            if !model.contains_key(&symbol) {
                count += 1;
                unbound = Some((symbol, positive));
            }
        }
        if count == 1 {
            return unbound;
        }
    }
    None
}

/// The symbol of a literal and its polarity.
fn literal_symbol(literal: &Expr) -> (Expr, bool) {
    if literal.is_op("~") && literal.args().len() == 1 {
        (literal.args()[0].clone(), false)
    } else {
        (literal.clone(), true)
    }
}

fn extend(mut model: Model, symbol: Expr, value: bool) -> Model {
    model.insert(symbol, value);
    model
}

fn remove_symbol(symbols: &[Expr], symbol: &Expr) -> Vec<Expr> {
    symbols.iter().filter(|s| *s != symbol).cloned().collect()
}
