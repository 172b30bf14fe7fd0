//! Propositional satisfiability and entailment
//!
//! Four procedures over propositional sentences, from the exact-but-
//! exponential to the fast-but-incomplete:
//!
//! - [`tt_entails`] - truth-table enumeration; the reference oracle the
//!   other procedures are tested against
//! - [`pl_resolution`] - resolution refutation over CNF clauses
//! - [`dpll_satisfiable`] - DPLL backtracking search with pure-literal
//!   elimination and unit propagation
//! - [`walk_sat`] - stochastic local search; incomplete, so a failure
//!   sentinel proves nothing about unsatisfiability
//!
//! All of them build on the three-valued evaluator [`pl_true`], which
//! evaluates a sentence under a possibly partial [`Model`].

mod dpll;
mod eval;
mod resolution;
mod truth_table;
mod walksat;

pub use dpll::{dpll_satisfiable, dpll_satisfiable_with};
pub use eval::pl_true;
pub use resolution::{pl_resolution, pl_resolution_with, pl_resolve};
pub use truth_table::{tt_entails, tt_true};
pub use walksat::{walk_sat, walk_sat_seeded};

use indexmap::IndexMap;

use crate::expr::Expr;

/// A truth assignment for propositional symbols, possibly partial.
///
/// Absence of a key means the symbol's value is unknown.
pub type Model = IndexMap<Expr, bool>;
