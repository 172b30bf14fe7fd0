//! modus - a symbolic logical-inference engine
//!
//! A canonical expression representation, a conjunctive-normal-form
//! transformer, a family of propositional satisfiability and entailment
//! procedures, a first-order unifier with backward-chaining query
//! resolution, and a generic finite-domain constraint solver.
//!
//! # Architecture
//!
//! - [`expr`] - immutable, structurally shared expression trees
//! - [`parser`] - the minimal textual notation, alternate operator
//!   spellings included
//! - [`cnf`] - canonicalization into conjunctive normal form
//! - [`prop`] - truth-table entailment, resolution refutation, DPLL, and
//!   WalkSAT
//! - [`unify`] - structural unification with occurs-check, substitution
//!   application and composition
//! - [`kb`] - the `{tell, ask, ask_all, retract}` capability set with
//!   propositional, Horn-clause, and first-order stores
//! - [`csp`] - generic backtracking constraint solver and the boot-order
//!   scheduler built on it
//!
//! The engine is synchronous and single-threaded; expression trees and
//! substitutions are value data, and the only mutable state is local to a
//! single solve call. WalkSAT randomness is injected by the caller, so
//! solver behavior is reproducible under test.
//!
//! # Example
//!
//! ```rust,ignore
//! use modus::{parse_expr, to_cnf, tt_entails, FolKb, KnowledgeBase};
//!
//! let premises = parse_expr("(P >> Q) & P")?;
//! let query = parse_expr("Q")?;
//! assert!(tt_entails(&premises, &query)?);
//!
//! let mut kb = FolKb::new();
//! kb.tell(parse_expr("Farmer(Mac)")?)?;
//! kb.tell(parse_expr("Rabbit(Pete)")?)?;
//! kb.tell(parse_expr("(Rabbit(r) & Farmer(f)) ==> Hates(f, r)")?)?;
//! for answer in kb.ask_iter(&parse_expr("Hates(Mac, x)")?) {
//!     println!("{}", answer);
//! }
//! ```

pub mod cnf;
pub mod config;
pub mod csp;
pub mod error;
pub mod expr;
pub mod kb;
pub mod parser;
pub mod prop;
pub mod unify;

// Re-export the core types and entry points
pub use crate::cnf::{assoc, conjuncts, disjuncts, to_cnf};
pub use crate::config::{LogLevel, ModusConfig};
pub use crate::csp::{
    backtracking_search, boot_order, Assignment, BootOrderProblem, Csp, InconsistentConstraints,
};
pub use crate::error::{ErrorCode, ModusError, ModusResult};
pub use crate::expr::{Expr, Op};
pub use crate::kb::{
    pl_fc_entails, standardize_apart, FolKb, HornKb, KnowledgeBase, PropKb, VarGen,
};
pub use crate::parser::{parse_expr, ParseError};
pub use crate::prop::{
    dpll_satisfiable, dpll_satisfiable_with, pl_resolution, pl_resolution_with, pl_resolve,
    pl_true, tt_entails, tt_true, walk_sat, walk_sat_seeded, Model,
};
pub use crate::unify::{subst, subst_compose, unify, Substitution};
