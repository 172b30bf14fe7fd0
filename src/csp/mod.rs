//! Finite-domain constraint satisfaction
//!
//! A [`Csp`] is a set of variables, an ordered candidate-value domain per
//! variable, a symmetric neighbor relation, and a binary constraint
//! predicate over (variable, value, variable, value) pairs.
//! [`backtracking_search`] assigns variables one at a time in their given
//! order, checking the predicate against every already-assigned neighbor
//! before committing a value, and backtracks on failure.
//!
//! The solver is independent of the expression model; the boot-order
//! scheduler in [`boot`] is its one packaged application.

pub mod boot;

pub use boot::{boot_order, BootOrderProblem, InconsistentConstraints};

use std::hash::Hash;

use indexmap::IndexMap;
use tracing::trace;

/// A partial mapping from variables to chosen values. A *complete*
/// assignment covers every variable.
pub type Assignment<V, D> = IndexMap<V, D>;

/// A binary constraint satisfaction problem.
pub struct Csp<V, D, F>
where
    F: Fn(&V, &D, &V, &D) -> bool,
{
    variables: Vec<V>,
    domains: IndexMap<V, Vec<D>>,
    neighbors: IndexMap<V, Vec<V>>,
    constraint: F,
}

impl<V, D, F> Csp<V, D, F>
where
    V: Clone + Eq + Hash,
    D: Clone,
    F: Fn(&V, &D, &V, &D) -> bool,
{
    /// Build a CSP instance.
    ///
    /// `constraint(a, x, b, y)` must return whether assigning `a = x` and
    /// `b = y` is allowed; it is consulted for neighboring pairs only and
    /// is expected to be symmetric.
    pub fn new(
        variables: Vec<V>,
        domains: IndexMap<V, Vec<D>>,
        neighbors: IndexMap<V, Vec<V>>,
        constraint: F,
    ) -> Self {
        Csp {
            variables,
            domains,
            neighbors,
            constraint,
        }
    }

    pub fn variables(&self) -> &[V] {
        &self.variables
    }

    /// Is `var = val` consistent with every assigned neighbor?
    fn consistent(&self, var: &V, val: &D, assignment: &Assignment<V, D>) -> bool {
        let Some(neighbors) = self.neighbors.get(var) else {
            return true;
        };
        neighbors.iter().all(|neighbor| {
            match assignment.get(neighbor) {
                Some(assigned) => (self.constraint)(var, val, neighbor, assigned),
                None => true,
            }
        })
    }
}

/// Search for a complete consistent assignment, trying variables in their
/// given order and domain values in their given order.
///
/// Returns `None` when the search space is exhausted.
pub fn backtracking_search<V, D, F>(csp: &Csp<V, D, F>) -> Option<Assignment<V, D>>
where
    V: Clone + Eq + Hash,
    D: Clone,
    F: Fn(&V, &D, &V, &D) -> bool,
{
    let mut assignment = Assignment::new();
    if backtrack(csp, &mut assignment) {
        Some(assignment)
    } else {
        None
    }
}

fn backtrack<V, D, F>(csp: &Csp<V, D, F>, assignment: &mut Assignment<V, D>) -> bool
where
    V: Clone + Eq + Hash,
    D: Clone,
    F: Fn(&V, &D, &V, &D) -> bool,
{
    // Naive fixed order: the first unassigned variable.
    let var = match csp
        .variables
        .iter()
        .find(|v| !assignment.contains_key(*v))
    {
        Some(v) => v.clone(),
        None => return true,
    };

    let empty: &[D] = &[];
    let domain = csp.domains.get(&var).map_or(empty, |d| d.as_slice());
    for val in domain {
        if csp.consistent(&var, val, assignment) {
            assignment.insert(var.clone(), val.clone());
            if backtrack(csp, assignment) {
                return true;
            }
            // The failed variable is the most recent insertion.
            assignment.pop();
        }
    }
    trace!("backtracking: no value fits");
    false
}
