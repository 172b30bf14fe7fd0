//! Boot-order scheduling
//!
//! Orders services so that no service boots before anything it depends
//! on. Each service's rank is a CSP variable over `0..N`; the binary
//! constraint demands distinct ranks and forbids scheduling a dependency
//! after its dependent. The solved assignment, sorted by rank, is the
//! boot order.

use std::fmt;
use std::hash::Hash;

use indexmap::IndexMap;

use super::{backtracking_search, Csp};

/// No assignment satisfies the dependency table.
///
/// Carries the original table so the caller can diagnose the cycle.
#[derive(Debug, Clone, thiserror::Error)]
#[error("inconsistent boot-order constraints: {table:?}")]
pub struct InconsistentConstraints<S: fmt::Debug> {
    /// The dependency table that could not be ordered.
    pub table: IndexMap<S, Vec<S>>,
}

/// The boot-order problem over a dependency table mapping each service to
/// the services it depends on.
#[derive(Debug, Clone)]
pub struct BootOrderProblem<S> {
    table: IndexMap<S, Vec<S>>,
}

impl<S> BootOrderProblem<S>
where
    S: Clone + Eq + Hash + fmt::Debug,
{
    pub fn new(table: IndexMap<S, Vec<S>>) -> Self {
        BootOrderProblem { table }
    }

    /// The dependency table this problem was built from.
    pub fn table(&self) -> &IndexMap<S, Vec<S>> {
        &self.table
    }

    /// Solve for a consistent boot order.
    ///
    /// Derives a fresh CSP instance on every call: service ranks range
    /// over `[0, N)`, every pair of services is a neighbor pair, and two
    /// ranks are compatible when they differ and the later-ranked service
    /// is not among the earlier one's dependencies.
    pub fn solve(&self) -> Result<Vec<S>, InconsistentConstraints<S>> {
        let services: Vec<S> = self.table.keys().cloned().collect();
        let n = services.len();

        let domains: IndexMap<S, Vec<usize>> = services
            .iter()
            .map(|s| (s.clone(), (0..n).collect()))
            .collect();
        let neighbors: IndexMap<S, Vec<S>> = services
            .iter()
            .map(|s| {
                let others = services.iter().filter(|o| *o != s).cloned().collect();
                (s.clone(), others)
            })
            .collect();

        let constraint = |s1: &S, rank1: &usize, s2: &S, rank2: &usize| {
            // Boot ranks are unique.
            if rank1 == rank2 {
                return false;
            }
            let (first, second) = if rank1 < rank2 { (s1, s2) } else { (s2, s1) };
            // A dependency may never boot after its dependent.
            !self
                .table
                .get(first)
                .is_some_and(|deps| deps.contains(second))
        };

        let csp = Csp::new(services, domains, neighbors, constraint);
        match backtracking_search(&csp) {
            Some(assignment) => {
                let mut ranked: Vec<(S, usize)> = assignment.into_iter().collect();
                ranked.sort_by_key(|(_, rank)| *rank);
                Ok(ranked.into_iter().map(|(service, _)| service).collect())
            }
            None => Err(InconsistentConstraints {
                table: self.table.clone(),
            }),
        }
    }
}

/// Solve a dependency table for a consistent boot order.
pub fn boot_order<S>(table: IndexMap<S, Vec<S>>) -> Result<Vec<S>, InconsistentConstraints<S>>
where
    S: Clone + Eq + Hash + fmt::Debug,
{
    BootOrderProblem::new(table).solve()
}

impl<S: fmt::Debug> From<InconsistentConstraints<S>> for crate::error::ModusError {
    fn from(err: InconsistentConstraints<S>) -> Self {
        crate::error::ModusError::new(
            crate::error::ErrorCode::InconsistentConstraints,
            "no boot order satisfies the dependency table",
        )
        .with_context("table", format!("{:?}", err.table))
    }
}
