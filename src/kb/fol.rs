//! First-order definite-clause store and backward chaining
//!
//! [`FolKb`] holds definite clauses only: bare atoms, or implications
//! whose premises and conclusion are all positive atoms. Queries resolve
//! by backward chaining: the first unresolved goal is unified against each
//! stored clause's conclusion (after renaming the clause's variables
//! fresh), and the clause's premises become new goals.
//!
//! [`FolKb::ask_iter`] is a lazy iterator driven by an explicit stack of
//! choice points, so deep goal chains cannot overflow the native call
//! stack, and each query carries its own fresh-variable generator, so
//! repeated or interleaved queries never share renaming state.
//!
//! There is no cycle detection: a knowledge base with circular definite
//! clauses (`P(x) >> P(x)` and friends) yields an unbounded iterator.
//! That hazard is inherent to the procedure; bound consumption with
//! `take` when the store is not known to be acyclic.

use fnv::FnvHashMap;
use tracing::trace;

use crate::cnf::conjuncts;
use crate::error::{ModusError, ModusResult};
use crate::expr::Expr;
use crate::unify::{subst, subst_compose, unify, Substitution};

use super::KnowledgeBase;

/// A query-scoped source of fresh variable names.
///
/// Each top-level query owns one, keeping standardize-apart renaming
/// isolated between queries.
#[derive(Debug, Clone, Default)]
pub struct VarGen {
    counter: usize,
}

impl VarGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next fresh variable, named `v_1`, `v_2`, ...
    pub fn fresh(&mut self) -> Expr {
        self.counter += 1;
        Expr::sym(&format!("v_{}", self.counter))
    }
}

/// Rename every variable in `sentence` to a fresh one drawn from `gen`.
///
/// `mapping` keeps the renaming consistent within one sentence; pass a
/// fresh map per sentence.
pub fn standardize_apart(
    sentence: &Expr,
    gen: &mut VarGen,
    mapping: &mut FnvHashMap<Expr, Expr>,
) -> Expr {
    if sentence.is_variable() {
        mapping
            .entry(sentence.clone())
            .or_insert_with(|| gen.fresh())
            .clone()
    } else if sentence.is_leaf() {
        sentence.clone()
    } else {
        Expr::new(
            sentence.op().clone(),
            sentence
                .args()
                .iter()
                .map(|arg| standardize_apart(arg, gen, mapping))
                .collect(),
        )
    }
}

/// A first-order knowledge base of definite clauses.
#[derive(Debug, Clone, Default)]
pub struct FolKb {
    clauses: Vec<Expr>,
    reject_duplicates: bool,
}

impl FolKb {
    pub fn new() -> Self {
        Self::default()
    }

    /// A variant that errors with a duplicate-sentence condition when a
    /// clause already in the store is told again.
    pub fn rejecting_duplicates() -> Self {
        FolKb {
            clauses: Vec::new(),
            reject_duplicates: true,
        }
    }

    /// Build a store from initial clauses, rejecting any non-definite one.
    pub fn with_clauses(initial: impl IntoIterator<Item = Expr>) -> ModusResult<Self> {
        let mut kb = FolKb::new();
        for clause in initial {
            kb.tell(clause)?;
        }
        Ok(kb)
    }

    pub fn clauses(&self) -> &[Expr] {
        &self.clauses
    }

    /// Lazily resolve `query` against the store, yielding one substitution
    /// per successful derivation.
    ///
    /// Unbounded depth-first search: with circular clauses the iterator
    /// never ends.
    pub fn ask_iter(&self, query: &Expr) -> AskIter<'_> {
        AskIter {
            kb: self,
            stack: vec![Frame {
                goals: vec![query.clone()],
                theta: Substitution::new(),
                next_clause: 0,
            }],
            vars: VarGen::new(),
        }
    }

    /// Project every solution of `query` onto one variable.
    pub fn ask_values<'kb>(
        &'kb self,
        query: &Expr,
        var: &Expr,
    ) -> impl Iterator<Item = Expr> + 'kb {
        let var = var.clone();
        self.ask_iter(query).map(move |theta| subst(&theta, &var))
    }
}

impl KnowledgeBase for FolKb {
    fn tell(&mut self, sentence: Expr) -> ModusResult<()> {
        if !sentence.is_definite_clause() {
            return Err(ModusError::not_definite_clause(&sentence));
        }
        if self.reject_duplicates && self.clauses.contains(&sentence) {
            return Err(ModusError::duplicate_sentence(&sentence));
        }
        self.clauses.push(sentence);
        Ok(())
    }

    fn ask(&self, query: &Expr) -> ModusResult<Option<Substitution>> {
        Ok(self.ask_iter(query).next())
    }

    /// Collects the whole lazy sequence; only safe for acyclic stores.
    fn ask_all(&self, query: &Expr) -> ModusResult<Vec<Substitution>> {
        Ok(self.ask_iter(query).collect())
    }

    fn retract(&mut self, sentence: &Expr) -> ModusResult<()> {
        match self.clauses.iter().position(|stored| stored == sentence) {
            Some(pos) => {
                self.clauses.remove(pos);
                Ok(())
            }
            None => Err(ModusError::sentence_not_found(sentence)),
        }
    }
}

/// One choice point in the backward-chaining search: the goals still to
/// prove, the substitution accumulated so far, and the next stored clause
/// to try against the first goal.
#[derive(Debug, Clone)]
struct Frame {
    goals: Vec<Expr>,
    theta: Substitution,
    next_clause: usize,
}

/// Lazy backward-chaining iterator; see [`FolKb::ask_iter`].
#[derive(Debug)]
pub struct AskIter<'kb> {
    kb: &'kb FolKb,
    stack: Vec<Frame>,
    vars: VarGen,
}

impl Iterator for AskIter<'_> {
    type Item = Substitution;

    fn next(&mut self) -> Option<Substitution> {
        loop {
            let pushed = {
                let top = self.stack.last_mut()?;

                if top.goals.is_empty() {
                    // Every goal resolved: this frame is a solution.
                    let theta = top.theta.clone();
                    self.stack.pop();
                    return Some(theta);
                }

                let goal = subst(&top.theta, &top.goals[0]);
                let mut pushed = None;
                while top.next_clause < self.kb.clauses.len() {
                    let clause = &self.kb.clauses[top.next_clause];
                    top.next_clause += 1;

                    let mut mapping = FnvHashMap::default();
                    let renamed = standardize_apart(clause, &mut self.vars, &mut mapping);
                    let (head, body) = match split_definite(&renamed) {
                        Some(parts) => parts,
                        None => continue,
                    };

                    if let Some(theta1) = unify(&head, &goal, &Substitution::new()) {
                        trace!(clause = %clause, goal = %goal, "clause matches goal");
                        let mut goals = body;
                        goals.extend_from_slice(&top.goals[1..]);
                        pushed = Some(Frame {
                            goals,
                            theta: subst_compose(&theta1, &top.theta),
                            next_clause: 0,
                        });
                        break;
                    }
                }
                pushed
            };

            match pushed {
                Some(frame) => self.stack.push(frame),
                // No stored clause matches the first goal: abandon this
                // choice point and resume its parent.
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Split a definite clause into its conclusion and premise atoms.
fn split_definite(clause: &Expr) -> Option<(Expr, Vec<Expr>)> {
    if clause.op().is_symbol() {
        return Some((clause.clone(), Vec::new()));
    }
    if clause.is_op(">>") && clause.args().len() == 2 {
        let head = clause.args()[1].clone();
        let body = conjuncts(&clause.args()[0]);
        return Some((head, body));
    }
    None
}
