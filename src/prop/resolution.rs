//! Propositional resolution refutation
//!
//! Entailment by contradiction: negate the query, convert everything to
//! CNF, and saturate pairwise resolution. Deriving the empty clause proves
//! entailment; a fixpoint with no new clauses refutes it.

use indexmap::IndexSet;
use tracing::debug;

use crate::cnf::{assoc, conjuncts, disjuncts, to_cnf};
use crate::error::{ErrorCode, ModusError, ModusResult};
use crate::expr::Expr;

/// Decide whether the CNF clauses `kb_clauses` entail `alpha` by
/// resolution refutation.
pub fn pl_resolution(kb_clauses: &[Expr], alpha: &Expr) -> ModusResult<bool> {
    pl_resolution_with(kb_clauses, alpha, 0)
}

/// Resolution refutation with a round limit (`0` means unlimited).
///
/// The limit guards against pathological clause growth; exceeding it is an
/// error, not a verdict.
pub fn pl_resolution_with(
    kb_clauses: &[Expr],
    alpha: &Expr,
    max_rounds: usize,
) -> ModusResult<bool> {
    let mut clauses: Vec<Expr> = kb_clauses.to_vec();
    clauses.extend(conjuncts(&to_cnf(&!alpha.clone())));

    let mut new: IndexSet<Expr> = IndexSet::new();
    let mut rounds = 0usize;

    loop {
        rounds += 1;
        if max_rounds != 0 && rounds > max_rounds {
            return Err(ModusError::new(
                ErrorCode::MaxRoundsExceeded,
                format!("resolution stopped after {} rounds", max_rounds),
            ));
        }
        debug!(round = rounds, clauses = clauses.len(), "resolution round");

        let n = clauses.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let resolvents = pl_resolve(&clauses[i], &clauses[j]);
                if resolvents.iter().any(|c| *c == Expr::falsity()) {
                    return Ok(true);
                }
                new.extend(resolvents);
            }
        }

        if new.iter().all(|c| clauses.contains(c)) {
            return Ok(false);
        }
        for c in &new {
            if !clauses.contains(c) {
                clauses.push(c.clone());
            }
        }
    }
}

/// All clauses obtainable by resolving `ci` and `cj` on one pair of
/// complementary literals, with duplicate literals removed.
pub fn pl_resolve(ci: &Expr, cj: &Expr) -> Vec<Expr> {
    let di_list = disjuncts(ci);
    let dj_list = disjuncts(cj);
    let mut resolvents = Vec::new();

    for di in &di_list {
        for dj in &dj_list {
            if *di == !dj.clone() || !di.clone() == *dj {
                let mut remaining: Vec<Expr> = Vec::new();
                for d in di_list
                    .iter()
                    .filter(|d| *d != di)
                    .chain(dj_list.iter().filter(|d| *d != dj))
                {
                    if !remaining.contains(d) {
                        remaining.push(d.clone());
                    }
                }
                resolvents.push(assoc("|", remaining));
            }
        }
    }

    resolvents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;
    use crate::prop::tt_entails;

    fn kb_clauses(premises: &str) -> Vec<Expr> {
        conjuncts(&to_cnf(&parse_expr(premises).unwrap()))
    }

    fn resolves(premises: &str, query: &str) -> bool {
        pl_resolution(&kb_clauses(premises), &parse_expr(query).unwrap()).unwrap()
    }

    #[test]
    fn test_simple_entailment() {
        assert!(resolves("P & Q", "Q"));
        assert!(!resolves("P | Q", "Q"));
        assert!(resolves("(P >> Q) & P", "Q"));
        assert!(!resolves("P", "Q"));
    }

    #[test]
    fn test_pl_resolve_produces_both_resolvents() {
        let ci = to_cnf(&parse_expr("A | B | C").unwrap());
        let cj = to_cnf(&parse_expr("~B | ~C | F").unwrap());
        let resolvents = pl_resolve(&ci, &cj);
        assert_eq!(resolvents.len(), 2);
        // Resolving on B leaves {A, C, ~C, F}; resolving on C leaves
        // {A, B, ~B, F}.
        let sets: Vec<IndexSet<Expr>> = resolvents
            .iter()
            .map(|r| disjuncts(r).into_iter().collect())
            .collect();
        let lits = |names: &[&str]| -> IndexSet<Expr> {
            names.iter().map(|n| parse_expr(n).unwrap()).collect()
        };
        assert!(sets.contains(&lits(&["A", "C", "~C", "F"])));
        assert!(sets.contains(&lits(&["A", "B", "~B", "F"])));
    }

    #[test]
    fn test_empty_clause_from_direct_contradiction() {
        let unit = parse_expr("P").unwrap();
        let neg = parse_expr("~P").unwrap();
        let resolvents = pl_resolve(&unit, &neg);
        assert_eq!(resolvents, vec![Expr::falsity()]);
    }

    #[test]
    fn test_round_limit() {
        let err = pl_resolution_with(&kb_clauses("(P >> Q) & (Q >> R) & P"), &parse_expr("R").unwrap(), 1);
        // One round cannot finish this refutation.
        match err {
            Err(e) => assert_eq!(e.code, ErrorCode::MaxRoundsExceeded),
            Ok(v) => assert!(v, "finished early, must at least be correct"),
        }
    }

    #[test]
    fn test_agrees_with_truth_table() {
        let cases = [
            ("P & Q", "Q"),
            ("P & Q", "R"),
            ("P | Q", "P"),
            ("(P >> Q) & P", "Q"),
            ("(P >> Q) & (Q >> R)", "P >> R"),
            ("(P >> Q) & (Q >> R) & P", "R"),
            ("(B11 <=> (P12 | P21)) & ~B11", "~P12"),
            ("(A | B) & (~A | C)", "B | C"),
            ("(A | B) & (~A | C)", "B & C"),
            ("P <=> Q", "Q <=> P"),
        ];
        for (premises, query) in cases {
            let kb_expr = parse_expr(premises).unwrap();
            let query = parse_expr(query).unwrap();
            let by_tt = tt_entails(&kb_expr, &query).unwrap();
            let by_res = pl_resolution(&conjuncts(&to_cnf(&kb_expr)), &query).unwrap();
            assert_eq!(
                by_tt, by_res,
                "tt_entails and pl_resolution disagree on {} |- {}",
                premises, query
            );
        }
    }
}
