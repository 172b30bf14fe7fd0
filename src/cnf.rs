//! Conjunctive normal form
//!
//! [`to_cnf`] canonicalizes a propositional sentence into a conjunction of
//! disjunctions of literals through three passes:
//!
//! 1. [`eliminate_implications`] rewrites `>>`, `<<`, `<=>`, and `^` into
//!    `&`, `|`, and `~`
//! 2. [`move_not_inwards`] pushes negation down to the atoms (De Morgan,
//!    double-negation elimination)
//! 3. [`distribute_and_over_or`] distributes `&` over `|` until no
//!    disjunction directly contains a conjunction
//!
//! The n-ary flattening helper [`assoc`] merges nested applications of an
//! associative operator and supplies the operator's identity for the empty
//! argument list. `to_cnf` is idempotent up to structural equality.

use crate::expr::Expr;

/// Convert a propositional sentence to conjunctive normal form.
///
/// The result is a conjunction whose every conjunct is a disjunction of
/// literals, with no further distribution possible.
pub fn to_cnf(s: &Expr) -> Expr {
    let s = eliminate_implications(s);
    let s = move_not_inwards(&s);
    distribute_and_over_or(&s)
}

/// Rewrite `>>`, `<<`, `<=>`, and `^` into `&`, `|`, and `~`.
///
/// Atoms are unchanged; other operators are rebuilt over rewritten
/// arguments.
pub fn eliminate_implications(s: &Expr) -> Expr {
    if s.is_leaf() || s.op().is_symbol() {
        return s.clone();
    }
    let args: Vec<Expr> = s.args().iter().map(eliminate_implications).collect();
    let a = args[0].clone();
    let b = args[args.len() - 1].clone();
    match s.op_name() {
        Some(">>") => b | !a,
        Some("<<") => a | !b,
        Some("<=>") => (a.clone() | !b.clone()) & (b | !a),
        Some("^") => (a.clone() | b.clone()) & (!a | !b),
        _ => Expr::new(s.op().clone(), args),
    }
}

/// Move every negation sign inward until it sits directly on an atom.
pub fn move_not_inwards(s: &Expr) -> Expr {
    if s.is_op("~") && s.args().len() == 1 {
        let a = &s.args()[0];
        if a.is_op("~") && a.args().len() == 1 {
            // ~~A => A
            return move_not_inwards(&a.args()[0]);
        }
        if a.is_op("&") {
            let negated = a.args().iter().map(|b| move_not_inwards(&!b.clone())).collect();
            return assoc("|", negated);
        }
        if a.is_op("|") {
            let negated = a.args().iter().map(|b| move_not_inwards(&!b.clone())).collect();
            return assoc("&", negated);
        }
        s.clone()
    } else if s.op().is_symbol() || s.is_leaf() {
        s.clone()
    } else {
        Expr::new(
            s.op().clone(),
            s.args().iter().map(move_not_inwards).collect(),
        )
    }
}

/// Distribute conjunction over disjunction, repeatedly, until the sentence
/// is a conjunction of disjunctions of literals.
///
/// The input must already be free of implications with negations moved
/// inward.
pub fn distribute_and_over_or(s: &Expr) -> Expr {
    if s.is_op("|") {
        let flat = assoc("|", s.args().to_vec());
        if !flat.is_op("|") {
            // Collapsed to the identity or to a single child.
            return distribute_and_over_or(&flat);
        }
        let args = flat.args();
        let conj_idx = match args.iter().position(|d| d.is_op("&")) {
            Some(i) => i,
            None => return flat.clone(),
        };
        let conj = &args[conj_idx];
        let others: Vec<Expr> = args
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != conj_idx)
            .map(|(_, a)| a.clone())
            .collect();
        let rest = assoc("|", others);
        let distributed = conj
            .args()
            .iter()
            .map(|c| distribute_and_over_or(&(c.clone() | rest.clone())))
            .collect();
        assoc("&", distributed)
    } else if s.is_op("&") {
        assoc(
            "&",
            s.args().iter().map(distribute_and_over_or).collect(),
        )
    } else {
        s.clone()
    }
}

/// Build an application of an associative operator, promoting nested
/// applications of the same operator up to the top level.
///
/// Exactly one argument is returned unchanged; zero arguments yield the
/// operator's identity (`TRUE` for `&`, `FALSE` for `|`, `0` for `+`,
/// `1` for `*`).
pub fn assoc(op: &str, args: Vec<Expr>) -> Expr {
    let mut args = args;
    if args.len() == 1 {
        return args.remove(0);
    }
    if args.is_empty() {
        return match op {
            "&" => Expr::truth(),
            "|" => Expr::falsity(),
            "+" => Expr::num(0),
            "*" => Expr::num(1),
            _ => Expr::new(op, Vec::new()),
        };
    }
    let mut flat = Vec::with_capacity(args.len());
    for arg in args {
        if arg.is_op(op) {
            flat.extend(arg.args().iter().cloned());
        } else {
            flat.push(arg);
        }
    }
    Expr::new(op, flat)
}

/// The conjuncts of a sentence: the arguments of a top-level `&`, or the
/// sentence itself.
pub fn conjuncts(s: &Expr) -> Vec<Expr> {
    if s.is_op("&") {
        s.args().to_vec()
    } else {
        vec![s.clone()]
    }
}

/// The disjuncts of a sentence: the arguments of a top-level `|`, or the
/// sentence itself.
pub fn disjuncts(s: &Expr) -> Vec<Expr> {
    if s.is_op("|") {
        s.args().to_vec()
    } else {
        vec![s.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;

    fn cnf(s: &str) -> String {
        to_cnf(&parse_expr(s).unwrap()).to_string()
    }

    #[test]
    fn test_to_cnf_negated_disjunction() {
        assert_eq!(cnf("~(B | C)"), "(~B & ~C)");
    }

    #[test]
    fn test_to_cnf_biconditional() {
        assert_eq!(cnf("B <=> (P1 | P2)"), "((~P1 | B) & (~P2 | B) & (P1 | P2 | ~B))");
    }

    #[test]
    fn test_to_cnf_distributes_nested() {
        assert_eq!(cnf("a | (b & c) | d"), "((b | a | d) & (c | a | d))");
        assert_eq!(cnf("A & (B | (D & E))"), "(A & (D | B) & (E | B))");
    }

    #[test]
    fn test_to_cnf_xor() {
        assert_eq!(cnf("A ^ B"), "((A | B) & (~A | ~B))");
    }

    #[test]
    fn test_eliminate_implications() {
        let e = parse_expr("A >> (~B << C)").unwrap();
        let expected = parse_expr("(~B | ~C) | ~A").unwrap();
        assert_eq!(eliminate_implications(&e), expected);
    }

    #[test]
    fn test_move_not_inwards() {
        let double = parse_expr("~(A | B)").unwrap();
        assert_eq!(move_not_inwards(&double), parse_expr("~A & ~B").unwrap());
        let double = parse_expr("~(A & B)").unwrap();
        assert_eq!(move_not_inwards(&double), parse_expr("~A | ~B").unwrap());
        let nested = parse_expr("~(~(A | ~B) | ~~C)").unwrap();
        assert_eq!(
            move_not_inwards(&nested),
            parse_expr("(A | ~B) & ~C").unwrap()
        );
    }

    #[test]
    fn test_distribute_and_over_or() {
        let e = parse_expr("(A & B) | C").unwrap();
        assert_eq!(
            distribute_and_over_or(&e),
            parse_expr("(A | C) & (B | C)").unwrap()
        );
    }

    #[test]
    fn test_assoc_identities() {
        assert_eq!(assoc("&", vec![]), Expr::truth());
        assert_eq!(assoc("|", vec![]), Expr::falsity());
        assert_eq!(assoc("+", vec![]), Expr::num(0));
        assert_eq!(assoc("*", vec![]), Expr::num(1));
    }

    #[test]
    fn test_assoc_single_argument() {
        let a = Expr::sym("A");
        assert_eq!(assoc("&", vec![a.clone()]), a);
    }

    #[test]
    fn test_assoc_flattens_same_operator() {
        let a = Expr::sym("A");
        let b = Expr::sym("B");
        let c = Expr::sym("C");
        let nested = assoc("&", vec![a.clone() & b.clone(), c.clone()]);
        assert_eq!(nested.args().len(), 3);
        assert_eq!(nested.args(), &[a, b, c]);
    }

    #[test]
    fn test_conjuncts_disjuncts() {
        let a = Expr::sym("A");
        let b = Expr::sym("B");
        assert_eq!(conjuncts(&(a.clone() & b.clone())), vec![a.clone(), b.clone()]);
        assert_eq!(conjuncts(&(a.clone() | b.clone())), vec![a.clone() | b.clone()]);
        assert_eq!(disjuncts(&(a.clone() | b.clone())), vec![a.clone(), b.clone()]);
        assert_eq!(disjuncts(&(a.clone() & b.clone())), vec![a.clone() & b.clone()]);
    }

    #[test]
    fn test_to_cnf_idempotent() {
        let cases = [
            "~(B | C)",
            "B <=> (P1 | P2)",
            "a | (b & c) | d",
            "A & (B | (D & E))",
            "(A >> B) & (B >> C)",
            "~(~(A | ~B) | ~~C)",
            "A ^ B",
            "P",
            "(P | Q) & (~P | R) & (~Q | ~R)",
        ];
        for case in cases {
            let once = to_cnf(&parse_expr(case).unwrap());
            let twice = to_cnf(&once);
            assert_eq!(once, twice, "to_cnf not idempotent on {}", case);
        }
    }

    #[test]
    fn test_cnf_shape_invariant() {
        // Every top-level conjunct must be a disjunction of literals.
        let cases = ["B <=> (P1 | P2)", "(A >> B) >> C", "~(A & (B | C))"];
        for case in cases {
            let result = to_cnf(&parse_expr(case).unwrap());
            for conjunct in conjuncts(&result) {
                for disjunct in disjuncts(&conjunct) {
                    assert!(
                        disjunct.is_literal(),
                        "non-literal disjunct {} in CNF of {}",
                        disjunct,
                        case
                    );
                }
            }
        }
    }
}
