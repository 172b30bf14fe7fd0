//! Unification of expressions
//!
//! A [`Substitution`] maps variable expressions (lowercase-leading leaf
//! symbols) to expressions. [`unify`] computes a substitution making two
//! expressions syntactically identical, with an occurs-check preventing
//! infinite terms. The empty substitution means "unified with nothing to
//! bind" and is never conflated with the `None` failure sentinel.
//!
//! Substitutions are value data: [`Substitution::extend`] copies, so no
//! caller's substitution is ever aliased or mutated by unification.

use std::fmt;

use indexmap::IndexMap;

use crate::expr::Expr;

/// A mapping from variable expressions to expressions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    bindings: IndexMap<Expr, Expr>,
}

impl Substitution {
    /// The empty substitution (unification succeeded with no bindings).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Look up a variable's binding.
    pub fn get(&self, var: &Expr) -> Option<&Expr> {
        self.bindings.get(var)
    }

    /// Bind `var` to `val` in place.
    pub fn insert(&mut self, var: Expr, val: Expr) {
        self.bindings.insert(var, val);
    }

    /// Copy this substitution and bind `var` to `val` in the copy.
    pub fn extend(&self, var: Expr, val: Expr) -> Substitution {
        let mut copy = self.clone();
        copy.bindings.insert(var, val);
        copy
    }

    /// Iterate bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Expr, &Expr)> {
        self.bindings.iter()
    }

    /// Restrict this substitution to the given variables.
    pub fn restrict<'a>(&self, vars: impl IntoIterator<Item = &'a Expr>) -> Substitution {
        let mut out = Substitution::new();
        for var in vars {
            if let Some(val) = self.bindings.get(var) {
                out.bindings.insert(var.clone(), val.clone());
            }
        }
        out
    }
}

impl FromIterator<(Expr, Expr)> for Substitution {
    fn from_iter<I: IntoIterator<Item = (Expr, Expr)>>(iter: I) -> Self {
        Substitution {
            bindings: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (var, val)) in self.bindings.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", var, val)?;
        }
        write!(f, "}}")
    }
}

/// Unify `x` and `y` under the substitution `s`.
///
/// Returns a substitution extending `s` that makes `x` and `y` identical,
/// or `None` if no such substitution exists. The input substitution is
/// never mutated.
pub fn unify(x: &Expr, y: &Expr, s: &Substitution) -> Option<Substitution> {
    if x == y {
        return Some(s.clone());
    }
    if x.is_variable() {
        return unify_var(x, y, s);
    }
    if y.is_variable() {
        return unify_var(y, x, s);
    }
    if !x.is_leaf() || !y.is_leaf() {
        // Compound terms: operators and arities must match, then the
        // arguments unify pairwise under the accumulating substitution.
        if x.op() != y.op() || x.args().len() != y.args().len() {
            return None;
        }
        let mut s = s.clone();
        for (a, b) in x.args().iter().zip(y.args()) {
            s = unify(a, b, &s)?;
        }
        return Some(s);
    }
    // Distinct constant leaves.
    None
}

fn unify_var(var: &Expr, x: &Expr, s: &Substitution) -> Option<Substitution> {
    if let Some(bound) = s.get(var) {
        let bound = bound.clone();
        return unify(&bound, x, s);
    }
    if occur_check(var, x, s) {
        return None;
    }
    Some(s.extend(var.clone(), x.clone()))
}

/// Does `var` occur anywhere inside `x`, directly or through bindings
/// already present in `s`?
fn occur_check(var: &Expr, x: &Expr, s: &Substitution) -> bool {
    if var == x {
        return true;
    }
    if x.is_variable() {
        if let Some(bound) = s.get(x) {
            return occur_check(var, bound, s);
        }
        return false;
    }
    x.args().iter().any(|arg| occur_check(var, arg, s))
}

/// Apply the substitution `s` to `x`.
pub fn subst(s: &Substitution, x: &Expr) -> Expr {
    if x.is_variable() {
        s.get(x).cloned().unwrap_or_else(|| x.clone())
    } else if x.is_leaf() {
        x.clone()
    } else {
        Expr::new(
            x.op().clone(),
            x.args().iter().map(|arg| subst(s, arg)).collect(),
        )
    }
}

/// The substitution equivalent to applying `s1` and then `s2`.
///
/// A binding `x -> v` in `s1` becomes `x -> s2[v]` exactly when `v` itself
/// is bound by `s2`; bindings unique to `s2` pass through; on a shared
/// key, `s1` wins.
pub fn subst_compose(s1: &Substitution, s2: &Substitution) -> Substitution {
    let mut composed = Substitution::new();
    for (x, v) in s1.iter() {
        match s2.get(v) {
            Some(w) => composed.insert(x.clone(), w.clone()),
            None => composed.insert(x.clone(), v.clone()),
        }
    }
    for (x, v) in s2.iter() {
        if s1.get(x).is_none() {
            composed.insert(x.clone(), v.clone());
        }
    }
    composed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Expr {
        Expr::sym(name)
    }

    fn f(args: Vec<Expr>) -> Expr {
        Expr::sym("F").apply(args)
    }

    #[test]
    fn test_unify_identical_terms() {
        let a = Expr::sym("A");
        let result = unify(&a, &a, &Substitution::new()).expect("unifies");
        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_success_is_not_failure() {
        let a = Expr::sym("A");
        // Some(empty) and None are distinct outcomes.
        assert!(unify(&a, &a, &Substitution::new()).is_some());
        assert!(unify(&a, &Expr::sym("B"), &Substitution::new()).is_none());
    }

    #[test]
    fn test_unify_variable_with_constant() {
        let x = var("x");
        let a = Expr::sym("A");
        let s = unify(&x, &a, &Substitution::new()).expect("unifies");
        assert_eq!(s.get(&x), Some(&a));
        assert_eq!(subst(&s, &x), a);
    }

    #[test]
    fn test_unify_two_variables() {
        let x = var("x");
        let y = var("y");
        let s = unify(&x, &y, &Substitution::new()).expect("unifies");
        assert_eq!(s.len(), 1);
        // Either x binds to y or y binds to x.
        assert!(s.get(&x) == Some(&y) || s.get(&y) == Some(&x));
    }

    #[test]
    fn test_occurs_check_rejects_infinite_term() {
        let x = var("x");
        let fx = f(vec![x.clone()]);
        assert!(unify(&x, &fx, &Substitution::new()).is_none());
        assert!(unify(&fx, &x, &Substitution::new()).is_none());
    }

    #[test]
    fn test_occurs_check_through_bindings() {
        // y is bound to F(x); unifying x with y must still be rejected.
        let x = var("x");
        let y = var("y");
        let s: Substitution = [(y.clone(), f(vec![x.clone()]))].into_iter().collect();
        assert!(unify(&x, &y, &s).is_none());
    }

    #[test]
    fn test_unify_compound_terms() {
        let x = var("x");
        let y = var("y");
        let a = Expr::sym("A");
        let b = Expr::sym("B");
        let t1 = Expr::sym("F").apply(vec![x.clone(), a.clone()]);
        let t2 = Expr::sym("F").apply(vec![b.clone(), y.clone()]);
        let s = unify(&t1, &t2, &Substitution::new()).expect("unifies");
        assert_eq!(subst(&s, &x), b);
        assert_eq!(subst(&s, &y), a);
        assert_eq!(subst(&s, &t1), subst(&s, &t2));
    }

    #[test]
    fn test_unify_arithmetic_trees() {
        let x = var("x");
        let y = var("y");
        let c = Expr::sym("C");
        let lhs = Expr::binary("+", x.clone(), y.clone());
        let rhs = Expr::binary("+", y.clone(), c.clone());
        let s = unify(&lhs, &rhs, &Substitution::new()).expect("unifies");
        assert_eq!(s.get(&x), Some(&y));
        assert_eq!(s.get(&y), Some(&c));
    }

    #[test]
    fn test_unify_mismatches() {
        let a = Expr::sym("A");
        let b = Expr::sym("B");
        assert!(unify(&a, &b, &Substitution::new()).is_none());
        // Different operators
        let fa = Expr::sym("F").apply(vec![a.clone()]);
        let ga = Expr::sym("G").apply(vec![a.clone()]);
        assert!(unify(&fa, &ga, &Substitution::new()).is_none());
        // Different arities
        let faa = Expr::sym("F").apply(vec![a.clone(), a.clone()]);
        assert!(unify(&fa, &faa, &Substitution::new()).is_none());
    }

    #[test]
    fn test_unify_respects_existing_bindings() {
        let x = var("x");
        let a = Expr::sym("A");
        let b = Expr::sym("B");
        let s: Substitution = [(x.clone(), a.clone())].into_iter().collect();
        assert!(unify(&x, &a, &s).is_some());
        assert!(unify(&x, &b, &s).is_none());
    }

    #[test]
    fn test_extend_copies() {
        let s1 = Substitution::new();
        let s2 = s1.extend(var("x"), Expr::sym("A"));
        assert!(s1.is_empty());
        assert_eq!(s2.len(), 1);
    }

    #[test]
    fn test_subst() {
        let x = var("x");
        let y = var("y");
        let s: Substitution = [(x.clone(), Expr::num(42)), (y.clone(), Expr::num(0))]
            .into_iter()
            .collect();
        let e = Expr::binary("+", f(vec![x]), y);
        assert_eq!(subst(&s, &e).to_string(), "(F(42) + 0)");
    }

    #[test]
    fn test_subst_compose() {
        let (x, y, z) = (var("x"), var("y"), var("z"));
        let (a, b, c) = (Expr::sym("A"), Expr::sym("B"), Expr::sym("C"));
        let s1: Substitution = [(x.clone(), a.clone()), (y.clone(), b.clone())]
            .into_iter()
            .collect();
        let s2: Substitution = [(z.clone(), x.clone()), (x.clone(), c.clone())]
            .into_iter()
            .collect();

        let expected_12: Substitution = [
            (x.clone(), a.clone()),
            (y.clone(), b.clone()),
            (z.clone(), x.clone()),
        ]
        .into_iter()
        .collect();
        assert_eq!(subst_compose(&s1, &s2), expected_12);

        let expected_21: Substitution = [
            (z.clone(), a.clone()),
            (x.clone(), c.clone()),
            (y.clone(), b.clone()),
        ]
        .into_iter()
        .collect();
        assert_eq!(subst_compose(&s2, &s1), expected_21);
    }

    #[test]
    fn test_subst_compose_equals_sequential_application() {
        let (x, y, z) = (var("x"), var("y"), var("z"));
        let (a, b, c) = (Expr::sym("A"), Expr::sym("B"), Expr::sym("C"));
        let s1: Substitution = [(x.clone(), a.clone()), (y.clone(), b.clone())]
            .into_iter()
            .collect();
        let s2: Substitution = [(z.clone(), x.clone()), (x.clone(), c.clone())]
            .into_iter()
            .collect();

        let p = Expr::sym("F").apply(vec![x.clone()])
            & Expr::sym("G").apply(vec![y.clone()])
            & Expr::sym("H").apply(vec![z.clone()]);

        assert_eq!(subst(&subst_compose(&s1, &s2), &p), subst(&s2, &subst(&s1, &p)));
        assert_eq!(subst(&subst_compose(&s2, &s1), &p), subst(&s1, &subst(&s2, &p)));
    }

    #[test]
    fn test_restrict() {
        let (x, y) = (var("x"), var("y"));
        let s: Substitution = [
            (x.clone(), Expr::sym("A")),
            (y.clone(), Expr::sym("B")),
        ]
        .into_iter()
        .collect();
        let restricted = s.restrict([&x]);
        assert_eq!(restricted.len(), 1);
        assert_eq!(restricted.get(&x), Some(&Expr::sym("A")));
    }
}
