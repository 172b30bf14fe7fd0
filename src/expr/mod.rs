//! Logical expression trees
//!
//! This module defines the core data type for representing logical and
//! arithmetic terms: an [`Expr`] is an operator together with an ordered
//! sequence of argument expressions. The operator can be:
//!
//! - Null-ary (no args): an integer numeral, or a symbol naming a constant,
//!   variable, or proposition (`42`, `P`, `x`)
//! - Unary: `~` (negation), `-` (unary minus)
//! - Binary: `>>`/`<<` (forward/reverse implication), `<=>`, `^`,
//!   arithmetic (`+ - * / **`), comparisons (`< > <= >=`)
//! - N-ary/associative: `&` (conjunction), `|` (disjunction), or a symbol
//!   applied to arguments (a function term or first-order atom, `F(x, y)`)
//!
//! Expressions are immutable and structurally shared: argument vectors live
//! behind an `Arc` and no node is ever mutated after construction. Equality
//! and hashing are purely structural over (operator, ordered arguments), so
//! expressions are safe as set and map keys.
//!
//! Construction supports operator overloading in the style of the surface
//! notation: if `p` and `q` are `Expr`s then so are `!p`, `p & q`, `p | q`,
//! `p >> q`, and `p << q`; use [`Expr::iff`] and [`Expr::xor`] for the
//! remaining connectives and [`Expr::apply`] for `F(x, y)`.

use std::fmt;
use std::ops;
use std::sync::Arc;

use indexmap::IndexSet;

/// The operator of an expression node: a symbol name or an integer numeral.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Op {
    /// A named operator, proposition, function, or variable symbol.
    Sym(Arc<str>),
    /// An integer numeral. Always a leaf; never has arguments.
    Num(i64),
}

impl Op {
    /// The operator name, if this is a named operator.
    pub fn name(&self) -> Option<&str> {
        match self {
            Op::Sym(s) => Some(s),
            Op::Num(_) => None,
        }
    }

    /// A symbol starts with an alphabetic character (as opposed to a
    /// punctuation operator like `&` or a numeral).
    pub fn is_symbol(&self) -> bool {
        matches!(self, Op::Sym(s) if s.chars().next().is_some_and(|c| c.is_alphabetic()))
    }

    /// A variable symbol starts with a lowercase character.
    pub fn is_var_symbol(&self) -> bool {
        matches!(self, Op::Sym(s) if s.chars().next().is_some_and(|c| c.is_lowercase()))
    }

    /// A proposition symbol is any symbol other than the constants
    /// `TRUE` and `FALSE`.
    pub fn is_prop_symbol(&self) -> bool {
        self.is_symbol() && self.name() != Some("TRUE") && self.name() != Some("FALSE")
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Sym(s) => write!(f, "{}", s),
            Op::Num(n) => write!(f, "{}", n),
        }
    }
}

impl fmt::Debug for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<&str> for Op {
    fn from(s: &str) -> Self {
        Op::Sym(Arc::from(s))
    }
}

impl From<String> for Op {
    fn from(s: String) -> Self {
        Op::Sym(Arc::from(s.as_str()))
    }
}

impl From<i64> for Op {
    fn from(n: i64) -> Self {
        Op::Num(n)
    }
}

/// An immutable expression tree node.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Expr {
    op: Op,
    args: Arc<Vec<Expr>>,
}

impl Expr {
    /// Build a node from an operator and argument expressions.
    pub fn new(op: impl Into<Op>, args: Vec<Expr>) -> Self {
        Expr {
            op: op.into(),
            args: Arc::new(args),
        }
    }

    /// A symbol leaf: a constant, variable, or proposition.
    pub fn sym(name: &str) -> Self {
        Expr::new(name, Vec::new())
    }

    /// An integer numeral leaf.
    pub fn num(n: i64) -> Self {
        Expr::new(n, Vec::new())
    }

    /// The constant true proposition.
    pub fn truth() -> Self {
        Expr::sym("TRUE")
    }

    /// The constant false proposition.
    pub fn falsity() -> Self {
        Expr::sym("FALSE")
    }

    /// A unary application, e.g. `Expr::unary("~", p)`.
    pub fn unary(op: impl Into<Op>, arg: Expr) -> Self {
        Expr::new(op, vec![arg])
    }

    /// A binary application, e.g. `Expr::binary(">>", p, q)`.
    pub fn binary(op: impl Into<Op>, left: Expr, right: Expr) -> Self {
        Expr::new(op, vec![left, right])
    }

    /// Apply this symbol to arguments, building a function term or atom:
    /// `Expr::sym("F").apply(vec![x, y])` is `F(x, y)`.
    ///
    /// The receiver must be a symbol leaf; applying a compound expression
    /// or a numeral is a logic error in the caller.
    pub fn apply(&self, args: Vec<Expr>) -> Self {
        debug_assert!(self.op.is_symbol() && self.args.is_empty());
        Expr::new(self.op.clone(), args)
    }

    pub fn op(&self) -> &Op {
        &self.op
    }

    /// The operator name, if the operator is a named one.
    pub fn op_name(&self) -> Option<&str> {
        self.op.name()
    }

    pub fn args(&self) -> &[Expr] {
        &self.args
    }

    /// Check the operator against a name, e.g. `e.is_op("&")`.
    pub fn is_op(&self, name: &str) -> bool {
        self.op.name() == Some(name)
    }

    /// A leaf has no arguments.
    pub fn is_leaf(&self) -> bool {
        self.args.is_empty()
    }

    /// A variable is a leaf whose symbol starts lowercase.
    pub fn is_variable(&self) -> bool {
        self.args.is_empty() && self.op.is_var_symbol()
    }

    /// An unnegated expression (any operator other than `~`).
    pub fn is_positive(&self) -> bool {
        !self.is_op("~")
    }

    /// A literal is an atomic expression (symbolic operator, no logical
    /// connective at the root) or the negation of one.
    pub fn is_literal(&self) -> bool {
        self.op.is_symbol() || (self.is_op("~") && self.args.len() == 1 && self.args[0].is_literal())
    }

    /// The literals of this expression, left to right.
    ///
    /// Connective nodes are traversed; anything else that is not a literal
    /// contributes nothing.
    pub fn literals(&self) -> Vec<Expr> {
        const CONNECTIVES: [&str; 6] = ["&", "|", "<<", ">>", "<=>", "^"];
        if self
            .op_name()
            .is_some_and(|op| CONNECTIVES.contains(&op))
        {
            self.args.iter().flat_map(|a| a.literals()).collect()
        } else if self.is_literal() {
            vec![self.clone()]
        } else {
            Vec::new()
        }
    }

    /// The set of variables occurring in this expression.
    pub fn variables(&self) -> IndexSet<Expr> {
        let mut vars = IndexSet::new();
        for lit in self.literals() {
            collect_variables(&lit, &mut vars);
        }
        vars
    }

    /// A definite clause is a bare atom, or an implication whose literals
    /// are all positive (a conjunction of atoms implying a single atom).
    pub fn is_definite_clause(&self) -> bool {
        self.op.is_symbol()
            || (self.is_op(">>") && self.literals().iter().all(Expr::is_positive))
    }

    /// All propositional symbols in this expression.
    ///
    /// A whole atom such as `F(x)` counts as one symbol; its arguments are
    /// not descended into.
    pub fn prop_symbols(&self) -> IndexSet<Expr> {
        let mut symbols = IndexSet::new();
        collect_prop_symbols(self, &mut symbols);
        symbols
    }

    /// Biconditional connective: `p.iff(q)` is `(p <=> q)`.
    pub fn iff(self, other: Expr) -> Self {
        Expr::binary("<=>", self, other)
    }

    /// Exclusive disjunction: `p.xor(q)` is `(p ^ q)`.
    pub fn xor(self, other: Expr) -> Self {
        Expr::binary("^", self, other)
    }
}

fn collect_variables(e: &Expr, vars: &mut IndexSet<Expr>) {
    if e.is_variable() {
        vars.insert(e.clone());
    } else {
        for arg in e.args() {
            collect_variables(arg, vars);
        }
    }
}

fn collect_prop_symbols(e: &Expr, symbols: &mut IndexSet<Expr>) {
    if e.op.is_prop_symbol() {
        symbols.insert(e.clone());
    } else {
        for arg in e.args() {
            collect_prop_symbols(arg, symbols);
        }
    }
}

impl ops::Not for Expr {
    type Output = Expr;
    fn not(self) -> Expr {
        Expr::unary("~", self)
    }
}

impl ops::BitAnd for Expr {
    type Output = Expr;
    fn bitand(self, rhs: Expr) -> Expr {
        Expr::binary("&", self, rhs)
    }
}

impl ops::BitOr for Expr {
    type Output = Expr;
    fn bitor(self, rhs: Expr) -> Expr {
        Expr::binary("|", self, rhs)
    }
}

impl ops::Shr for Expr {
    type Output = Expr;
    fn shr(self, rhs: Expr) -> Expr {
        Expr::binary(">>", self, rhs)
    }
}

impl ops::Shl for Expr {
    type Output = Expr;
    fn shl(self, rhs: Expr) -> Expr {
        Expr::binary("<<", self, rhs)
    }
}

impl fmt::Display for Expr {
    /// Renders `P` for a bare symbol, `F(x, y)` for a symbolic operator
    /// with arguments, `~P` for a unary punctuation operator, and
    /// `(A & B & C)` for everything else.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            write!(f, "{}", self.op)
        } else if self.op.is_symbol() {
            write!(f, "{}(", self.op)?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ")")
        } else if self.args.len() == 1 {
            write!(f, "{}{}", self.op, self.args[0])
        } else {
            write!(f, "(")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, " {} ", self.op)?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ")")
        }
    }
}

// Display is also the Debug rendering; the derive would print the Arc
// plumbing, which is never what a failing test wants to show.
impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p() -> Expr {
        Expr::sym("P")
    }

    fn q() -> Expr {
        Expr::sym("Q")
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(p() & q(), p() & q());
        assert_ne!(p() & q(), q() & p());
        assert_ne!(p(), q());
        assert_eq!(Expr::num(42), Expr::num(42));
    }

    #[test]
    fn test_exprs_as_map_keys() {
        let mut set = IndexSet::new();
        set.insert(p() & q());
        set.insert(p() & q());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(p().to_string(), "P");
        assert_eq!((!p()).to_string(), "~P");
        assert_eq!((p() & q()).to_string(), "(P & Q)");
        assert_eq!((p() >> q()).to_string(), "(P >> Q)");
        let f = Expr::sym("F").apply(vec![Expr::sym("x"), Expr::sym("A")]);
        assert_eq!(f.to_string(), "F(x, A)");
        assert_eq!(Expr::num(7).to_string(), "7");
        assert_eq!((!(p() | q())).to_string(), "~(P | Q)");
    }

    #[test]
    fn test_variable_recognition() {
        assert!(Expr::sym("x").is_variable());
        assert!(!Expr::sym("X").is_variable());
        assert!(!Expr::num(1).is_variable());
        // An applied symbol is not a variable even if lowercase.
        assert!(!Expr::sym("f").apply(vec![p()]).is_variable());
    }

    #[test]
    fn test_is_literal() {
        let f = Expr::sym("F").apply(vec![Expr::sym("A"), Expr::sym("B")]);
        assert!(f.is_literal());
        assert!((!f.clone()).is_literal());
        let g = Expr::sym("G").apply(vec![Expr::sym("B")]);
        assert!(!(f & g).is_literal());
    }

    #[test]
    fn test_literals() {
        let f = Expr::sym("F").apply(vec![Expr::sym("A"), Expr::sym("B")]);
        let g = Expr::sym("G").apply(vec![Expr::sym("B"), Expr::sym("C")]);
        let r = Expr::sym("R").apply(vec![Expr::sym("A"), Expr::sym("C")]);
        let rule = (f.clone() & g.clone()) >> r.clone();
        assert_eq!(rule.literals(), vec![f.clone(), g, r]);
        assert_eq!((!f.clone()).literals(), vec![!f]);
    }

    #[test]
    fn test_variables() {
        let x = Expr::sym("x");
        let y = Expr::sym("y");
        let f = Expr::sym("F").apply(vec![x.clone(), Expr::sym("A"), y.clone()]);
        let vars = f.variables();
        assert_eq!(vars.len(), 2);
        assert!(vars.contains(&x));
        assert!(vars.contains(&y));
    }

    #[test]
    fn test_is_definite_clause() {
        let farmer = Expr::sym("Farmer").apply(vec![Expr::sym("Mac")]);
        assert!(farmer.is_definite_clause());
        assert!(!(!farmer.clone()).is_definite_clause());

        let f = Expr::sym("Farmer").apply(vec![Expr::sym("f")]);
        let r = Expr::sym("Rabbit").apply(vec![Expr::sym("r")]);
        let hates = Expr::sym("Hates").apply(vec![Expr::sym("f"), Expr::sym("r")]);
        assert!(((f.clone() & r.clone()) >> hates.clone()).is_definite_clause());
        assert!(!((f & !r) >> hates).is_definite_clause());
    }

    #[test]
    fn test_prop_symbols() {
        let syms = (p() & q()).prop_symbols();
        assert_eq!(syms.len(), 2);
        assert!(syms.contains(&p()));

        // The whole atom F(a) is a symbol; so is the bare a beside it.
        let a = Expr::sym("a");
        let fa = Expr::sym("F").apply(vec![a.clone()]);
        let syms = (fa.clone() & a.clone()).prop_symbols();
        assert_eq!(syms.len(), 2);
        assert!(syms.contains(&fa));
        assert!(syms.contains(&a));

        // TRUE and FALSE are not proposition symbols.
        assert!((Expr::truth() & p()).prop_symbols().contains(&p()));
        assert_eq!((Expr::truth() & Expr::falsity()).prop_symbols().len(), 0);
    }

    #[test]
    fn test_hash_follows_structure() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let hash = |e: &Expr| {
            let mut h = DefaultHasher::new();
            e.hash(&mut h);
            h.finish()
        };
        assert_eq!(hash(&(p() & q())), hash(&(p() & q())));
    }
}
