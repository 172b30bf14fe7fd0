//! Three-valued evaluation of propositional sentences

use crate::error::{ModusError, ModusResult};
use crate::expr::Expr;

use super::Model;

/// Evaluate a propositional sentence under a (possibly partial) model.
///
/// Returns `Some(true)` or `Some(false)` when the model determines the
/// sentence, and `None` ("unknown") when it does not. Unknown propagates
/// conservatively: a disjunction with one true disjunct is true no matter
/// the unknowns, a conjunction with one false conjunct is false, and
/// otherwise an unknown sub-term makes the result unknown.
///
/// An operator with no propositional meaning (arithmetic, comparisons, a
/// bare numeral) fails fast with an illegal-operator error rather than
/// guessing.
pub fn pl_true(exp: &Expr, model: &Model) -> ModusResult<Option<bool>> {
    if exp.is_leaf() {
        if exp.is_op("TRUE") {
            return Ok(Some(true));
        }
        if exp.is_op("FALSE") {
            return Ok(Some(false));
        }
    }
    if exp.op().is_prop_symbol() {
        // A whole atom such as F(x) is one symbol; look it up directly.
        return Ok(model.get(exp).copied());
    }

    let args = exp.args();
    match exp.op_name() {
        Some("~") if args.len() == 1 => Ok(pl_true(&args[0], model)?.map(|v| !v)),
        Some("|") => {
            let mut result = Some(false);
            for arg in args {
                match pl_true(arg, model)? {
                    Some(true) => return Ok(Some(true)),
                    None => result = None,
                    Some(false) => {}
                }
            }
            Ok(result)
        }
        Some("&") => {
            let mut result = Some(true);
            for arg in args {
                match pl_true(arg, model)? {
                    Some(false) => return Ok(Some(false)),
                    None => result = None,
                    Some(true) => {}
                }
            }
            Ok(result)
        }
        Some(">>") if args.len() == 2 => {
            let (p, q) = (args[0].clone(), args[1].clone());
            pl_true(&(!p | q), model)
        }
        Some("<<") if args.len() == 2 => {
            let (p, q) = (args[0].clone(), args[1].clone());
            pl_true(&(p | !q), model)
        }
        Some("<=>") if args.len() == 2 => {
            let pt = match pl_true(&args[0], model)? {
                Some(v) => v,
                None => return Ok(None),
            };
            let qt = match pl_true(&args[1], model)? {
                Some(v) => v,
                None => return Ok(None),
            };
            Ok(Some(pt == qt))
        }
        Some("^") if args.len() == 2 => {
            let pt = match pl_true(&args[0], model)? {
                Some(v) => v,
                None => return Ok(None),
            };
            let qt = match pl_true(&args[1], model)? {
                Some(v) => v,
                None => return Ok(None),
            };
            Ok(Some(pt != qt))
        }
        _ => Err(ModusError::illegal_operator(exp)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::parser::parse_expr;

    fn model(pairs: &[(&str, bool)]) -> Model {
        pairs
            .iter()
            .map(|(name, v)| (Expr::sym(name), *v))
            .collect()
    }

    fn eval(s: &str, m: &Model) -> Option<bool> {
        pl_true(&parse_expr(s).unwrap(), m).unwrap()
    }

    #[test]
    fn test_constants() {
        let empty = Model::new();
        assert_eq!(eval("TRUE", &empty), Some(true));
        assert_eq!(eval("FALSE", &empty), Some(false));
    }

    #[test]
    fn test_symbol_lookup() {
        let m = model(&[("P", true), ("Q", false)]);
        assert_eq!(eval("P", &m), Some(true));
        assert_eq!(eval("Q", &m), Some(false));
        assert_eq!(eval("R", &m), None);
    }

    #[test]
    fn test_connectives_total_model() {
        let m = model(&[("P", true), ("Q", false)]);
        assert_eq!(eval("P & Q", &m), Some(false));
        assert_eq!(eval("P | Q", &m), Some(true));
        assert_eq!(eval("~P", &m), Some(false));
        assert_eq!(eval("(P & Q) | ~Q", &m), Some(true));
        assert_eq!(eval("(P >> Q)", &m), Some(false));
        assert_eq!(eval("(Q >> P)", &m), Some(true));
        assert_eq!(eval("(P << Q)", &m), Some(true));
        assert_eq!(eval("P <=> Q", &m), Some(false));
        assert_eq!(eval("P ^ Q", &m), Some(true));
    }

    #[test]
    fn test_unknown_propagation() {
        let m = model(&[("P", true), ("Q", false)]);
        // unknown | true = true, unknown & false = false
        assert_eq!(eval("R | P", &m), Some(true));
        assert_eq!(eval("R & Q", &m), Some(false));
        // otherwise unknown
        assert_eq!(eval("R | Q", &m), None);
        assert_eq!(eval("R & P", &m), None);
        assert_eq!(eval("~R", &m), None);
        assert_eq!(eval("R <=> P", &m), None);
        assert_eq!(eval("R ^ Q", &m), None);
        // tautologies are still unknown under a partial model
        assert_eq!(eval("R | ~R", &m), None);
    }

    #[test]
    fn test_illegal_operator_fails_fast() {
        let m = Model::new();
        let err = pl_true(&parse_expr("x + y").unwrap(), &m).unwrap_err();
        assert_eq!(err.code, ErrorCode::IllegalOperator);
        let err = pl_true(&Expr::num(7), &m).unwrap_err();
        assert_eq!(err.code, ErrorCode::IllegalOperator);
    }
}
