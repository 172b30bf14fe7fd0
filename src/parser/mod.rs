//! Expression notation parser
//!
//! This module implements a parser for the minimal textual expression
//! notation. Alternate spellings of the connectives are normalized to their
//! canonical operators before parsing:
//!
//! - `x ==> y` parses as `x >> y` (implication)
//! - `x <== y` parses as `x << y` (reverse implication)
//! - `x <=> y` parses as the biconditional
//! - `x =/= y` parses as `x ^ y` (exclusive disjunction)
//!
//! Numeric tokens become integer leaves, alphanumeric tokens become symbol
//! leaves, and `F(a, b)` builds an application node.
//!
//! # Precedence
//!
//! The notation deliberately preserves its historical precedence quirk:
//! implication binds *tighter* than conjunction, and the biconditional
//! tighter still. `P & Q ==> R & S` therefore parses as
//! `((P & (Q >> R)) & S)`; write `(P & Q) ==> (R & S)` to get material
//! implication over conjunctions. From loosest to tightest:
//! comparisons, `|`, `^`, `&`, `>> <<`, `+ -`, `* / <=>`, unary `~ -`,
//! `**`. Binary connectives associate to the left; `**` to the right.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::multispace0,
    combinator::{cut, map, opt},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded},
    IResult,
};

use crate::error::{ErrorCode, ModusError};
use crate::expr::Expr;

/// Parser error type
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("syntax error at offset {offset}")]
    Syntax { offset: usize },

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("trailing input at offset {offset}: {rest:?}")]
    Trailing { offset: usize, rest: String },

    #[error("empty input")]
    Empty,
}

impl From<ParseError> for ModusError {
    fn from(err: ParseError) -> Self {
        let code = match &err {
            ParseError::Syntax { .. } => ErrorCode::ParseError,
            ParseError::UnexpectedEof => ErrorCode::UnexpectedEof,
            ParseError::Trailing { .. } => ErrorCode::TrailingInput,
            ParseError::Empty => ErrorCode::EmptyInput,
        };
        ModusError::new(code, err.to_string())
    }
}

/// Parse an expression from the textual notation.
pub fn parse_expr(input: &str) -> Result<Expr, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }
    let canonical = canonicalize_spellings(trimmed);

    match expression(&canonical) {
        Ok((rest, expr)) => {
            let rest = rest.trim_start();
            if rest.is_empty() {
                Ok(expr)
            } else {
                Err(ParseError::Trailing {
                    offset: canonical.len() - rest.len(),
                    rest: rest.to_string(),
                })
            }
        }
        Err(nom::Err::Incomplete(_)) => Err(ParseError::UnexpectedEof),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            if e.input.trim_start().is_empty() {
                Err(ParseError::UnexpectedEof)
            } else {
                Err(ParseError::Syntax {
                    offset: canonical.len() - e.input.len(),
                })
            }
        }
    }
}

/// Replace the alternative operator spellings with canonical ones.
///
/// `<=>` maps to the single-character placeholder `%` so the grammar can
/// treat the biconditional as one token at its (tight) precedence level.
fn canonicalize_spellings(s: &str) -> String {
    s.replace("==>", ">>")
        .replace("<==", "<<")
        .replace("<=>", "%")
        .replace("=/=", "^")
}

fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    preceded(multispace0, inner)
}

fn expression(input: &str) -> IResult<&str, Expr> {
    comparison(input)
}

fn comparison(input: &str) -> IResult<&str, Expr> {
    let (input, first) = or_expr(input)?;
    let (input, rest) = many0(pair(
        ws(alt((tag("<="), tag(">="), tag("<"), tag(">")))),
        cut(or_expr),
    ))(input)?;
    Ok((input, fold_infix(first, rest)))
}

fn or_expr(input: &str) -> IResult<&str, Expr> {
    let (input, first) = xor_expr(input)?;
    let (input, rest) = many0(pair(ws(tag("|")), cut(xor_expr)))(input)?;
    Ok((input, fold_infix(first, rest)))
}

fn xor_expr(input: &str) -> IResult<&str, Expr> {
    let (input, first) = and_expr(input)?;
    let (input, rest) = many0(pair(ws(tag("^")), cut(and_expr)))(input)?;
    Ok((input, fold_infix(first, rest)))
}

fn and_expr(input: &str) -> IResult<&str, Expr> {
    let (input, first) = implication(input)?;
    let (input, rest) = many0(pair(ws(tag("&")), cut(implication)))(input)?;
    Ok((input, fold_infix(first, rest)))
}

fn implication(input: &str) -> IResult<&str, Expr> {
    let (input, first) = additive(input)?;
    let (input, rest) = many0(pair(
        ws(alt((tag(">>"), tag("<<")))),
        cut(additive),
    ))(input)?;
    Ok((input, fold_infix(first, rest)))
}

fn additive(input: &str) -> IResult<&str, Expr> {
    let (input, first) = multiplicative(input)?;
    let (input, rest) = many0(pair(
        ws(alt((tag("+"), tag("-")))),
        cut(multiplicative),
    ))(input)?;
    Ok((input, fold_infix(first, rest)))
}

fn multiplicative(input: &str) -> IResult<&str, Expr> {
    let (input, first) = unary(input)?;
    let (input, rest) = many0(pair(
        ws(alt((tag("*"), tag("/"), tag("%")))),
        cut(unary),
    ))(input)?;
    Ok((input, fold_infix(first, rest)))
}

fn fold_infix(first: Expr, rest: Vec<(&str, Expr)>) -> Expr {
    rest.into_iter().fold(first, |lhs, (op, rhs)| {
        // "%" is the canonicalized spelling of the biconditional
        let op = if op == "%" { "<=>" } else { op };
        Expr::binary(op, lhs, rhs)
    })
}

fn unary(input: &str) -> IResult<&str, Expr> {
    alt((
        map(preceded(ws(tag("~")), cut(unary)), |e| Expr::unary("~", e)),
        map(preceded(ws(tag("-")), cut(unary)), |e| Expr::unary("-", e)),
        power,
    ))(input)
}

fn power(input: &str) -> IResult<&str, Expr> {
    let (input, base) = atom(input)?;
    // Right-associative: the exponent may itself carry a unary sign.
    let (input, exponent) = opt(preceded(ws(tag("**")), cut(unary)))(input)?;
    Ok((input, match exponent {
        Some(e) => Expr::binary("**", base, e),
        None => base,
    }))
}

fn atom(input: &str) -> IResult<&str, Expr> {
    ws(alt((parenthesized, leaf_or_application)))(input)
}

fn parenthesized(input: &str) -> IResult<&str, Expr> {
    delimited(tag("("), cut(expression), cut(ws(tag(")"))))(input)
}

fn leaf_or_application(input: &str) -> IResult<&str, Expr> {
    let (rest, token) = token(input)?;

    if token.chars().all(|c| c.is_ascii_digit()) {
        return match token.parse::<i64>() {
            Ok(n) => Ok((rest, Expr::num(n))),
            Err(_) => Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Digit,
            ))),
        };
    }
    if token.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        // A token like `1abc` is neither a numeral nor a symbol.
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::AlphaNumeric,
        )));
    }

    let (rest, args) = opt(delimited(
        ws(tag("(")),
        separated_list0(ws(tag(",")), expression),
        cut(ws(tag(")"))),
    ))(rest)?;

    Ok((rest, match args {
        Some(args) => Expr::new(token, args),
        None => Expr::sym(token),
    }))
}

fn token(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Expr {
        parse_expr(s).unwrap()
    }

    #[test]
    fn test_parse_symbols_and_numbers() {
        assert_eq!(parse("P"), Expr::sym("P"));
        assert_eq!(parse("x"), Expr::sym("x"));
        assert_eq!(parse("42"), Expr::num(42));
        assert_eq!(parse("snake_case"), Expr::sym("snake_case"));
    }

    #[test]
    fn test_parse_connectives() {
        let p = Expr::sym("P");
        let q = Expr::sym("Q");
        assert_eq!(parse("P & Q"), p.clone() & q.clone());
        assert_eq!(parse("P | Q"), p.clone() | q.clone());
        assert_eq!(parse("~P"), !p.clone());
        assert_eq!(parse("~~P"), !!p.clone());
        assert_eq!(parse("P >> Q"), p.clone() >> q.clone());
        assert_eq!(parse("P << Q"), p.clone() << q.clone());
        assert_eq!(parse("P ^ Q"), p.clone().xor(q.clone()));
        assert_eq!(parse("P <=> Q"), p.iff(q));
    }

    #[test]
    fn test_alternate_spellings() {
        assert_eq!(parse("P ==> Q"), parse("P >> Q"));
        assert_eq!(parse("P <== Q"), parse("P << Q"));
        assert_eq!(parse("P =/= Q"), parse("P ^ Q"));
    }

    #[test]
    fn test_application() {
        let expected = Expr::sym("F").apply(vec![Expr::sym("x"), Expr::sym("A")]);
        assert_eq!(parse("F(x, A)"), expected);
        assert_eq!(parse("P <=> Q(1)").to_string(), "(P <=> Q(1))");
        let nested = Expr::sym("R").apply(vec![
            Expr::sym("x"),
            Expr::sym("F").apply(vec![Expr::sym("x")]),
        ]);
        assert_eq!(parse("R(x, F(x))"), nested);
    }

    #[test]
    fn test_left_associative_fold() {
        let a = Expr::sym("A");
        let b = Expr::sym("B");
        let c = Expr::sym("C");
        assert_eq!(parse("A & B & C"), (a.clone() & b.clone()) & c.clone());
        assert_eq!(parse("A | B | C"), (a | b) | c);
    }

    #[test]
    fn test_standard_precedence() {
        // & binds tighter than |
        assert_eq!(parse("P & Q | ~R(x, F(x))").to_string(), "((P & Q) | ~R(x, F(x)))");
        // ~ binds tighter than &
        assert_eq!(parse("~P & Q"), !Expr::sym("P") & Expr::sym("Q"));
    }

    #[test]
    fn test_implication_precedence_quirk() {
        // Implication binds tighter than conjunction; this is the preserved
        // historical quirk of the notation.
        let p = Expr::sym("P");
        let q = Expr::sym("Q");
        let r = Expr::sym("R");
        let s = Expr::sym("S");
        assert_eq!(
            parse("P & Q ==> R & S"),
            (p.clone() & (q.clone() >> r.clone())) & s.clone()
        );
        assert_eq!(parse("(P & Q) ==> (R & S)"), (p & q) >> (r & s));
    }

    #[test]
    fn test_parenthesized_grouping() {
        assert_eq!(parse("(P | Q) & R").to_string(), "((P | Q) & R)");
        assert_eq!(parse("~(P | Q)").to_string(), "~(P | Q)");
    }

    #[test]
    fn test_definite_clause_notation() {
        let e = parse("(Rabbit(r) & Farmer(f)) ==> Hates(f, r)");
        assert!(e.is_definite_clause());
    }

    #[test]
    fn test_arithmetic_and_comparisons() {
        assert_eq!(parse("x + y").to_string(), "(x + y)");
        assert_eq!(parse("x + y * 2").to_string(), "(x + (y * 2))");
        assert_eq!(parse("x ** 2").to_string(), "(x ** 2)");
        assert_eq!(parse("-x").to_string(), "-x");
        assert_eq!(parse("x < y").to_string(), "(x < y)");
        assert_eq!(parse("x <= y").to_string(), "(x <= y)");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_expr(""), Err(ParseError::Empty)));
        assert!(matches!(parse_expr("   "), Err(ParseError::Empty)));
        assert!(matches!(parse_expr("P &"), Err(ParseError::UnexpectedEof)));
        assert!(matches!(parse_expr("(P | Q"), Err(ParseError::UnexpectedEof)));
        assert!(matches!(parse_expr("P Q"), Err(ParseError::Trailing { .. })));
        assert!(matches!(parse_expr("1abc"), Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn test_parse_error_converts_to_engine_error() {
        let err: ModusError = parse_expr("").unwrap_err().into();
        assert_eq!(err.code, ErrorCode::EmptyInput);
        let err: ModusError = parse_expr("P Q").unwrap_err().into();
        assert_eq!(err.code, ErrorCode::TrailingInput);
    }
}
