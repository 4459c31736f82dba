//! Consequent expressions of Sugeno rules.
//!
//! A rule hands the text after `then` to a [`ConsequentCompiler`] once, at
//! registration, and evaluates the compiled [`Consequent`] against the
//! caller's bindings on every inference. [`ArithmeticCompiler`] is the
//! built-in compiler; any other evaluator can be plugged in through the
//! builder.

use std::collections::HashMap;
use std::fmt;

use nom::branch::alt;
use nom::bytes::complete::{tag, take_while, take_while1};
use nom::character::complete::{char, digit0, digit1, multispace0, one_of};
use nom::combinator::{opt, recognize};
use nom::sequence::{pair, preceded};
use nom::IResult;
use tracing::trace;

use crate::error::{FuzzyError, Result};

/// Name to value lookup for consequent variables.
pub trait Bindings {
    fn lookup(&self, name: &str) -> Option<f64>;
}

impl Bindings for HashMap<String, f64> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl<B: Bindings + ?Sized> Bindings for &B {
    fn lookup(&self, name: &str) -> Option<f64> {
        (**self).lookup(name)
    }
}

/// A compiled consequent. Unbound variables evaluate to NaN.
pub trait Consequent: fmt::Debug + Send + Sync {
    fn evaluate(&self, bindings: &dyn Bindings) -> f64;
}

pub trait ConsequentCompiler: Send + Sync {
    fn compile(&self, text: &str) -> Result<Box<dyn Consequent>>;
}

/// Compiles arithmetic over numbers and named variables.
///
/// Supports `+ - * / ^`, unary minus, parentheses, implicit multiplication
/// (`3x`, `2(x + y)`, `x y`), the constants `pi` and `e`, and the functions
/// `abs sqrt exp ln log sin cos tan` plus the binary `min max pow`.
/// Implicit multiplication binds like `*`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArithmeticCompiler;

impl ConsequentCompiler for ArithmeticCompiler {
    fn compile(&self, text: &str) -> Result<Box<dyn Consequent>> {
        Ok(Box::new(Expression::parse(text)?))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Function {
    Abs,
    Sqrt,
    Exp,
    Ln,
    Log,
    Sin,
    Cos,
    Tan,
    Min,
    Max,
    Pow,
}

impl Function {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "abs" => Self::Abs,
            "sqrt" => Self::Sqrt,
            "exp" => Self::Exp,
            "ln" => Self::Ln,
            "log" => Self::Log,
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "min" => Self::Min,
            "max" => Self::Max,
            "pow" => Self::Pow,
            _ => return None,
        })
    }

    fn arity(self) -> usize {
        match self {
            Self::Min | Self::Max | Self::Pow => 2,
            _ => 1,
        }
    }

    fn call(self, args: &[f64]) -> f64 {
        match (self, args) {
            (Self::Abs, [x]) => x.abs(),
            (Self::Sqrt, [x]) => x.sqrt(),
            (Self::Exp, [x]) => x.exp(),
            (Self::Ln, [x]) => x.ln(),
            (Self::Log, [x]) => x.log10(),
            (Self::Sin, [x]) => x.sin(),
            (Self::Cos, [x]) => x.cos(),
            (Self::Tan, [x]) => x.tan(),
            (Self::Min, [x, y]) => if x.is_nan() || y.is_nan() { f64::NAN } else { x.min(*y) },
            (Self::Max, [x, y]) => if x.is_nan() || y.is_nan() { f64::NAN } else { x.max(*y) },
            (Self::Pow, [x, y]) => x.powf(*y),
            _ => f64::NAN,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Clone, Debug, PartialEq)]
enum Node {
    Number(f64),
    Variable(String),
    Neg(Box<Node>),
    Binary(BinaryOp, Box<Node>, Box<Node>),
    Call(Function, Vec<Node>),
}

impl Node {
    fn eval(&self, bindings: &dyn Bindings) -> f64 {
        match self {
            Node::Number(n) => *n,
            Node::Variable(name) => match bindings.lookup(name) {
                Some(value) => value,
                None => match name.as_str() {
                    "pi" => std::f64::consts::PI,
                    "e" => std::f64::consts::E,
                    _ => {
                        trace!(variable = %name, "unbound consequent variable");
                        f64::NAN
                    },
                },
            },
            Node::Neg(operand) => -operand.eval(bindings),
            Node::Binary(op, lhs, rhs) => {
                let (lhs, rhs) = (lhs.eval(bindings), rhs.eval(bindings));

                match op {
                    BinaryOp::Add => lhs + rhs,
                    BinaryOp::Sub => lhs - rhs,
                    BinaryOp::Mul => lhs * rhs,
                    BinaryOp::Div => lhs / rhs,
                    BinaryOp::Pow => lhs.powf(rhs),
                }
            },
            Node::Call(function, args) => {
                let args: Vec<f64> = args.iter().map(|arg| arg.eval(bindings)).collect();
                function.call(&args)
            },
        }
    }

    fn collect_variables<'n>(&'n self, out: &mut Vec<&'n str>) {
        match self {
            Node::Number(_) => {},
            Node::Variable(name) => {
                if !out.contains(&name.as_str()) {
                    out.push(name);
                }
            },
            Node::Neg(operand) => operand.collect_variables(out),
            Node::Binary(_, lhs, rhs) => {
                lhs.collect_variables(out);
                rhs.collect_variables(out);
            },
            Node::Call(_, args) => {
                for arg in args {
                    arg.collect_variables(out);
                }
            },
        }
    }
}

/// A parsed arithmetic expression.
#[derive(Clone, Debug, PartialEq)]
pub struct Expression {
    text: String,
    root: Node,
}

impl Expression {
    pub fn parse(text: &str) -> Result<Self> {
        let mut parser = Parser { source: text, depth: 0 };
        let (rest, root) = parser.expression(text)?;

        if !rest.trim_start().is_empty() {
            return Err(parser.error(rest, "unexpected trailing input"));
        }

        Ok(Expression {
            text: text.to_owned(),
            root,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Variable names in order of first appearance, constants included.
    pub fn variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.root.collect_variables(&mut out);
        out
    }
}

impl Consequent for Expression {
    fn evaluate(&self, bindings: &dyn Bindings) -> f64 {
        self.root.eval(bindings)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn syntax_error(text: &str, offset: usize, reason: impl Into<String>) -> FuzzyError {
    FuzzyError::ExpressionSyntax {
        expression: text.to_owned(),
        offset,
        reason: reason.into(),
    }
}

/// Nesting allowed before parsing gives up. Parentheses, signs, powers and
/// function arguments each count one level.
const MAX_DEPTH: usize = 128;

/// Runs `parser` after any leading whitespace.
fn lex<'s, O>(input: &'s str, parser: impl FnMut(&'s str) -> IResult<&'s str, O>) -> Option<(&'s str, O)> {
    preceded(multispace0, parser)(input).ok()
}

/// `12`, `12.`, `12.5` or `.5`. Exponents are left out so that `2e` reads as
/// `2 * e`.
fn number(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(pair(digit1, opt(pair(char('.'), digit0)))),
        recognize(pair(char('.'), digit1)),
    ))(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))(input)
}

// expression := term (('+' | '-') term)*
// term       := unary (('*' | '/' | <implicit>) unary)*
// unary      := ('-' | '+') unary | power
// power      := primary ('^' unary)?
// primary    := number | ident | ident '(' args ')' | '(' expression ')'
struct Parser<'s> {
    source: &'s str,
    depth: usize,
}

impl<'s> Parser<'s> {
    fn error(&self, input: &'s str, reason: impl Into<String>) -> FuzzyError {
        let offset = self.source.len() - input.trim_start().len();

        syntax_error(self.source, offset, reason)
    }

    fn expression(&mut self, input: &'s str) -> Result<(&'s str, Node)> {
        let (mut input, mut lhs) = self.term(input)?;

        while let Some((rest, op)) = lex(input, one_of("+-")) {
            let op = if op == '+' { BinaryOp::Add } else { BinaryOp::Sub };
            let (rest, rhs) = self.term(rest)?;

            lhs = Node::Binary(op, Box::new(lhs), Box::new(rhs));
            input = rest;
        }

        Ok((input, lhs))
    }

    fn term(&mut self, input: &'s str) -> Result<(&'s str, Node)> {
        let (mut input, mut lhs) = self.unary(input)?;

        loop {
            let (rest, op) = if let Some((rest, op)) = lex(input, one_of("*/")) {
                (rest, if op == '*' { BinaryOp::Mul } else { BinaryOp::Div })
            } else if lex(input, alt((identifier, tag("(")))).is_some() {
                // Implicit multiplication: `3x`, `2(x + 1)`, `x y`
                (input, BinaryOp::Mul)
            } else {
                return Ok((input, lhs));
            };
            let (rest, rhs) = self.unary(rest)?;

            lhs = Node::Binary(op, Box::new(lhs), Box::new(rhs));
            input = rest;
        }
    }

    fn unary(&mut self, input: &'s str) -> Result<(&'s str, Node)> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error(input, "expression nested too deeply"));
        }

        let parsed = match lex(input, one_of("+-")) {
            Some((rest, '-')) => self
                .unary(rest)
                .map(|(rest, operand)| (rest, Node::Neg(Box::new(operand)))),
            Some((rest, _)) => self.unary(rest),
            None => self.power(input),
        };

        self.depth -= 1;
        parsed
    }

    fn power(&mut self, input: &'s str) -> Result<(&'s str, Node)> {
        let (input, base) = self.primary(input)?;

        match lex(input, char('^')) {
            Some((rest, _)) => {
                let (rest, exponent) = self.unary(rest)?;
                Ok((rest, Node::Binary(BinaryOp::Pow, Box::new(base), Box::new(exponent))))
            },
            None => Ok((input, base)),
        }
    }

    fn primary(&mut self, input: &'s str) -> Result<(&'s str, Node)> {
        if let Some((rest, literal)) = lex(input, number) {
            let value = literal
                .parse::<f64>()
                .map_err(|_| self.error(input, format!("invalid number `{literal}`")))?;

            return Ok((rest, Node::Number(value)));
        }

        if let Some((rest, name)) = lex(input, identifier) {
            if let (Some(function), Some((args_input, _))) = (Function::from_name(name), lex(rest, char('('))) {
                let (rest, args) = self.arguments(args_input)?;

                if args.len() != function.arity() {
                    return Err(self.error(
                        input,
                        format!("`{name}` takes {} argument(s), got {}", function.arity(), args.len()),
                    ));
                }

                return Ok((rest, Node::Call(function, args)));
            }

            return Ok((rest, Node::Variable(name.to_owned())));
        }

        if let Some((rest, _)) = lex(input, char('(')) {
            let (rest, inner) = self.expression(rest)?;
            let (rest, _) = lex(rest, char(')')).ok_or_else(|| self.error(rest, "expected `)`"))?;

            return Ok((rest, inner));
        }

        if input.trim_start().is_empty() {
            Err(self.error(input, "unexpected end of input"))
        } else {
            Err(self.error(input, "expected a number, a variable or `(`"))
        }
    }

    fn arguments(&mut self, input: &'s str) -> Result<(&'s str, Vec<Node>)> {
        if let Some((rest, _)) = lex(input, char(')')) {
            return Ok((rest, Vec::new()));
        }

        let mut args = Vec::new();
        let mut input = input;

        loop {
            let (rest, arg) = self.expression(input)?;
            args.push(arg);

            if let Some((rest, _)) = lex(rest, char(',')) {
                input = rest;
                continue;
            }

            let (rest, _) = lex(rest, char(')')).ok_or_else(|| self.error(rest, "expected `,` or `)`"))?;

            return Ok((rest, args));
        }
    }
}

#[cfg(test)]
fn bindings(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[cfg(test)]
fn eval(text: &str, pairs: &[(&str, f64)]) -> f64 {
    Expression::parse(text).unwrap().evaluate(&bindings(pairs))
}

#[test]
fn test_implicit_multiplication() {
    assert_eq!(eval("3x + 2y", &[("x", 100.), ("y", 25.)]), 350.);
    assert_eq!(eval("2(x + y)", &[("x", 1.), ("y", 2.)]), 6.);
    assert_eq!(eval("x y", &[("x", 3.), ("y", 4.)]), 12.);
}

#[test]
fn test_precedence() {
    assert_eq!(eval("1 + 2 * 3", &[]), 7.);
    assert_eq!(eval("(1 + 2) * 3", &[]), 9.);
    assert_eq!(eval("2 ^ 3 ^ 2", &[]), 512.);
    assert_eq!(eval("-2 ^ 2", &[]), -4.);
    assert_eq!(eval("10 / 4 - 1", &[]), 1.5);
    assert_eq!(eval("x - -1", &[("x", 1.)]), 2.);
}

#[test]
fn test_functions_and_constants() {
    assert_eq!(eval("max(x, 3) + min(1, 2)", &[("x", 5.)]), 6.);
    assert_eq!(eval("sqrt(16) + abs(-2)", &[]), 6.);
    assert_eq!(eval("pow(2, 10)", &[]), 1024.);
    assert!((eval("2pi", &[]) - std::f64::consts::TAU).abs() < 1e-12);
    assert_eq!(eval("e", &[("e", 3.)]), 3.);
}

#[test]
fn test_unbound_variable_is_nan() {
    assert!(eval("t + 1", &[]).is_nan());
}

#[test]
fn test_variables() {
    let expr = Expression::parse("3x + 2y + x").unwrap();

    assert_eq!(expr.variables(), vec!["x", "y"]);
    assert_eq!(expr.to_string(), "3x + 2y + x");
}

#[test]
fn test_syntax_errors() {
    for bad in ["", "3 +", "(x + 1", "x $ y", "max(1)", "1..2", "x )"] {
        assert!(
            matches!(Expression::parse(bad), Err(FuzzyError::ExpressionSyntax { .. })),
            "`{bad}` should not parse"
        );
    }
}

#[test]
fn test_error_offsets() {
    let offset_of = |text: &str| match Expression::parse(text) {
        Err(FuzzyError::ExpressionSyntax { offset, .. }) => offset,
        other => panic!("`{text}` parsed to {other:?}"),
    };

    assert_eq!(offset_of("3 +"), 3);
    assert_eq!(offset_of("x $ y"), 2);
    assert_eq!(offset_of("(x + 1"), 6);
}

#[test]
fn test_nesting_limit() {
    let nested = |depth: usize| format!("{}t{}", "(".repeat(depth), ")".repeat(depth));

    assert_eq!(eval(&nested(100), &[("t", 2.)]), 2.);
    assert_eq!(eval(&("-".repeat(100) + "t"), &[("t", 2.)]), 2.);

    for deep in [nested(600), "-".repeat(10_000) + "t", "2^".repeat(600) + "2"] {
        match Expression::parse(&deep) {
            Err(FuzzyError::ExpressionSyntax { reason, .. }) => assert_eq!(reason, "expression nested too deeply"),
            other => panic!("expected a nesting error, got {other:?}"),
        }
    }
}

#[test]
fn test_arithmetic_compiler() {
    let compiled = ArithmeticCompiler.compile("x + y").unwrap();

    assert_eq!(compiled.evaluate(&bindings(&[("x", 1.), ("y", 2.)])), 3.);
}
