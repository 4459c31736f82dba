use tracing::debug;

use crate::dsl::{self, Proposition};
use crate::error::{FuzzyError, Result};
use crate::expr::{Bindings, Consequent, ConsequentCompiler};
use crate::inputs::Inputs;
use crate::ops::AndOp;
use crate::variable::{VariableKey, Variables};

/// The outcome of one rule: firing strength `w` and crisp output `z`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Firing {
    pub w: f64,
    pub z: f64,
}

#[derive(Debug)]
struct Clause {
    proposition: Proposition,
    key: VariableKey,
}

/// A compiled Sugeno rule. Immutable once compiled.
#[derive(Debug)]
pub struct Rule {
    text: String,
    antecedent: Vec<Clause>,
    and_op: AndOp,
    consequent: Box<dyn Consequent>,
}

// Arguments first, then the caller's extra context
struct Scope<'a> {
    args: &'a Inputs,
    context: Option<&'a Inputs>,
}

impl Bindings for Scope<'_> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.args
            .get(name)
            .or_else(|| self.context.and_then(|context| context.get(name)))
    }
}

impl Rule {
    /// Compiles already normalized rule text. Every linguistic variable is
    /// resolved to its key here, never at evaluation time.
    pub(crate) fn compile(
        text: String,
        variables: &Variables,
        and_op: AndOp,
        compiler: &dyn ConsequentCompiler,
    ) -> Result<Self> {
        let parsed = dsl::parse(&text)?;
        let antecedent = parsed
            .antecedent
            .into_iter()
            .map(|proposition| {
                let key = variables.resolve(&proposition.variable)?;
                Ok(Clause { proposition, key })
            })
            .collect::<Result<Vec<_>>>()?;
        let consequent = compiler.compile(parsed.consequent)?;

        Ok(Rule {
            text,
            antecedent,
            and_op,
            consequent,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn and_op(&self) -> AndOp {
        self.and_op
    }

    pub fn antecedent(&self) -> impl Iterator<Item = &Proposition> {
        self.antecedent.iter().map(|clause| &clause.proposition)
    }

    /// Computes `(w, z)` for this rule.
    ///
    /// A parameter missing from `args` contributes a NaN alpha, which makes
    /// the firing strength NaN. `context` may only bind names that are not
    /// antecedent parameters.
    pub fn evaluate(&self, variables: &Variables, args: &Inputs, context: Option<&Inputs>) -> Result<Firing> {
        if let Some(context) = context {
            if let Some(clause) = self
                .antecedent
                .iter()
                .find(|clause| context.contains(&clause.proposition.parameter))
            {
                return Err(FuzzyError::AmbiguousBinding {
                    name: clause.proposition.parameter.clone(),
                });
            }
        }

        let alphas: Vec<f64> = self
            .antecedent
            .iter()
            .map(|clause| match args.get(&clause.proposition.parameter) {
                Some(x) if !x.is_nan() => variables.degree(clause.key, x),
                _ => f64::NAN,
            })
            .collect();

        let w = self.and_op.combine(alphas.iter().copied());
        if w.is_nan() {
            return Err(FuzzyError::NaNFiringStrength { rule: self.text.clone() });
        }

        let z = self.consequent.evaluate(&Scope { args, context });
        if z.is_nan() {
            return Err(FuzzyError::NaNConsequent { rule: self.text.clone() });
        }

        debug!(rule = %self.text, ?alphas, w, z, "rule evaluated");

        Ok(Firing { w, z })
    }
}

#[cfg(test)]
use crate::expr::ArithmeticCompiler;
#[cfg(test)]
use crate::membership::{from_fn, shared};

#[cfg(test)]
fn large(x: f64) -> f64 {
    if x >= 100. {
        1.
    } else if x >= 35. {
        0.5
    } else {
        0.
    }
}

#[cfg(test)]
fn variables() -> Variables {
    let mut vars = Variables::new();
    vars.set("large", shared(from_fn(large)));
    vars
}

#[cfg(test)]
fn compile(text: &str) -> Result<Rule> {
    Rule::compile(dsl::normalize(text), &variables(), AndOp::Min, &ArithmeticCompiler)
}

#[test]
fn test_compile() {
    let rule = compile("If X is Large and y is large then 3x + 3y").unwrap();

    assert_eq!(rule.text(), "if x is large and y is large then 3x + 3y");
    assert_eq!(
        rule.antecedent().map(|p| p.parameter.as_str()).collect::<Vec<_>>(),
        vec!["x", "y"]
    );
    assert_eq!(rule.and_op(), AndOp::Min);
}

#[test]
fn test_unknown_variable() {
    assert_eq!(
        compile("if x is large and y is tiny then x").unwrap_err(),
        FuzzyError::UnknownLinguisticVariable("tiny".to_owned())
    );
}

#[test]
fn test_evaluate() {
    let vars = variables();
    let rule = Rule::compile(
        dsl::normalize("if x is large and y is large then 3x + 3y"),
        &vars,
        AndOp::Min,
        &ArithmeticCompiler,
    )
    .unwrap();

    let firing = rule.evaluate(&vars, &Inputs::from([("x", 100.), ("y", 40.)]), None).unwrap();

    assert_eq!(firing, Firing { w: 0.5, z: 420. });
}

#[test]
fn test_missing_parameter_is_nan_firing_strength() {
    let vars = variables();
    let rule = Rule::compile(
        dsl::normalize("if x is large and y is large then 1"),
        &vars,
        AndOp::Min,
        &ArithmeticCompiler,
    )
    .unwrap();

    assert!(matches!(
        rule.evaluate(&vars, &Inputs::from([("x", 100.)]), None),
        Err(FuzzyError::NaNFiringStrength { .. })
    ));
}

#[test]
fn test_consequent_context() {
    let vars = variables();
    let rule = Rule::compile(
        dsl::normalize("if x is large then t + x"),
        &vars,
        AndOp::Prod,
        &ArithmeticCompiler,
    )
    .unwrap();
    let args = Inputs::from([("x", 100.)]);

    let firing = rule.evaluate(&vars, &args, Some(&Inputs::from([("t", 5.)]))).unwrap();
    assert_eq!(firing, Firing { w: 1., z: 105. });

    assert!(matches!(
        rule.evaluate(&vars, &args, None),
        Err(FuzzyError::NaNConsequent { .. })
    ));
    assert_eq!(
        rule.evaluate(&vars, &args, Some(&Inputs::from([("x", 5.)]))),
        Err(FuzzyError::AmbiguousBinding { name: "x".to_owned() })
    );
}
