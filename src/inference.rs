//! The Sugeno fuzzy inference system.
//!
//! A [`SugenoFisBuilder`] collects linguistic variables and compiles rules
//! as they are added; [`SugenoFisBuilder::build`] freezes the result into a
//! [`SugenoFis`] that only answers queries and can be shared across threads.

use std::collections::HashSet;

use tracing::debug;

use crate::dsl;
use crate::error::{FuzzyError, Result};
use crate::expr::{ArithmeticCompiler, ConsequentCompiler};
use crate::inputs::Inputs;
use crate::membership::{shared, Membership};
use crate::ops::AndOp;
use crate::outputs::Outputs;
use crate::rules::Rule;
use crate::variable::Variables;

pub struct SugenoFisBuilder {
    variables: Variables,
    rules: Vec<Rule>,
    rule_text: HashSet<String>,
    and_method: AndOp,
    compiler: Box<dyn ConsequentCompiler>,
}

impl Default for SugenoFisBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SugenoFisBuilder {
    pub fn new() -> Self {
        Self {
            variables: Variables::new(),
            rules: Vec::new(),
            rule_text: HashSet::new(),
            and_method: AndOp::Min,
            compiler: Box::new(ArithmeticCompiler),
        }
    }

    /// The AND-method of rules added from now on. Defaults to `Min`.
    pub fn and_method(mut self, and_method: AndOp) -> Self {
        self.and_method = and_method;
        self
    }

    /// Replaces the compiler used for the consequent of rules added from now on.
    pub fn compiler(mut self, compiler: impl ConsequentCompiler + 'static) -> Self {
        self.compiler = Box::new(compiler);
        self
    }

    /// Registers a linguistic variable, overwriting any previous function of
    /// the same (case-insensitive) name.
    pub fn set_linguistic_variable<M>(&mut self, name: &str, membership: M) -> &mut Self
    where
        M: Membership + Send + Sync + 'static,
    {
        self.variables.set(name, shared(membership));
        self
    }

    /// Compiles and appends a rule. A rejected rule leaves the builder as it was.
    pub fn add_rule(&mut self, rule_text: &str) -> Result<&mut Self> {
        let key = dsl::rule_key(rule_text);
        debug!(rule = %key, "add rule");

        if self.rule_text.contains(&key) {
            return Err(FuzzyError::DuplicateRule(key));
        }

        let rule = Rule::compile(
            dsl::normalize(rule_text),
            &self.variables,
            self.and_method,
            self.compiler.as_ref(),
        )?;

        self.rule_text.insert(key);
        self.rules.push(rule);

        Ok(self)
    }

    pub fn value_of(&self, name: &str, x: f64) -> Result<f64> {
        self.variables.value_of(name, x)
    }

    pub fn build(self) -> SugenoFis {
        SugenoFis {
            variables: self.variables,
            rules: self.rules,
        }
    }
}

/// A compiled rule base over registered linguistic variables.
#[derive(Debug)]
pub struct SugenoFis {
    variables: Variables,
    rules: Vec<Rule>,
}

impl SugenoFis {
    pub fn builder() -> SugenoFisBuilder {
        SugenoFisBuilder::new()
    }

    /// Registers every set, then compiles every rule, in the given order.
    pub fn from_parts<N, M, R>(
        sets: impl IntoIterator<Item = (N, M)>,
        rules: impl IntoIterator<Item = R>,
    ) -> Result<Self>
    where
        N: AsRef<str>,
        M: Membership + Send + Sync + 'static,
        R: AsRef<str>,
    {
        let mut builder = SugenoFisBuilder::new();

        for (name, membership) in sets {
            builder.set_linguistic_variable(name.as_ref(), membership);
        }
        for rule in rules {
            builder.add_rule(rule.as_ref())?;
        }

        Ok(builder.build())
    }

    /// Weighted average `Σ(w·z) / Σw` over every rule, or zero when no rule
    /// fires.
    pub fn evaluate(&self, args: &Inputs) -> Result<f64> {
        Ok(self.evaluate_detailed(args, None)?.value())
    }

    /// Like [`SugenoFis::evaluate`], with extra variables that only
    /// consequents may reference.
    pub fn evaluate_with_context(&self, args: &Inputs, context: &Inputs) -> Result<f64> {
        Ok(self.evaluate_detailed(args, Some(context))?.value())
    }

    pub fn evaluate_detailed(&self, args: &Inputs, context: Option<&Inputs>) -> Result<Outputs> {
        let firings = self
            .rules
            .iter()
            .map(|rule| rule.evaluate(&self.variables, args, context))
            .collect::<Result<Vec<_>>>()?;
        let outputs = Outputs::from_firings(firings);

        debug!(
            weight_sum = outputs.weight_sum(),
            value = outputs.value(),
            "sugeno evaluation"
        );

        Ok(outputs)
    }

    /// The degree of `x` in a registered linguistic variable.
    pub fn value_of(&self, name: &str, x: f64) -> Result<f64> {
        self.variables.value_of(name, x)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }
}

#[cfg(test)]
use crate::membership::{from_fn, triangular};

#[test]
fn test_duplicate_rule() {
    let mut builder = SugenoFis::builder();
    builder.set_linguistic_variable("warm", triangular(10., 20., 30.).unwrap());
    builder.add_rule("if t is warm then 2t").unwrap();

    assert_eq!(
        builder.add_rule("IF t IS warm THEN 2t").err(),
        Some(FuzzyError::DuplicateRule("if t is warm then 2t".to_owned()))
    );
    assert_eq!(builder.build().rules().len(), 1);
}

#[test]
fn test_duplicate_check_is_exact_apart_from_case() {
    let mut builder = SugenoFis::builder();
    builder.set_linguistic_variable("warm", triangular(10., 20., 30.).unwrap());
    builder.add_rule("if t is warm then 2t").unwrap();
    builder.add_rule("if t  is   warm then   2t").unwrap();

    let fis = builder.build();
    assert_eq!(fis.rules().len(), 2);
    assert_eq!(fis.rules()[1].text(), "if t is warm then 2t");
    assert_eq!(fis.evaluate(&Inputs::from([("t", 20.)])), Ok(40.));
}

#[test]
fn test_rejected_rule_leaves_builder_unchanged() {
    let mut builder = SugenoFis::builder();
    builder.set_linguistic_variable("warm", triangular(10., 20., 30.).unwrap());

    assert!(builder.add_rule("if t is hot then 1").is_err());

    // The failed text was not remembered
    builder.set_linguistic_variable("hot", triangular(25., 35., 45.).unwrap());
    builder.add_rule("if t is hot then 1").unwrap();

    let fis = builder.build();
    assert_eq!(fis.rules().len(), 1);
    assert_eq!(fis.value_of("hot", 35.), Ok(1.));
}

#[test]
fn test_overwritten_variable_is_seen_by_compiled_rules() {
    let mut builder = SugenoFis::builder();
    builder.set_linguistic_variable("on", from_fn(|_| 0.));
    builder.add_rule("if x is on then 10").unwrap();
    builder.set_linguistic_variable("on", from_fn(|_| 1.));

    let fis = builder.build();
    assert_eq!(fis.evaluate(&Inputs::from([("x", 0.)])), Ok(10.));
}

#[test]
fn test_and_method() {
    let mut builder = SugenoFis::builder().and_method(AndOp::Prod);
    builder.set_linguistic_variable("half", from_fn(|_| 0.5));
    builder.add_rule("if x is half and y is half then 8").unwrap();
    builder.add_rule("if x is half then 4").unwrap();

    let fis = builder.build();
    let outputs = fis.evaluate_detailed(&Inputs::from([("x", 1.), ("y", 1.)]), None).unwrap();

    assert_eq!(outputs.firings()[0].w, 0.25);
    assert_eq!(outputs.weight_sum(), 0.75);
    assert_eq!(outputs.value(), (0.25 * 8. + 0.5 * 4.) / 0.75);
}

#[test]
fn test_value_of() {
    let mut builder = SugenoFis::builder();
    builder.set_linguistic_variable("warm", triangular(10., 20., 30.).unwrap());

    assert_eq!(builder.value_of("warm", 15.), Ok(0.5));
    assert_eq!(
        builder.build().value_of("cold", 15.),
        Err(FuzzyError::UnknownLinguisticVariable("cold".to_owned()))
    );
}
