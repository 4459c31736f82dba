use thiserror::Error;

pub type Result<T, E = FuzzyError> = std::result::Result<T, E>;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum FuzzyError {
    /// A required constructor argument was never supplied.
    #[error("invalid {argument} argument: none was provided")]
    MissingArgument { argument: &'static str },

    /// An alpha or lambda threshold outside of [0, 1].
    #[error("{name} must be between 0 and 1, got {value}")]
    InvalidRange { name: &'static str, value: f64 },

    /// A membership function parameter that would produce undefined math.
    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("unknown linguistic variable `{0}`")]
    UnknownLinguisticVariable(String),

    #[error("rule already added: `{0}`")]
    DuplicateRule(String),

    #[error("context cannot bind `{name}`, it is a parameter of the antecedent")]
    AmbiguousBinding { name: String },

    #[error("firing strength of rule `{rule}` is not a number")]
    NaNFiringStrength { rule: String },

    #[error("consequent of rule `{rule}` evaluated to not a number")]
    NaNConsequent { rule: String },

    #[error("malformed rule `{rule}`: {reason}")]
    RuleSyntax { rule: String, reason: String },

    #[error("malformed expression `{expression}` at offset {offset}: {reason}")]
    ExpressionSyntax {
        expression: String,
        offset: usize,
        reason: String,
    },
}

impl FuzzyError {
    pub(crate) fn rule_syntax(rule: &str, reason: impl Into<String>) -> Self {
        Self::RuleSyntax {
            rule: rule.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Rejects thresholds outside of [0, 1]. NaN is rejected as well.
pub(crate) fn check_zero_to_one(value: f64, name: &'static str) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(FuzzyError::InvalidRange { name, value })
    }
}

#[test]
fn test_check_zero_to_one() {
    assert!(check_zero_to_one(0., "alpha").is_ok());
    assert!(check_zero_to_one(1., "alpha").is_ok());
    assert_eq!(
        check_zero_to_one(1.5, "lambda"),
        Err(FuzzyError::InvalidRange {
            name: "lambda",
            value: 1.5
        })
    );
    assert!(check_zero_to_one(-0.1, "alpha").is_err());
    assert!(check_zero_to_one(f64::NAN, "alpha").is_err());
    assert_eq!(
        check_zero_to_one(2., "alpha").unwrap_err().to_string(),
        "alpha must be between 0 and 1, got 2"
    );
}
