use crate::error::{FuzzyError, Result};

/// One `<parameter> is <variable>` proposition of a rule antecedent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proposition {
    pub parameter: String,
    pub variable: String,
}

/// Rule text split along the grammar
/// `if <p> is <v> (and <p> is <v>)* then <expression>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RuleText<'r> {
    pub(crate) antecedent: Vec<Proposition>,
    pub(crate) consequent: &'r str,
}

/// Lower-cases and collapses whitespace ahead of [`parse`].
pub(crate) fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();

    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Text under which a rule is remembered: lower-cased but otherwise exact,
/// so only case differences make two rules the same.
pub(crate) fn rule_key(text: &str) -> String {
    text.to_lowercase()
}

/// Splits normalized rule text. Variable names are not resolved here.
pub(crate) fn parse(rule: &str) -> Result<RuleText<'_>> {
    let body = rule
        .strip_prefix("if ")
        .ok_or_else(|| FuzzyError::rule_syntax(rule, "rule must start with `if`"))?;
    let (antecedent, consequent) = body
        .split_once(" then ")
        .ok_or_else(|| FuzzyError::rule_syntax(rule, "missing `then`"))?;
    let consequent = consequent.trim();

    if consequent.is_empty() {
        return Err(FuzzyError::rule_syntax(rule, "missing consequent after `then`"));
    }

    let mut propositions: Vec<Proposition> = Vec::new();

    for clause in antecedent.split(" and ") {
        let (parameter, variable) = clause
            .split_once(" is ")
            .map(|(p, v)| (p.trim(), v.trim()))
            .ok_or_else(|| {
                FuzzyError::rule_syntax(rule, format!("`{clause}` must read `<parameter> is <variable>`"))
            })?;

        if !is_identifier(parameter) {
            return Err(FuzzyError::rule_syntax(rule, format!("invalid parameter `{parameter}`")));
        }
        if !is_identifier(variable) {
            return Err(FuzzyError::rule_syntax(rule, format!("invalid linguistic variable `{variable}`")));
        }
        if propositions.iter().any(|p| p.parameter == parameter) {
            return Err(FuzzyError::rule_syntax(
                rule,
                format!("parameter `{parameter}` appears more than once"),
            ));
        }

        propositions.push(Proposition {
            parameter: parameter.to_owned(),
            variable: variable.to_owned(),
        });
    }

    Ok(RuleText {
        antecedent: propositions,
        consequent,
    })
}

#[cfg(test)]
fn prop(parameter: &str, variable: &str) -> Proposition {
    Proposition {
        parameter: parameter.to_owned(),
        variable: variable.to_owned(),
    }
}

#[test]
fn test_normalize() {
    assert_eq!(
        normalize("  If X is   Large\tand y IS small then 3x + 2y "),
        "if x is large and y is small then 3x + 2y"
    );
}

#[test]
fn test_rule_key_only_folds_case() {
    assert_eq!(rule_key("IF t IS warm THEN 2t"), rule_key("if t is warm then 2t"));
    assert_ne!(rule_key("if t  is   warm then   2t"), rule_key("if t is warm then 2t"));
}

#[test]
fn test_parse() {
    let text = normalize("if x is large and y is small then 3x + 2y");
    let parsed = parse(&text).unwrap();

    assert_eq!(parsed.antecedent, vec![prop("x", "large"), prop("y", "small")]);
    assert_eq!(parsed.consequent, "3x + 2y");

    let single = parse("if speed is fast then 2speed").unwrap();
    assert_eq!(single.antecedent, vec![prop("speed", "fast")]);
}

#[test]
fn test_parse_errors() {
    for bad in [
        "x is large then 1",
        "if x is large",
        "if x is large then ",
        "if x large then 1",
        "if x is large and then 1",
        "if x is very large then 1",
        "if x is large and x is small then 1",
    ] {
        assert!(
            matches!(parse(bad), Err(FuzzyError::RuleSyntax { .. })),
            "`{bad}` should not parse"
        );
    }
}
