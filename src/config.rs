//! Declarative FIS definitions.
//!
//! ```json
//! {
//!   "and_method": "min",
//!   "sets": {
//!     "cold": { "type": "trapezoidal", "a": -10, "b": -10, "c": 5, "d": 15 },
//!     "warm": { "type": "triangular", "a": 10, "b": 20, "c": 30 }
//!   },
//!   "rules": ["if t is cold then 100", "if t is warm then 20 - t / 2"]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::inference::SugenoFis;
use crate::membership::{self, shared, SharedMembership};
use crate::ops::AndOp;

fn default_exponent() -> f64 {
    2.
}

/// A parametric membership function.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MembershipSpec {
    Discrete {
        points: Vec<(f64, f64)>,
    },
    Piecewise {
        points: Vec<(f64, f64)>,
    },
    Triangular {
        a: f64,
        b: f64,
        c: f64,
    },
    Trapezoidal {
        a: f64,
        b: f64,
        c: f64,
        d: f64,
    },
    Bell {
        a: f64,
        b: f64,
        c: f64,
    },
    Gaussian {
        mean: f64,
        sigma: f64,
        #[serde(default = "default_exponent")]
        m: f64,
    },
    Sigmoid {
        rate: f64,
        center: f64,
    },
}

impl MembershipSpec {
    /// Validates the parameters the same way the matching constructor does.
    pub fn build(&self) -> Result<SharedMembership> {
        Ok(match self {
            Self::Discrete { points } => shared(membership::from_discrete_set(points.iter().copied())),
            Self::Piecewise { points } => shared(membership::piecewise(points.iter().copied())?),
            Self::Triangular { a, b, c } => shared(membership::triangular(*a, *b, *c)?),
            Self::Trapezoidal { a, b, c, d } => shared(membership::trapezoidal(*a, *b, *c, *d)?),
            Self::Bell { a, b, c } => shared(membership::bell(*a, *b, *c)?),
            Self::Gaussian { mean, sigma, m } => shared(membership::gaussian_with_exponent(*mean, *sigma, *m)?),
            Self::Sigmoid { rate, center } => shared(membership::sigmoid(*rate, *center)?),
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct FisConfig {
    #[serde(default)]
    pub and_method: AndOp,
    pub sets: BTreeMap<String, MembershipSpec>,
    #[serde(default)]
    pub rules: Vec<String>,
}

impl FisConfig {
    pub fn build(&self) -> Result<SugenoFis> {
        let mut builder = SugenoFis::builder().and_method(self.and_method);

        for (name, spec) in &self.sets {
            builder.set_linguistic_variable(name, spec.build()?);
        }
        for rule in &self.rules {
            builder.add_rule(rule)?;
        }

        Ok(builder.build())
    }
}

#[cfg(test)]
use crate::error::FuzzyError;
#[cfg(test)]
use crate::inputs::Inputs;
#[cfg(test)]
use crate::membership::Membership;

#[cfg(test)]
const THERMOSTAT: &str = r#"{
    "and_method": "min",
    "sets": {
        "cold": { "type": "trapezoidal", "a": -10, "b": -10, "c": 5, "d": 15 },
        "warm": { "type": "triangular", "a": 10, "b": 20, "c": 30 }
    },
    "rules": ["if t is cold then 100", "if t is warm then 20 - t / 2"]
}"#;

#[test]
fn test_deserialize_and_build() {
    let config: FisConfig = serde_json::from_str(THERMOSTAT).unwrap();

    assert_eq!(config.and_method, AndOp::Min);
    assert_eq!(
        config.sets["warm"],
        MembershipSpec::Triangular {
            a: 10.,
            b: 20.,
            c: 30.
        }
    );

    let fis = config.build().unwrap();
    assert_eq!(fis.rules().len(), 2);

    // only cold fires at 0
    assert_eq!(fis.evaluate(&Inputs::from([("t", 0.)])), Ok(100.));
    // cold 0.5 (z = 100), warm 0 at 10
    assert_eq!(fis.evaluate(&Inputs::from([("t", 10.)])), Ok(100.));
    // only warm fires at 20
    assert_eq!(fis.evaluate(&Inputs::from([("t", 20.)])), Ok(10.));
}

#[test]
fn test_gaussian_exponent_defaults_to_two() {
    let spec: MembershipSpec = serde_json::from_str(r#"{ "type": "gaussian", "mean": 0, "sigma": 1 }"#).unwrap();

    assert_eq!(
        spec,
        MembershipSpec::Gaussian {
            mean: 0.,
            sigma: 1.,
            m: 2.
        }
    );
    assert_eq!(spec.build().unwrap().degree(0.), 1.);
}

#[test]
fn test_invalid_parameters_are_rejected() {
    let spec = MembershipSpec::Gaussian {
        mean: 0.,
        sigma: 0.,
        m: 2.,
    };

    assert!(matches!(spec.build(), Err(FuzzyError::InvalidParameter { name: "sigma", .. })));

    let config = FisConfig {
        and_method: AndOp::Min,
        sets: BTreeMap::new(),
        rules: vec!["if t is warm then 1".to_owned()],
    };
    assert!(matches!(config.build(), Err(FuzzyError::UnknownLinguisticVariable(_))));
}

#[test]
fn test_discrete_points() {
    let spec: MembershipSpec =
        serde_json::from_str(r#"{ "type": "discrete", "points": [[1, 0.5], [2, 1]] }"#).unwrap();
    let mu = spec.build().unwrap();

    assert_eq!(mu.degree(1.), 0.5);
    assert_eq!(mu.degree(1.5), 0.);
}
