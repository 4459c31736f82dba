use num::Float;
use serde::{Deserialize, Serialize};

/// And operator method for combining the alphas of the propositions
/// in a fuzzy rule antecedent, and for intersecting membership functions.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AndOp {
    #[default]
    Min,
    Prod,
    BoundedProd,
    DrasticProd,
}

impl AndOp {
    /// Combines two degrees. NaN in either operand yields NaN.
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        if u.is_nan() || v.is_nan() {
            return F::nan();
        }

        match self {
            Self::Min => F::min(u, v),
            Self::Prod => u * v,
            Self::BoundedProd => F::max(F::zero(), u + v - F::one()),
            Self::DrasticProd => {
                if u == F::one() {
                    v
                } else if v == F::one() {
                    u
                } else {
                    F::zero()
                }
            },
        }
    }

    /// Folds any number of degrees. An empty input yields one, the
    /// identity of every t-norm.
    pub fn combine<F: Float>(self, alphas: impl IntoIterator<Item = F>) -> F {
        alphas.into_iter().fold(F::one(), |acc, alpha| self.call(acc, alpha))
    }
}

/// Or operator method for combining degrees, used by the union of
/// membership functions.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrOp {
    #[default]
    Max,
    ProbOr,
    BoundedSum,
    DrasticSum,
}

impl OrOp {
    /// Combines two degrees. NaN in either operand yields NaN.
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        if u.is_nan() || v.is_nan() {
            return F::nan();
        }

        match self {
            Self::Max => F::max(u, v),
            Self::ProbOr => u + v - u * v,
            Self::BoundedSum => F::min(F::one(), u + v),
            Self::DrasticSum => {
                if v == F::zero() {
                    u
                } else if u == F::zero() {
                    v
                } else {
                    F::one()
                }
            },
        }
    }

    /// Folds any number of degrees. An empty input yields zero, the
    /// identity of every s-norm.
    pub fn combine<F: Float>(self, alphas: impl IntoIterator<Item = F>) -> F {
        alphas.into_iter().fold(F::zero(), |acc, alpha| self.call(acc, alpha))
    }
}

#[test]
fn test_and_ops() {
    assert_eq!(AndOp::Min.call(0.3, 0.8), 0.3);
    assert!((AndOp::Prod.call(0.5, 0.4) - 0.2f64).abs() < 1e-12);
    assert_eq!(AndOp::BoundedProd.call(0.3, 0.5), 0.);
    assert!((AndOp::BoundedProd.call(0.7, 0.5) - 0.2f64).abs() < 1e-12);
    assert_eq!(AndOp::DrasticProd.call(1., 0.4), 0.4);
    assert_eq!(AndOp::DrasticProd.call(0.4, 1.), 0.4);
    assert_eq!(AndOp::DrasticProd.call(0.9, 0.9), 0.);

    assert_eq!(AndOp::Min.combine([0.5, 1., 0.25]), 0.25);
    assert_eq!(AndOp::Min.combine(Vec::<f64>::new()), 1.);
    assert!(AndOp::Min.combine([0.5, f64::NAN, 0.25]).is_nan());
}

#[test]
fn test_or_ops() {
    assert_eq!(OrOp::Max.call(0.3, 0.8), 0.8);
    assert!((OrOp::ProbOr.call(0.5, 0.5) - 0.75f64).abs() < 1e-12);
    assert_eq!(OrOp::BoundedSum.call(0.7, 0.5), 1.);
    assert_eq!(OrOp::DrasticSum.call(0., 0.4), 0.4);
    assert_eq!(OrOp::DrasticSum.call(0.3, 0.4), 1.);

    assert_eq!(OrOp::Max.combine([0.5, 0.2]), 0.5);
    assert!(OrOp::Max.call(f64::NAN, 0.2).is_nan());
}
