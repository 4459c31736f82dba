//! Discrete fuzzy set algebra and a Sugeno fuzzy inference system.
//!
//! Membership functions map a crisp value to a degree in [0, 1]. The
//! [`set`] module answers set-theoretic questions about a membership
//! function over a finite universe of discourse, while [`SugenoFis`]
//! composes named membership functions into rules like
//! `"if x is large and y is small then 3x + 2y"` and defuzzifies them with a
//! weighted average.
//!
//! ```
//! use fuzzy_math::membership::{from_fn, shared};
//! use fuzzy_math::{Inputs, SugenoFis};
//!
//! let large = shared(from_fn(|x| if x >= 100. { 1. } else if x >= 35. { 0.5 } else { 0. }));
//! let small = shared(from_fn(|x| if x <= 25. { 1. } else if x < 40. { 0.5 } else { 0. }));
//!
//! let fis = SugenoFis::from_parts(
//!     [("large", large), ("small", small)],
//!     [
//!         "if x is large and y is small then 3x + 2y",
//!         "if x is small and y is large then 2x + 3y",
//!     ],
//! )?;
//!
//! assert_eq!(fis.evaluate(&Inputs::from([("x", 100.), ("y", 25.)]))?, 350.);
//! # Ok::<(), fuzzy_math::FuzzyError>(())
//! ```

pub mod alpha;
pub mod config;
mod dsl;
pub mod error;
pub mod expr;
mod inference;
mod inputs;
mod linspace;
mod math;
pub mod membership;
pub mod ops;
mod outputs;
mod rules;
pub mod set;
mod variable;

pub use alpha::{AlphaMap, Degree};
pub use config::{FisConfig, MembershipSpec};
pub use dsl::Proposition;
pub use error::{FuzzyError, Result};
pub use expr::{ArithmeticCompiler, Bindings, Consequent, ConsequentCompiler, Expression};
pub use inference::{SugenoFis, SugenoFisBuilder};
pub use inputs::Inputs;
pub use linspace::{linspace, Linspace};
pub use membership::{Membership, SharedMembership};
pub use ops::{AndOp, OrOp};
pub use outputs::Outputs;
pub use rules::{Firing, Rule};
pub use set::DiscreteFuzzySet;
pub use variable::{LinguisticVariable, VariableKey, Variables};
