//! Set-theoretic queries over a membership function and a finite universe
//! of discourse.
//!
//! Every query is recomputed from `(MU, U)` on demand; nothing is cached.
//! The free functions take the membership function and the universe
//! directly, [`DiscreteFuzzySet`] bundles the two for convenience.

use std::collections::BTreeMap;
use std::slice;

use crate::alpha::{self, AlphaMap, Degree};
use crate::error::{check_zero_to_one, FuzzyError, Result};
use crate::membership::Membership;

/// `MU(x) > 0`.
pub fn is_member<M: Membership + ?Sized>(mu: &M, x: f64) -> bool {
    mu.degree(x) > 0.
}

/// Every element of U with a non-zero degree, in U order. Equivalent to the
/// strong alpha cut at zero.
pub fn support<M: Membership + ?Sized>(mu: &M, universe: &[f64]) -> Vec<f64> {
    universe.iter().copied().filter(|x| is_member(mu, *x)).collect()
}

/// The crisp set of elements with full membership, aka the kernel.
pub fn core<M: Membership + ?Sized>(mu: &M, universe: &[f64]) -> Vec<f64> {
    universe.iter().copied().filter(|x| mu.degree(*x) >= 1.).collect()
}

/// The largest degree attained over U. Never below zero.
pub fn height<M: Membership + ?Sized>(mu: &M, universe: &[f64]) -> f64 {
    universe.iter().map(|x| mu.degree(*x)).fold(0., f64::max)
}

/// Members whose degree is at least `alpha`.
pub fn alpha_cut<M: Membership + ?Sized>(mu: &M, universe: &[f64], alpha: f64) -> Result<Vec<f64>> {
    check_zero_to_one(alpha, "alpha")?;

    Ok(universe
        .iter()
        .copied()
        .filter(|x| {
            let degree = mu.degree(*x);
            degree >= alpha && degree > 0.
        })
        .collect())
}

/// Members whose degree is strictly above `alpha`. At `alpha == 1` this is
/// always empty since no degree exceeds one.
pub fn strong_alpha_cut<M: Membership + ?Sized>(mu: &M, universe: &[f64], alpha: f64) -> Result<Vec<f64>> {
    check_zero_to_one(alpha, "alpha")?;

    Ok(universe
        .iter()
        .copied()
        .filter(|x| {
            let degree = mu.degree(*x);
            degree > alpha && degree > 0.
        })
        .collect())
}

pub fn is_normalized<M: Membership + ?Sized>(mu: &M, universe: &[f64]) -> bool {
    height(mu, universe) == 1.
}

/// Checks `MU(λx1 + (1-λ)x2) >= min(MU(x1), MU(x2))` for a single pair.
///
/// Convexity proper quantifies over every pair and every λ; this only
/// tests the one combination it is given.
pub fn is_convex<M: Membership + ?Sized>(mu: &M, x1: f64, x2: f64, lambda: f64) -> Result<bool> {
    check_zero_to_one(lambda, "lambda")?;

    let crisp_convex = lambda * x1 + (1. - lambda) * x2;

    Ok(mu.degree(crisp_convex) >= f64::min(mu.degree(x1), mu.degree(x2)))
}

/// True iff both functions agree on every element of U.
pub fn is_equal<A, B>(mu_a: &A, mu_b: &B, universe: &[f64]) -> bool
where
    A: Membership + ?Sized,
    B: Membership + ?Sized,
{
    universe.iter().all(|x| mu_a.degree(*x) == mu_b.degree(*x))
}

// Elements where either side is exactly zero are skipped
fn all_shared_members<A, B>(mu_a: &A, mu_b: &B, universe: &[f64], holds: impl Fn(f64, f64) -> bool) -> bool
where
    A: Membership + ?Sized,
    B: Membership + ?Sized,
{
    universe.iter().all(|x| {
        let y_a = mu_a.degree(*x);
        if y_a == 0. {
            return true;
        }

        let y_b = mu_b.degree(*x);
        if y_b == 0. {
            return true;
        }

        holds(y_a, y_b)
    })
}

/// A is a fuzzy subset of B if `MUa(x) <= MUb(x)` wherever both are non-zero.
pub fn is_subset<A, B>(mu_a: &A, mu_b: &B, universe: &[f64]) -> bool
where
    A: Membership + ?Sized,
    B: Membership + ?Sized,
{
    all_shared_members(mu_a, mu_b, universe, |y_a, y_b| y_a <= y_b)
}

/// Like [`is_subset`] with a strict `<`. A set is never a proper subset of
/// itself unless no element is a member of it, in which case every element
/// is skipped and the check holds vacuously.
pub fn is_proper_subset<A, B>(mu_a: &A, mu_b: &B, universe: &[f64]) -> bool
where
    A: Membership + ?Sized,
    B: Membership + ?Sized,
{
    all_shared_members(mu_a, mu_b, universe, |y_a, y_b| y_a < y_b)
}

/// The sum of every degree over U.
pub fn scalar_cardinality<M: Membership + ?Sized>(mu: &M, universe: &[f64]) -> f64 {
    universe.iter().map(|x| mu.degree(*x)).sum()
}

/// Scalar cardinality over the size of U. An empty universe yields zero.
pub fn relative_cardinality<M: Membership + ?Sized>(mu: &M, universe: &[f64]) -> f64 {
    if universe.is_empty() {
        return 0.;
    }

    scalar_cardinality(mu, universe) / universe.len() as f64
}

/// The `(x, alpha)` pairs of every member, in U order.
pub fn discrete_fuzzy_set<M: Membership + ?Sized>(mu: &M, universe: &[f64]) -> Vec<(f64, f64)> {
    Iter {
        mu,
        universe: universe.iter(),
    }
    .collect()
}

/// A membership function paired with the universe it is evaluated over.
#[derive(Clone, Debug)]
pub struct DiscreteFuzzySet<'u, M> {
    mu: M,
    universe: &'u [f64],
}

impl<'u, M: Membership> DiscreteFuzzySet<'u, M> {
    pub fn new(mu: M, universe: &'u [f64]) -> Self {
        DiscreteFuzzySet { mu, universe }
    }

    pub fn builder() -> DiscreteFuzzySetBuilder<'u, M> {
        DiscreteFuzzySetBuilder {
            mu: None,
            universe: None,
        }
    }

    pub fn universe(&self) -> &'u [f64] {
        self.universe
    }

    pub fn membership(&self) -> &M {
        &self.mu
    }

    /// `MU(x)`, which need not be an element of the universe.
    pub fn degree(&self, x: f64) -> f64 {
        self.mu.degree(x)
    }

    pub fn is_member(&self, x: f64) -> bool {
        is_member(&self.mu, x)
    }

    pub fn members(&self) -> Vec<f64> {
        support(&self.mu, self.universe)
    }

    pub fn support(&self) -> Vec<f64> {
        support(&self.mu, self.universe)
    }

    pub fn core(&self) -> Vec<f64> {
        core(&self.mu, self.universe)
    }

    pub fn height(&self) -> f64 {
        height(&self.mu, self.universe)
    }

    pub fn alpha_cut(&self, alpha: f64) -> Result<Vec<f64>> {
        alpha_cut(&self.mu, self.universe, alpha)
    }

    pub fn strong_alpha_cut(&self, alpha: f64) -> Result<Vec<f64>> {
        strong_alpha_cut(&self.mu, self.universe, alpha)
    }

    pub fn is_normalized(&self) -> bool {
        is_normalized(&self.mu, self.universe)
    }

    /// Single-pair convexity check between the first and last member at
    /// λ = 0.5. A set without members is convex.
    pub fn is_convex(&self) -> bool {
        let members = self.members();

        match (members.first(), members.last()) {
            (Some(first), Some(last)) => is_convex(&self.mu, *first, *last, 0.5).unwrap_or(false),
            _ => true,
        }
    }

    pub fn alpha_map(&self) -> AlphaMap {
        alpha::alpha_map(&self.mu, self.universe)
    }

    pub fn scalar_cardinality(&self) -> f64 {
        scalar_cardinality(&self.mu, self.universe)
    }

    pub fn relative_cardinality(&self) -> f64 {
        relative_cardinality(&self.mu, self.universe)
    }

    pub fn fuzzy_cardinality(&self) -> BTreeMap<Degree, usize> {
        alpha::fuzzy_cardinality(&self.mu, self.universe)
    }

    /// Lazily yields `(x, alpha)` for every member, in U order.
    pub fn iter(&self) -> Iter<'_, M> {
        Iter {
            mu: &self.mu,
            universe: self.universe.iter(),
        }
    }
}

impl<'s, 'u, M: Membership> IntoIterator for &'s DiscreteFuzzySet<'u, M> {
    type Item = (f64, f64);
    type IntoIter = Iter<'s, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Iter<'s, M: ?Sized> {
    mu: &'s M,
    universe: slice::Iter<'s, f64>,
}

impl<'s, M: Membership + ?Sized> Iterator for Iter<'s, M> {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        self.universe.by_ref().find_map(|x| {
            let alpha = self.mu.degree(*x);
            if alpha > 0. {
                Some((*x, alpha))
            } else {
                None
            }
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.universe.size_hint().1)
    }
}

pub struct DiscreteFuzzySetBuilder<'u, M> {
    mu: Option<M>,
    universe: Option<&'u [f64]>,
}

impl<'u, M: Membership> DiscreteFuzzySetBuilder<'u, M> {
    pub fn membership(mut self, mu: M) -> Self {
        self.mu = Some(mu);
        self
    }

    pub fn universe(mut self, universe: &'u [f64]) -> Self {
        self.universe = Some(universe);
        self
    }

    pub fn build(self) -> Result<DiscreteFuzzySet<'u, M>> {
        let mu = self.mu.ok_or(FuzzyError::MissingArgument {
            argument: "membership function",
        })?;
        let universe = self.universe.ok_or(FuzzyError::MissingArgument {
            argument: "universe of discourse",
        })?;

        Ok(DiscreteFuzzySet::new(mu, universe))
    }
}

#[cfg(test)]
use crate::membership::{from_fn, FromFn};

#[cfg(test)]
fn mu(x: f64) -> f64 {
    if x == 2. {
        1.
    } else if (x > 0. && x < 2.) || (x > 2. && x < 4.) {
        0.5
    } else {
        0.
    }
}

#[cfg(test)]
fn non_convex_mu(x: f64) -> f64 {
    if x == 2. {
        1.
    } else if x > 6. && x <= 9. {
        0.5
    } else {
        0.
    }
}

#[cfg(test)]
const NORMAL: [f64; 8] = [-1., 0., 1., 2., 3., 4., 5., 6.];
#[cfg(test)]
const SUB_NORMAL: [f64; 2] = [5., 6.];

#[cfg(test)]
fn sample(universe: &[f64]) -> DiscreteFuzzySet<'_, FromFn<fn(f64) -> f64>> {
    DiscreteFuzzySet::new(from_fn(mu as fn(f64) -> f64), universe)
}

#[test]
fn test_core() {
    assert_eq!(sample(&NORMAL).core(), vec![2.]);
    assert!(sample(&SUB_NORMAL).core().is_empty());
}

#[test]
fn test_support() {
    assert_eq!(sample(&NORMAL).support(), vec![1., 2., 3.]);
    assert_eq!(sample(&NORMAL).members(), vec![1., 2., 3.]);
    assert!(sample(&SUB_NORMAL).support().is_empty());
}

#[test]
fn test_height() {
    assert_eq!(sample(&NORMAL).height(), 1.);
    assert_eq!(sample(&SUB_NORMAL).height(), 0.);
    assert_eq!(height(&from_fn(|_| -0.5), &NORMAL), 0.);
}

#[test]
fn test_alpha_cut() {
    let set = sample(&NORMAL);

    assert_eq!(set.alpha_cut(0.5).unwrap(), vec![1., 2., 3.]);
    assert_eq!(set.alpha_cut(0.7).unwrap(), vec![2.]);
    assert_eq!(set.alpha_cut(1.).unwrap(), set.core());
    assert!(sample(&SUB_NORMAL).alpha_cut(0.2).unwrap().is_empty());
    assert_eq!(
        set.alpha_cut(1.2),
        Err(FuzzyError::InvalidRange {
            name: "alpha",
            value: 1.2
        })
    );
}

#[test]
fn test_strong_alpha_cut() {
    let set = sample(&NORMAL);

    assert_eq!(set.strong_alpha_cut(0.).unwrap(), vec![1., 2., 3.]);
    assert_eq!(set.strong_alpha_cut(0.5).unwrap(), vec![2.]);
    assert!(set.strong_alpha_cut(1.).unwrap().is_empty());
    assert!(sample(&SUB_NORMAL).strong_alpha_cut(0.).unwrap().is_empty());
    assert!(set.strong_alpha_cut(-0.5).is_err());
}

#[test]
fn test_is_normalized() {
    assert!(sample(&NORMAL).is_normalized());
    assert!(!sample(&SUB_NORMAL).is_normalized());
}

#[test]
fn test_is_convex() {
    assert!(!is_convex(&from_fn(non_convex_mu), 9., 2., 0.5).unwrap());
    assert!(is_convex(&from_fn(mu), 0., 2., 0.5).unwrap());
    assert!(matches!(
        is_convex(&from_fn(mu), 0., 2., 2.),
        Err(FuzzyError::InvalidRange { name: "lambda", .. })
    ));

    assert!(sample(&NORMAL).is_convex());
    assert!(sample(&SUB_NORMAL).is_convex());

    let gapped = [2., 4., 7.];
    assert!(!DiscreteFuzzySet::new(from_fn(non_convex_mu), &gapped[..]).is_convex());
    assert!(DiscreteFuzzySet::new(from_fn(|_| 0.), &gapped[..]).is_convex());
}

#[test]
fn test_is_equal() {
    let extended = [-1., 0., 1., 2., 3., 4., 5., 6., 10., 8., 11.];

    assert!(is_equal(&from_fn(mu), &from_fn(mu), &NORMAL));
    assert!(is_equal(&from_fn(mu), &from_fn(mu), &extended));
    assert!(!is_equal(&from_fn(non_convex_mu), &from_fn(mu), &NORMAL));
}

#[test]
fn test_is_subset() {
    let sub = from_fn(|x| f64::max(0., mu(x) - 0.2));
    let not_sub = from_fn(|x| f64::min(1., mu(x) + 0.7));

    assert!(is_subset(&sub, &from_fn(mu), &NORMAL));
    assert!(!is_subset(&not_sub, &from_fn(mu), &NORMAL));
    assert!(is_subset(&from_fn(mu), &from_fn(mu), &NORMAL));
}

#[test]
fn test_is_proper_subset() {
    let sub = from_fn(|x| f64::max(0., mu(x) - 0.3));
    let not_sub = from_fn(|x| f64::min(1., mu(x) + 0.7));

    assert!(is_proper_subset(&sub, &from_fn(mu), &NORMAL));
    assert!(!is_proper_subset(&not_sub, &from_fn(mu), &NORMAL));
    assert!(!is_proper_subset(&from_fn(mu), &from_fn(mu), &NORMAL));

    // No shared members, so every element is skipped
    let empty = from_fn(|_| 0.);
    assert!(is_proper_subset(&empty, &empty, &NORMAL));
}

#[test]
fn test_cardinalities() {
    let set = sample(&NORMAL);

    assert_eq!(set.scalar_cardinality(), 2.);
    assert_eq!(set.relative_cardinality(), 2. / NORMAL.len() as f64);
    assert_eq!(relative_cardinality(&from_fn(mu), &[]), 0.);

    let fuzzy = set.fuzzy_cardinality();
    assert_eq!(fuzzy[&Degree::new(0.5)], 2);
    assert_eq!(fuzzy[&Degree::new(1.)], 1);
}

#[test]
fn test_iteration_restarts() {
    let set = sample(&NORMAL);
    let expected = vec![(1., 0.5), (2., 1.), (3., 0.5)];

    assert_eq!(set.iter().collect::<Vec<_>>(), expected);
    assert_eq!((&set).into_iter().collect::<Vec<_>>(), expected);
    assert_eq!(discrete_fuzzy_set(&from_fn(mu), &NORMAL), expected);

    let mut count = 0;
    for (x, alpha) in &set {
        assert!(set.is_member(x));
        assert_eq!(set.degree(x), alpha);
        count += 1;
    }
    assert_eq!(count, 3);
}

#[test]
fn test_builder_requires_both_arguments() {
    let missing_universe = DiscreteFuzzySet::<FromFn<fn(f64) -> f64>>::builder()
        .membership(from_fn(mu as fn(f64) -> f64))
        .build();
    assert_eq!(
        missing_universe.unwrap_err(),
        FuzzyError::MissingArgument {
            argument: "universe of discourse"
        }
    );

    let missing_mu = DiscreteFuzzySet::<FromFn<fn(f64) -> f64>>::builder()
        .universe(&NORMAL)
        .build();
    assert!(matches!(missing_mu, Err(FuzzyError::MissingArgument { .. })));

    let set = DiscreteFuzzySet::builder()
        .membership(from_fn(mu as fn(f64) -> f64))
        .universe(&NORMAL)
        .build()
        .unwrap();
    assert_eq!(set.universe(), &NORMAL[..]);
}
