use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use crate::membership::Membership;

/// A membership degree usable as a map key. Ordered with `f64::total_cmp`.
#[derive(Clone, Copy, Debug)]
pub struct Degree(f64);

impl Degree {
    pub fn new(alpha: f64) -> Self {
        // Collapse -0.0 so equal degrees share a level
        Degree(alpha + 0.)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Degree {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Degree {}

impl PartialOrd for Degree {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Degree {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<f64> for Degree {
    fn from(alpha: f64) -> Self {
        Degree::new(alpha)
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Elements of a universe grouped by the degree they attain.
pub type AlphaMap = BTreeMap<Degree, Vec<f64>>;

/// Groups the universe by attained alpha. Non-members (alpha <= 0 or NaN)
/// are left out, and each level lists an element once, in universe order.
pub fn alpha_map<M: Membership + ?Sized>(mu: &M, universe: &[f64]) -> AlphaMap {
    let mut levels = AlphaMap::new();

    for &x in universe {
        let alpha = mu.degree(x);

        if alpha.is_nan() || alpha <= 0. {
            continue;
        }

        let level = levels.entry(Degree::new(alpha)).or_insert_with(Vec::new);
        if !level.contains(&x) {
            level.push(x);
        }
    }

    levels
}

/// The size of every alpha level.
pub fn fuzzy_cardinality<M: Membership + ?Sized>(mu: &M, universe: &[f64]) -> BTreeMap<Degree, usize> {
    alpha_map(mu, universe)
        .into_iter()
        .map(|(alpha, level)| (alpha, level.len()))
        .collect()
}

#[cfg(test)]
use crate::membership::from_fn;

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
const UNIVERSE: [f64; 8] = [-1., 0., 1., 2., 3., 4., 5., 6.];

#[test]
fn test_alpha_map() {
    let levels = alpha_map(&from_fn(mu), &UNIVERSE);

    assert_eq!(levels.len(), 2);
    assert_eq!(levels[&Degree::new(0.5)], vec![1., 3.]);
    assert_eq!(levels[&Degree::new(1.)], vec![2.]);
}

#[test]
fn test_alpha_map_deduplicates_elements() {
    let levels = alpha_map(&from_fn(mu), &[1., 1., 3., 1.]);

    assert_eq!(levels[&Degree::new(0.5)], vec![1., 3.]);
}

#[test]
fn test_fuzzy_cardinality() {
    let cardinality = fuzzy_cardinality(&from_fn(mu), &UNIVERSE);

    assert_eq!(cardinality.len(), 2);
    assert_eq!(cardinality[&Degree::new(0.5)], 2);
    assert_eq!(cardinality[&Degree::new(1.)], 1);
}

#[test]
fn test_degree_ordering() {
    assert!(Degree::new(0.2) < Degree::new(0.5));
    assert_eq!(Degree::new(-0.), Degree::new(0.));
    assert_eq!(Degree::from(0.75).value(), 0.75);
}
