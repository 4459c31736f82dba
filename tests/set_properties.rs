//! Property-based tests for the discrete fuzzy set queries.
//!
//! Universes are small sets of distinct samples; membership functions are
//! drawn as parametric shapes and built inside each property.

use proptest::prelude::*;

use fuzzy_math::membership::{complement, from_fn, gaussian, intersection, union};
use fuzzy_math::set::{self, alpha_cut, height, is_normalized, is_proper_subset, is_subset, strong_alpha_cut, support};
use fuzzy_math::{linspace, DiscreteFuzzySet, Membership, MembershipSpec};

fn universe() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::btree_set(-200i32..200, 1..40)
        .prop_map(|samples| samples.into_iter().map(|s| f64::from(s) / 4.).collect())
}

fn shape() -> impl Strategy<Value = MembershipSpec> {
    prop_oneof![
        (-50f64..50., 0f64..20., 0f64..20.).prop_map(|(a, ab, bc)| MembershipSpec::Triangular {
            a,
            b: a + ab,
            c: a + ab + bc,
        }),
        (-50f64..50., 0f64..20., 0f64..20., 0f64..20.).prop_map(|(a, ab, bc, cd)| {
            MembershipSpec::Trapezoidal {
                a,
                b: a + ab,
                c: a + ab + bc,
                d: a + ab + bc + cd,
            }
        }),
        (-50f64..50., 0.1f64..30.).prop_map(|(mean, sigma)| MembershipSpec::Gaussian { mean, sigma, m: 2. }),
    ]
}

fn is_sub_slice(sub: &[f64], of: &[f64]) -> bool {
    sub.iter().all(|x| of.contains(x))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn core_is_within_support(u in universe(), spec in shape()) {
        let mu = spec.build().unwrap();
        let kernel = set::core(&mu, &u);

        prop_assert!(is_sub_slice(&kernel, &support(&mu, &u)));
        prop_assert_eq!(alpha_cut(&mu, &u, 1.).unwrap(), kernel);
    }

    #[test]
    fn strong_cut_is_within_cut(u in universe(), spec in shape(), alpha in 0f64..=1.) {
        let mu = spec.build().unwrap();
        let strong = strong_alpha_cut(&mu, &u, alpha).unwrap();

        prop_assert!(is_sub_slice(&strong, &alpha_cut(&mu, &u, alpha).unwrap()));
        prop_assert!(strong_alpha_cut(&mu, &u, 1.).unwrap().is_empty());
    }

    #[test]
    fn thresholds_outside_unit_interval_are_rejected(u in universe(), spec in shape(), alpha in 1.0001f64..10.) {
        let mu = spec.build().unwrap();

        prop_assert!(alpha_cut(&mu, &u, alpha).is_err());
        prop_assert!(strong_alpha_cut(&mu, &u, -alpha).is_err());
    }

    #[test]
    fn normalized_iff_height_is_one(u in universe(), spec in shape()) {
        let mu = spec.build().unwrap();

        prop_assert_eq!(height(&mu, &u) == 1., is_normalized(&mu, &u));
        prop_assert!(height(&mu, &u) >= 0.);
    }

    #[test]
    fn subset_is_reflexive(u in universe(), spec in shape()) {
        let mu = spec.build().unwrap();

        prop_assert!(is_subset(&mu, &mu, &u));
    }

    #[test]
    fn set_with_members_is_not_a_proper_subset_of_itself(u in universe(), spec in shape()) {
        let mu = spec.build().unwrap();
        prop_assume!(!support(&mu, &u).is_empty());

        prop_assert!(!is_proper_subset(&mu, &mu, &u));
    }

    #[test]
    fn intersection_within_union(u in universe(), spec_a in shape(), spec_b in shape()) {
        let (a, b) = (spec_a.build().unwrap(), spec_b.build().unwrap());
        let both = intersection(&a, &b);
        let either = union(&a, &b);

        prop_assert!(is_subset(&both, &a, &u));
        prop_assert!(is_subset(&a, &either, &u));
        for x in &u {
            prop_assert!(both.degree(*x) <= either.degree(*x));
        }
    }

    #[test]
    fn complement_is_involutive(u in universe(), spec in shape()) {
        let mu = spec.build().unwrap();
        let twice = complement(complement(&mu));

        for x in &u {
            prop_assert!((twice.degree(*x) - mu.degree(*x)).abs() < 1e-12);
        }
    }

    #[test]
    fn cardinalities_agree(u in universe(), spec in shape()) {
        let mu = spec.build().unwrap();
        let fuzzy = DiscreteFuzzySet::new(&mu, &u);
        let from_levels: f64 = fuzzy
            .fuzzy_cardinality()
            .iter()
            .map(|(alpha, count)| alpha.value() * *count as f64)
            .sum();

        prop_assert!((fuzzy.scalar_cardinality() - from_levels).abs() < 1e-9);
        prop_assert_eq!(
            fuzzy.alpha_map().values().map(Vec::len).sum::<usize>(),
            fuzzy.members().len()
        );
        prop_assert_eq!(fuzzy.iter().count(), fuzzy.support().len());
    }
}

#[test]
fn test_proper_subset_holds_vacuously_without_members() {
    let nowhere = from_fn(|_| 0.);

    assert!(is_proper_subset(&nowhere, &nowhere, &[1., 2., 3.]));
}

#[test]
fn test_gaussian_over_linspace() {
    let u: Vec<f64> = linspace(-5., 5., 11).collect();
    let set = DiscreteFuzzySet::new(gaussian(0., 1.).unwrap(), &u);

    assert_eq!(set.core(), vec![0.]);
    assert!(set.is_normalized());
    assert!(set.is_convex());
    assert_eq!(set.support().len(), 11);
}
