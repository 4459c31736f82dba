use crate::rules::Firing;

/// A full Sugeno evaluation: the defuzzified value and what produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct Outputs {
    value: f64,
    firings: Vec<Firing>,
    weight_sum: f64,
}

impl Outputs {
    /// Weighted average of the firings; zero when no rule fires.
    pub(crate) fn from_firings(firings: Vec<Firing>) -> Self {
        let (weighted_sum, weight_sum) = firings
            .iter()
            .fold((0., 0.), |(wz, w), firing| (wz + firing.w * firing.z, w + firing.w));
        let value = if weight_sum == 0. { 0. } else { weighted_sum / weight_sum };

        Self {
            value,
            firings,
            weight_sum,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// One entry per rule, in registration order.
    pub fn firings(&self) -> &[Firing] {
        &self.firings
    }

    /// `Σw` over every rule.
    pub fn weight_sum(&self) -> f64 {
        self.weight_sum
    }

    pub fn fired(&self) -> bool {
        self.weight_sum != 0.
    }
}

#[test]
fn test_weighted_average() {
    let outputs = Outputs::from_firings(vec![
        Firing { w: 0.5, z: 299. },
        Firing { w: 0., z: 1000. },
        Firing { w: 0.5, z: 336. },
    ]);

    assert_eq!(outputs.value(), 317.5);
    assert_eq!(outputs.weight_sum(), 1.);
    assert_eq!(outputs.firings().len(), 3);
    assert!(outputs.fired());
}

#[test]
fn test_nothing_fired_is_zero() {
    let outputs = Outputs::from_firings(vec![Firing { w: 0., z: 12. }]);

    assert_eq!(outputs.value(), 0.);
    assert!(!outputs.fired());
    assert_eq!(Outputs::from_firings(Vec::new()).value(), 0.);
}
