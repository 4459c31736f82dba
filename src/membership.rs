//! Membership functions: pure maps from a crisp value to a degree of
//! membership, and the lazy combinators that compose them.
//!
//! Nothing here enumerates a universe. A membership function is only ever
//! evaluated point by point, so the combinators are equally cheap over a
//! universe of five samples or five million.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::error::{FuzzyError, Result};
use crate::math::interp;
use crate::ops::{AndOp, OrOp};

/// A function from a crisp value to a degree of membership, expected to lie
/// in [0, 1]. Implementors are not required to clamp their output.
pub trait Membership {
    fn degree(&self, x: f64) -> f64;
}

impl<M: Membership + ?Sized> Membership for &M {
    fn degree(&self, x: f64) -> f64 {
        (**self).degree(x)
    }
}

impl<M: Membership + ?Sized> Membership for Box<M> {
    fn degree(&self, x: f64) -> f64 {
        (**self).degree(x)
    }
}

impl<M: Membership + ?Sized> Membership for Rc<M> {
    fn degree(&self, x: f64) -> f64 {
        (**self).degree(x)
    }
}

impl<M: Membership + ?Sized> Membership for Arc<M> {
    fn degree(&self, x: f64) -> f64 {
        (**self).degree(x)
    }
}

/// A membership function that can be registered once and shared between
/// rules and threads.
pub type SharedMembership = Arc<dyn Membership + Send + Sync>;

pub fn shared<M: Membership + Send + Sync + 'static>(membership: M) -> SharedMembership {
    Arc::new(membership)
}

/// Adapts an arbitrary closure into a membership function.
#[derive(Clone, Copy)]
pub struct FromFn<F>(F);

impl<F> fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FromFn(..)")
    }
}

impl<F: Fn(f64) -> f64> Membership for FromFn<F> {
    fn degree(&self, x: f64) -> f64 {
        (self.0)(x)
    }
}

pub fn from_fn<F: Fn(f64) -> f64>(f: F) -> FromFn<F> {
    FromFn(f)
}

fn check_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(FuzzyError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        })
    }
}

fn check_order(name: &'static str, value: f64, previous: f64) -> Result<()> {
    if value >= previous {
        Ok(())
    } else {
        Err(FuzzyError::InvalidParameter {
            name,
            value,
            reason: "corners must be in ascending order",
        })
    }
}

fn check_non_zero(name: &'static str, value: f64) -> Result<()> {
    if value == 0. {
        Err(FuzzyError::InvalidParameter {
            name,
            value,
            reason: "cannot be zero",
        })
    } else {
        Ok(())
    }
}

// -0.0 and 0.0 must hit the same entry
fn bits_of(x: f64) -> u64 {
    (x + 0.).to_bits()
}

/// A membership function backed by an explicit table of `(x, alpha)` pairs.
#[derive(Clone, Debug, Default)]
pub struct Discrete {
    alphas: HashMap<u64, f64>,
}

impl Membership for Discrete {
    fn degree(&self, x: f64) -> f64 {
        self.alphas.get(&bits_of(x)).copied().unwrap_or(0.)
    }
}

/// Builds a membership function from `(x, alpha)` pairs. Values missing from
/// the table have a degree of zero; a repeated `x` keeps its last alpha.
pub fn from_discrete_set(pairs: impl IntoIterator<Item = (f64, f64)>) -> Discrete {
    let mut alphas = HashMap::new();

    for (x, alpha) in pairs {
        if alpha == 0. {
            alphas.remove(&bits_of(x));
            continue;
        }
        alphas.insert(bits_of(x), alpha);
    }

    Discrete { alphas }
}

/// Linear interpolation between sorted breakpoints, flat outside of them.
#[derive(Clone, Debug, PartialEq)]
pub struct Piecewise {
    points: Vec<(f64, f64)>,
}

impl Membership for Piecewise {
    fn degree(&self, x: f64) -> f64 {
        interp(x, &self.points)
    }
}

pub fn piecewise(points: impl IntoIterator<Item = (f64, f64)>) -> Result<Piecewise> {
    let points: Vec<_> = points.into_iter().collect();

    if points.is_empty() {
        return Err(FuzzyError::MissingArgument { argument: "breakpoints" });
    }

    let mut previous = f64::NEG_INFINITY;
    for &(x, alpha) in &points {
        check_finite("x", x)?;
        check_finite("alpha", alpha)?;
        check_order("x", x, previous)?;
        previous = x;
    }

    Ok(Piecewise { points })
}

fn rising(x: f64, a: f64, b: f64) -> f64 {
    if b > a {
        (x - a) / (b - a)
    } else if x >= a {
        1.
    } else {
        0.
    }
}

fn falling(x: f64, c: f64, d: f64) -> f64 {
    if d > c {
        (d - x) / (d - c)
    } else if x <= d {
        1.
    } else {
        0.
    }
}

/// `max(min((x-a)/(b-a), 1, (c-x)/(c-b)), 0)`. A zero-width side (`a == b`
/// or `b == c`) becomes a vertical shoulder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangular {
    a: f64,
    b: f64,
    c: f64,
}

impl Membership for Triangular {
    fn degree(&self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }

        rising(x, self.a, self.b)
            .min(1.)
            .min(falling(x, self.b, self.c))
            .max(0.)
    }
}

pub fn triangular(a: f64, b: f64, c: f64) -> Result<Triangular> {
    check_finite("a", a)?;
    check_finite("b", b)?;
    check_finite("c", c)?;
    check_order("b", b, a)?;
    check_order("c", c, b)?;

    Ok(Triangular { a, b, c })
}

/// `max(min((x-a)/(b-a), 1, (d-x)/(d-c)), 0)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trapezoidal {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

impl Membership for Trapezoidal {
    fn degree(&self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }

        rising(x, self.a, self.b)
            .min(1.)
            .min(falling(x, self.c, self.d))
            .max(0.)
    }
}

pub fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> Result<Trapezoidal> {
    check_finite("a", a)?;
    check_finite("b", b)?;
    check_finite("c", c)?;
    check_finite("d", d)?;
    check_order("b", b, a)?;
    check_order("c", c, b)?;
    check_order("d", d, c)?;

    Ok(Trapezoidal { a, b, c, d })
}

/// Generalized bell: `1 / (1 + |(x-c)/a|^(2b))`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bell {
    a: f64,
    b: f64,
    c: f64,
}

impl Membership for Bell {
    fn degree(&self, x: f64) -> f64 {
        1. / (1. + ((x - self.c) / self.a).abs().powf(2. * self.b))
    }
}

pub fn bell(a: f64, b: f64, c: f64) -> Result<Bell> {
    check_finite("a", a)?;
    check_finite("b", b)?;
    check_finite("c", c)?;
    check_non_zero("a", a)?;

    Ok(Bell { a, b, c })
}

fn gaussian_degree(x: f64, mean: f64, sigma: f64, m: f64) -> f64 {
    (-0.5 * ((x - mean) / sigma).powf(m)).exp()
}

/// `exp(-0.5 * ((x-mean)/sigma)^m)`, with a peak height of one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gaussian {
    mean: f64,
    sigma: f64,
    m: f64,
}

impl Membership for Gaussian {
    fn degree(&self, x: f64) -> f64 {
        gaussian_degree(x, self.mean, self.sigma, self.m)
    }
}

/// A gaussian with the usual exponent of two.
pub fn gaussian(mean: f64, sigma: f64) -> Result<Gaussian> {
    gaussian_with_exponent(mean, sigma, 2.)
}

pub fn gaussian_with_exponent(mean: f64, sigma: f64, m: f64) -> Result<Gaussian> {
    check_finite("mean", mean)?;
    check_finite("sigma", sigma)?;
    check_finite("m", m)?;
    check_non_zero("sigma", sigma)?;

    Ok(Gaussian { mean, sigma, m })
}

/// A gaussian whose mean and sigma are re-read on every evaluation, so the
/// set can be tuned at runtime without being rebuilt.
#[derive(Clone, Copy)]
pub struct DynamicGaussian<M, S> {
    mean: M,
    sigma: S,
    m: f64,
}

impl<M: Fn() -> f64, S: Fn() -> f64> Membership for DynamicGaussian<M, S> {
    fn degree(&self, x: f64) -> f64 {
        gaussian_degree(x, (self.mean)(), (self.sigma)(), self.m)
    }
}

/// Only the sigma observed at construction is validated; a provider that
/// later yields zero produces non-finite degrees.
pub fn dynamic_gaussian<M, S>(mean: M, sigma: S, m: f64) -> Result<DynamicGaussian<M, S>>
where
    M: Fn() -> f64,
    S: Fn() -> f64,
{
    check_finite("m", m)?;
    check_non_zero("sigma", sigma())?;

    Ok(DynamicGaussian { mean, sigma, m })
}

fn sigmoid_degree(x: f64, rate: f64, center: f64) -> f64 {
    1. / (1. + (-rate * (x - center)).exp())
}

/// Logistic curve: `1 / (1 + exp(-rate*(x-center)))`, 0.5 at `center`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sigmoid {
    rate: f64,
    center: f64,
}

impl Membership for Sigmoid {
    fn degree(&self, x: f64) -> f64 {
        sigmoid_degree(x, self.rate, self.center)
    }
}

pub fn sigmoid(rate: f64, center: f64) -> Result<Sigmoid> {
    check_finite("rate", rate)?;
    check_finite("center", center)?;

    Ok(Sigmoid { rate, center })
}

#[derive(Clone, Copy)]
pub struct DynamicSigmoid<R, C> {
    rate: R,
    center: C,
}

impl<R: Fn() -> f64, C: Fn() -> f64> Membership for DynamicSigmoid<R, C> {
    fn degree(&self, x: f64) -> f64 {
        sigmoid_degree(x, (self.rate)(), (self.center)())
    }
}

pub fn dynamic_sigmoid<R, C>(rate: R, center: C) -> DynamicSigmoid<R, C>
where
    R: Fn() -> f64,
    C: Fn() -> f64,
{
    DynamicSigmoid { rate, center }
}

/// `1 - MU(x)`.
#[derive(Clone, Copy, Debug)]
pub struct Complement<M>(M);

impl<M: Membership> Membership for Complement<M> {
    fn degree(&self, x: f64) -> f64 {
        1. - self.0.degree(x)
    }
}

/// Pointwise OR of two membership functions. Neither side is filtered
/// first: an element outside of one set may still belong to the other.
#[derive(Clone, Copy, Debug)]
pub struct Union<A, B> {
    a: A,
    b: B,
    op: OrOp,
}

impl<A: Membership, B: Membership> Membership for Union<A, B> {
    fn degree(&self, x: f64) -> f64 {
        self.op.call(self.a.degree(x), self.b.degree(x))
    }
}

/// Pointwise AND of two membership functions.
#[derive(Clone, Copy, Debug)]
pub struct Intersection<A, B> {
    a: A,
    b: B,
    op: AndOp,
}

impl<A: Membership, B: Membership> Membership for Intersection<A, B> {
    fn degree(&self, x: f64) -> f64 {
        self.op.call(self.a.degree(x), self.b.degree(x))
    }
}

/// `A ∩ complement(B)`.
pub type Difference<A, B> = Intersection<A, Complement<B>>;

pub fn complement<M: Membership>(membership: M) -> Complement<M> {
    Complement(membership)
}

/// `max(MUa(x), MUb(x))`.
pub fn union<A: Membership, B: Membership>(a: A, b: B) -> Union<A, B> {
    union_with(a, b, OrOp::Max)
}

pub fn union_with<A: Membership, B: Membership>(a: A, b: B, op: OrOp) -> Union<A, B> {
    Union { a, b, op }
}

/// `min(MUa(x), MUb(x))`.
pub fn intersection<A: Membership, B: Membership>(a: A, b: B) -> Intersection<A, B> {
    intersection_with(a, b, AndOp::Min)
}

pub fn intersection_with<A: Membership, B: Membership>(a: A, b: B, op: AndOp) -> Intersection<A, B> {
    Intersection { a, b, op }
}

pub fn difference<A: Membership, B: Membership>(a: A, b: B) -> Difference<A, B> {
    intersection(a, complement(b))
}

#[cfg(test)]
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(test)]
fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[cfg(test)]
fn set_a() -> Discrete {
    from_discrete_set([(1., 0.2), (2., 0.5), (3., 0.8), (4., 1.), (5., 0.7), (6., 0.3)])
}

#[cfg(test)]
fn set_b() -> Discrete {
    from_discrete_set([(3., 0.2), (4., 0.4), (5., 0.6), (6., 0.8), (7., 1.), (8., 1.)])
}

#[test]
fn test_from_fn_is_debug() {
    assert_eq!(format!("{:?}", from_fn(|x| x)), "FromFn(..)");
}

#[test]
fn test_discrete_lookup() {
    let a = set_a();

    assert_eq!(a.degree(3.), 0.8);
    assert_eq!(a.degree(3.5), 0.);
    assert_eq!(a.degree(42.), 0.);

    let zero = from_discrete_set([(0., 0.4)]);
    assert_eq!(zero.degree(-0.), 0.4);
}

#[test]
fn test_triangular() {
    let tri = triangular(0., 5., 10.).unwrap();

    assert_eq!(tri.degree(-1.), 0.);
    assert_eq!(tri.degree(0.), 0.);
    assert_eq!(tri.degree(2.5), 0.5);
    assert_eq!(tri.degree(5.), 1.);
    assert_eq!(tri.degree(7.5), 0.5);
    assert_eq!(tri.degree(11.), 0.);

    let shoulder = triangular(0., 0., 10.).unwrap();
    assert_eq!(shoulder.degree(0.), 1.);
    assert_eq!(shoulder.degree(-0.1), 0.);
    assert_eq!(shoulder.degree(5.), 0.5);

    assert!(matches!(
        triangular(5., 0., 10.),
        Err(FuzzyError::InvalidParameter { name: "b", .. })
    ));
    assert!(triangular(f64::NAN, 0., 10.).is_err());
}

#[test]
fn test_trapezoidal() {
    let trap = trapezoidal(0., 2., 4., 8.).unwrap();

    assert_eq!(trap.degree(1.), 0.5);
    assert_eq!(trap.degree(3.), 1.);
    assert_eq!(trap.degree(6.), 0.5);
    assert_eq!(trap.degree(9.), 0.);
    assert!(trapezoidal(0., 2., 1., 8.).is_err());
}

#[test]
fn test_bell() {
    let b = bell(2., 1., 5.).unwrap();

    assert_eq!(b.degree(5.), 1.);
    assert!(close(b.degree(7.), 0.5));
    assert!(close(b.degree(3.), 0.5));
    assert!(matches!(bell(0., 1., 5.), Err(FuzzyError::InvalidParameter { name: "a", .. })));
}

#[test]
fn test_gaussian() {
    let g = gaussian(0., 1.).unwrap();

    assert_eq!(g.degree(0.), 1.);
    assert!(close(g.degree(1.), (-0.5f64).exp()));
    assert!(close(g.degree(-1.), g.degree(1.)));

    assert_eq!(
        gaussian(0., 0.),
        Err(FuzzyError::InvalidParameter {
            name: "sigma",
            value: 0.,
            reason: "cannot be zero"
        })
    );

    let g4 = gaussian_with_exponent(0., 1., 4.).unwrap();
    assert!(close(g4.degree(2.), (-8f64).exp()));
}

#[test]
fn test_dynamic_gaussian_rereads_parameters() {
    let mean = Arc::new(AtomicU64::new(0f64.to_bits()));
    let reader = Arc::clone(&mean);
    let g = dynamic_gaussian(move || f64::from_bits(reader.load(Ordering::Relaxed)), || 1., 2.).unwrap();

    assert_eq!(g.degree(0.), 1.);

    mean.store(3f64.to_bits(), Ordering::Relaxed);
    assert_eq!(g.degree(3.), 1.);
    assert!(g.degree(0.) < 0.1);

    assert!(dynamic_gaussian(|| 0., || 0., 2.).is_err());
}

#[test]
fn test_sigmoid() {
    let s = sigmoid(2., 10.).unwrap();

    assert_eq!(s.degree(10.), 0.5);
    assert!(s.degree(20.) > 0.99);
    assert!(s.degree(0.) < 0.01);

    let dynamic = dynamic_sigmoid(|| 2., || 10.);
    assert_eq!(dynamic.degree(10.), 0.5);
    assert_eq!(dynamic.degree(13.), s.degree(13.));
}

#[test]
fn test_piecewise() {
    let high = piecewise([(175., 0.), (180., 0.2), (185., 0.7), (190., 1.)]).unwrap();

    assert_eq!(high.degree(170.), 0.);
    assert!(close(high.degree(182.5), 0.45));
    assert_eq!(high.degree(195.), 1.);

    assert!(piecewise([]).is_err());
    assert!(piecewise([(2., 0.), (1., 1.)]).is_err());
}

#[test]
fn test_complement() {
    let c = complement(set_a());

    assert!(close(c.degree(1.), 0.8));
    assert_eq!(c.degree(4.), 0.);
    assert_eq!(c.degree(9.), 1.);
}

#[test]
fn test_union_intersection_tables() {
    let domain = [1., 2., 3., 4., 5., 6., 7., 8.];
    let union_table = [0.2, 0.5, 0.8, 1., 0.7, 0.8, 1., 1.];
    let intersection_table = [0., 0., 0.2, 0.4, 0.6, 0.3, 0., 0.];

    let u = union(set_a(), set_b());
    let i = intersection(set_a(), set_b());

    for (n, x) in domain.iter().enumerate() {
        assert_eq!(u.degree(*x), union_table[n], "union at {x}");
        assert_eq!(i.degree(*x), intersection_table[n], "intersection at {x}");
    }

    assert_eq!(i.degree(6.), 0.3);
}

#[test]
fn test_difference() {
    let d = difference(set_a(), set_b());

    assert_eq!(d.degree(1.), 0.2);
    assert!(close(d.degree(4.), 0.6));
    assert_eq!(d.degree(7.), 0.);
}

#[test]
fn test_combinators_over_references_and_shared() {
    let a = set_a();
    let b: SharedMembership = shared(set_b());

    let u = union_with(&a, &b, OrOp::ProbOr);
    assert!(close(u.degree(4.), 1.));
    assert!(close(u.degree(3.), 0.8 + 0.2 - 0.16));

    let i = intersection_with(&a, b.clone(), AndOp::Prod);
    assert!(close(i.degree(5.), 0.42));

    let boxed: Box<dyn Membership> = Box::new(from_fn(|x| if x > 0. { 1. } else { 0. }));
    assert_eq!(complement(boxed).degree(1.), 0.);
}
