use num::Float;

/// Evenly spaced samples over a closed interval, inclusive of both ends.
/// Useful for building a universe of discourse.
pub struct Linspace<F> {
    start: F,
    step: F,
    index: usize,
    len: usize,
}

impl<F: Float> Linspace<F> {
    pub fn new(min: F, max: F, n: usize) -> Self {
        let step = match F::from(n.saturating_sub(1)) {
            Some(num_steps) if n > 1 => (max - min) / num_steps,
            _ => F::zero(),
        };

        Linspace {
            start: min,
            step,
            index: 0,
            len: n,
        }
    }
}

/// `n` evenly spaced samples from `min` to `max`.
pub fn linspace(min: f64, max: f64, n: usize) -> Linspace<f64> {
    Linspace::new(min, max, n)
}

impl<F: Float> Iterator for Linspace<F> {
    type Item = F;

    #[inline]
    fn next(&mut self) -> Option<F> {
        if self.index >= self.len {
            return None;
        }

        // Calculate the value just like numpy.linspace does
        let i = F::from(self.index)?;
        self.index += 1;

        Some(self.start + self.step * i)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl<F: Float> ExactSizeIterator for Linspace<F> {}

#[test]
fn test_linspace() {
    let u: Vec<f64> = linspace(0., 1., 5).collect();
    assert_eq!(u, vec![0., 0.25, 0.5, 0.75, 1.]);

    assert_eq!(linspace(3., 9., 1).collect::<Vec<_>>(), vec![3.]);
    assert_eq!(linspace(3., 9., 0).count(), 0);
    assert_eq!(linspace(-1., 1., 21).len(), 21);
}
