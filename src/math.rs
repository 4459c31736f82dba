use num::Float;

/// Similar to numpy.interp for a single point. Outside of the breakpoint
/// range the first or last y value is returned. `coords` must be sorted
/// by x; an empty slice interpolates to zero.
pub(crate) fn interp<F: Float>(x: F, coords: &[(F, F)]) -> F {
    let (Some(&(x_first, y_first)), Some(&(x_last, y_last))) = (coords.first(), coords.last()) else {
        return F::zero();
    };

    if x.is_nan() {
        return F::nan();
    }
    // Base cases
    if x <= x_first {
        return y_first;
    }
    if x >= x_last {
        return y_last;
    }

    for window in coords.windows(2) {
        let (x1, y1) = window[0];
        let (x2, y2) = window[1];

        // Actual interpolation
        if x1 <= x && x <= x2 {
            if x2 == x1 {
                return y2;
            }

            return y1 + (x - x1) * (y2 - y1) / (x2 - x1);
        }
    }

    y_last
}

#[test]
fn test_interp() {
    let xs = [1., 2., 3.];
    let ys = [3., 2., 0.];
    let coords: Vec<(f64, f64)> = xs.into_iter().zip(ys).collect();

    let interpolated: Vec<f64> = [0., 1., 1.5, 2.72, 3.24].iter().map(|x| interp(*x, &coords)).collect();

    assert_eq!(interpolated[..3], [3., 3., 2.5]);
    assert!((interpolated[3] - 0.56).abs() < 1e-12);
    assert_eq!(interpolated[4], 0.);

    let xs = [0., 1., 2., 3., 4.5];
    let ys = [0., 2., 5., 3., 2.];
    let coords: Vec<(f64, f64)> = xs.into_iter().zip(ys).collect();

    assert_eq!(interp(2.5, &coords), 4.);
    assert_eq!(interp(-1., &coords), 0.);
    assert_eq!(interp(7.5, &coords), 2.);
    assert_eq!(interp(1., &[]), 0.);
}
