//! Numeric root finding for equations with no closed-form solution.

use crate::symbolic::poly;

/// The maximum number of bisection iterations.
const MAX_ITERATIONS: usize = 200;

/// A root found by bisecting a sign change is accepted only if the function is this close to
/// zero there. Sign changes across a pole converge to the pole, where the function is large.
const RESIDUAL: f64 = 1e-6;

/// Roots closer together than this are considered the same root.
const SAME_ROOT: f64 = 1e-7;

/// How the values of the function are judged to be zero.
#[derive(Debug, Clone, Copy)]
enum Zero<'a> {
    /// A sample point is a root only if the function is exactly zero there.
    Exact,

    /// The function is the polynomial with these coefficients. A value is zero if it is within
    /// the rounding error of evaluating the polynomial at that point.
    Polynomial(&'a [f64]),
}

impl Zero<'_> {
    /// Returns true if `value = f(x)` counts as zero.
    fn at(self, x: f64, value: f64) -> bool {
        match self {
            Self::Exact => value == 0.0,
            Self::Polynomial(coeffs) => {
                let roundoff = 4.0 * coeffs.len() as f64 * f64::EPSILON;
                value.abs() <= roundoff * poly::eval_abs(coeffs, x)
            },
        }
    }

    /// Returns true if the result of bisecting a sign change is a root and not a pole.
    fn accepts_bisected(self, value: f64) -> bool {
        match self {
            Self::Exact => value.abs() < RESIDUAL,
            Self::Polynomial(_) => true,
        }
    }
}

/// Rounds the value to the nearest integer if it is within `1e-9` of it.
pub fn round_near_integer(x: f64) -> f64 {
    let rounded = x.round();
    if (x - rounded).abs() < 1e-9 {
        rounded + 0.0
    } else {
        x
    }
}

/// Finds a root of `f` in `[lo, hi]` by bisection, given that `f(lo)` and `f(hi)` have opposite
/// signs. Returns [`None`] if `f` cannot be evaluated somewhere along the way.
pub fn bisect(f: impl Fn(f64) -> Option<f64>, mut lo: f64, mut hi: f64, tolerance: f64) -> Option<f64> {
    let mut f_lo = f(lo)?;
    for _ in 0..MAX_ITERATIONS {
        let mid = lo + (hi - lo) / 2.0;
        let f_mid = f(mid)?;
        if f_mid == 0.0 || (hi - lo) / 2.0 < tolerance {
            return Some(mid);
        }

        if f_lo.signum() == f_mid.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }
    Some(lo + (hi - lo) / 2.0)
}

/// Adds the root to the list unless an equal root is already in it.
fn push_root(roots: &mut Vec<f64>, root: f64) {
    let root = round_near_integer(root);
    if !roots.iter().any(|existing| (existing - root).abs() < SAME_ROOT) {
        roots.push(root);
    }
}

/// Finds the roots of `f` among the given ordered sample points: points where `f` is zero, and
/// sign changes between consecutive points refined by bisection.
fn roots_between(f: impl Fn(f64) -> Option<f64>, points: &[f64], tolerance: f64, zero: Zero<'_>) -> Vec<f64> {
    let values = points.iter().map(|&x| f(x).filter(|v| v.is_finite())).collect::<Vec<_>>();
    let is_zero = |i: usize| values[i].is_some_and(|v| zero.at(points[i], v));
    let mut roots = Vec::new();

    for (i, &x) in points.iter().enumerate() {
        if is_zero(i) {
            push_root(&mut roots, x);
            continue;
        }

        let (Some(a), Some(&b)) = (values[i], values.get(i + 1).and_then(Option::as_ref)) else {
            continue;
        };
        if a.signum() == b.signum() || is_zero(i + 1) {
            continue;
        }

        let accepted = bisect(&f, x, points[i + 1], tolerance)
            .filter(|&root| f(root).is_some_and(|v| zero.accepts_bisected(v)));
        if let Some(root) = accepted {
            push_root(&mut roots, root);
        }
    }

    roots.sort_by(f64::total_cmp);
    roots
}

/// Finds the real roots of `f` in the given range, by scanning `samples` sub-intervals for sign
/// changes and bisecting each one. Sign changes across poles are rejected.
///
/// A root where `f` touches zero without changing sign is only found if it lands exactly on a
/// sample point.
pub fn scan_roots(f: impl Fn(f64) -> Option<f64>, (lo, hi): (f64, f64), samples: usize, tolerance: f64) -> Vec<f64> {
    let samples = samples.max(1);
    let step = (hi - lo) / samples as f64;
    let points = (0..=samples).map(|i| lo + step * i as f64).collect::<Vec<_>>();
    roots_between(f, &points, tolerance, Zero::Exact)
}

/// Finds all real roots of the polynomial with the given coefficients, lowest degree first.
///
/// Between two consecutive critical points the polynomial is monotonic, so each such interval
/// contains at most one root. The critical points are found by applying this function to the
/// derivative, and the search is bounded by the Cauchy bound on the roots. A root of even
/// multiplicity is one of the critical points, and is accepted if the polynomial is zero there up
/// to rounding error.
pub fn polynomial_roots(coeffs: &[f64], tolerance: f64) -> Vec<f64> {
    let degree = match coeffs.iter().rposition(|c| *c != 0.0) {
        Some(degree) => degree,
        None => return Vec::new(),
    };
    let coeffs = &coeffs[..=degree];

    match coeffs {
        [_] => Vec::new(),
        [c0, c1] => vec![round_near_integer(-c0 / c1)],
        _ => {
            let leading = coeffs[degree];
            let bound = 1.0 + coeffs[..degree].iter().map(|c| (c / leading).abs()).fold(0.0, f64::max);

            let mut points = vec![-bound];
            points.extend(
                polynomial_roots(&poly::derivative(coeffs), tolerance)
                    .into_iter()
                    .filter(|x| x.abs() < bound),
            );
            points.push(bound);

            roots_between(|x| Some(poly::eval(coeffs, x)), &points, tolerance, Zero::Polynomial(coeffs))
        },
    }
}
