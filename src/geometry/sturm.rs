// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Real root isolation with Sturm sequences.
//!
//! Used for the degree-5 nearest-point polynomial of a cubic Bézier.
//! Bisection runs for at most `1 + log2(1 / eps)` steps per interval, so the
//! search always terminates.

/// A polynomial with coefficients in ascending order (`coeffs[i] * t^i`)
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Polynomial {
    coeffs: Vec<f64>,
}

/// Relative magnitude below which a coefficient counts as zero
const ZERO_TOLERANCE: f64 = 1e-12;

impl Polynomial {
    pub(crate) fn new(coeffs: Vec<f64>) -> Self {
        let mut poly = Self { coeffs };
        poly.trim();
        poly
    }

    /// Drop leading coefficients that are negligible next to the largest one
    fn trim(&mut self) {
        let scale = self.coeffs.iter().fold(0.0_f64, |m, c| m.max(c.abs()));
        if scale == 0.0 || !scale.is_finite() {
            self.coeffs.clear();
            return;
        }
        while let Some(&last) = self.coeffs.last() {
            if last.abs() <= scale * ZERO_TOLERANCE {
                self.coeffs.pop();
            } else {
                break;
            }
        }
    }

    /// Degree, or `None` for the zero polynomial
    pub(crate) fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    pub(crate) fn eval(&self, t: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, c| acc * t + c)
    }

    fn derivative(&self) -> Self {
        let coeffs = self
            .coeffs
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, c)| c * i as f64)
            .collect();
        Self::new(coeffs)
    }

    /// Rescale so the largest coefficient has magnitude one
    fn normalized(mut self) -> Self {
        let scale = self.coeffs.iter().fold(0.0_f64, |m, c| m.max(c.abs()));
        if scale > 0.0 {
            for c in &mut self.coeffs {
                *c /= scale;
            }
        }
        self
    }

    /// Remainder of polynomial long division by `divisor`
    fn rem(&self, divisor: &Polynomial) -> Polynomial {
        let Some(div_deg) = divisor.degree() else {
            return Polynomial::new(Vec::new());
        };
        let lead = divisor.coeffs[div_deg];
        let mut rem = self.coeffs.clone();
        while rem.len() > div_deg {
            let shift = rem.len() - 1 - div_deg;
            let factor = rem[rem.len() - 1] / lead;
            for (i, c) in divisor.coeffs.iter().enumerate() {
                rem[shift + i] -= factor * c;
            }
            rem.pop();
        }
        Polynomial::new(rem)
    }

    fn negated(mut self) -> Self {
        for c in &mut self.coeffs {
            *c = -*c;
        }
        self
    }
}

/// The Sturm chain of a polynomial
struct SturmSequence {
    chain: Vec<Polynomial>,
}

impl SturmSequence {
    fn new(poly: &Polynomial) -> Self {
        let mut chain = vec![poly.clone().normalized()];
        let first_derivative = poly.derivative().normalized();
        if first_derivative.degree().is_some() {
            chain.push(first_derivative);
        }
        while chain.len() >= 2 {
            let n = chain.len();
            let next = chain[n - 2].rem(&chain[n - 1]).negated();
            if next.degree().is_none() {
                break;
            }
            chain.push(next.normalized());
        }
        Self { chain }
    }

    fn sign_changes(&self, t: f64) -> usize {
        let mut changes = 0;
        let mut last_sign = 0.0;
        for poly in &self.chain {
            let value = poly.eval(t);
            if value == 0.0 {
                continue;
            }
            let sign = value.signum();
            if last_sign != 0.0 && sign != last_sign {
                changes += 1;
            }
            last_sign = sign;
        }
        changes
    }

    /// Number of distinct real roots in `(lo, hi]`
    fn count(&self, lo: f64, hi: f64) -> Option<usize> {
        self.sign_changes(lo).checked_sub(self.sign_changes(hi))
    }
}

/// Distinct real roots of `poly` inside `[0, 1]`, each to within `eps`
///
/// Returns an empty list for the zero polynomial, and also when the Sturm
/// counts are inconsistent (more roots than the degree allows), which only
/// happens for numerically degenerate input. Callers then fall back to the
/// interval endpoints.
pub(crate) fn roots_in_unit_interval(poly: &Polynomial, eps: f64) -> Vec<f64> {
    let Some(degree) = poly.degree() else {
        return Vec::new();
    };
    if degree == 0 {
        return Vec::new();
    }

    let sturm = SturmSequence::new(poly);
    let max_iterations = 1 + (1.0 / eps).log2().ceil().max(0.0) as usize;

    let mut roots = Vec::new();
    if poly.eval(0.0) == 0.0 {
        roots.push(0.0);
    }

    let total = match sturm.count(0.0, 1.0) {
        Some(n) if n <= degree => n,
        _ => return Vec::new(),
    };
    if total == 0 {
        return roots;
    }

    let mut pending = vec![(0.0, 1.0, total, 0usize)];
    while let Some((lo, hi, count, depth)) = pending.pop() {
        if count == 0 {
            continue;
        }
        if count == 1 {
            roots.push(refine(poly, &sturm, lo, hi, max_iterations));
            continue;
        }
        let mid = 0.5 * (lo + hi);
        if depth >= max_iterations || hi - lo < eps {
            roots.push(mid);
            continue;
        }
        let left = sturm.count(lo, mid).unwrap_or(0);
        let right = count.saturating_sub(left);
        pending.push((mid, hi, right, depth + 1));
        pending.push((lo, mid, left, depth + 1));
    }

    roots.sort_by(f64::total_cmp);
    roots.dedup_by(|a, b| (*a - *b).abs() < eps);
    roots
}

/// Narrow an interval holding exactly one root in `(lo, hi]`
fn refine(poly: &Polynomial, sturm: &SturmSequence, mut lo: f64, mut hi: f64, steps: usize) -> f64 {
    let mut f_lo = poly.eval(lo);
    let sign_change = f_lo * poly.eval(hi) <= 0.0;
    for _ in 0..steps {
        let mid = 0.5 * (lo + hi);
        if sign_change {
            let f_mid = poly.eval(mid);
            if f_mid == 0.0 {
                return mid;
            }
            if f_lo * f_mid < 0.0 {
                hi = mid;
            } else {
                lo = mid;
                f_lo = f_mid;
            }
        } else if sturm.count(lo, mid).unwrap_or(0) > 0 {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    0.5 * (lo + hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_simple_roots() {
        // (t - 0.25)(t - 0.75) = t^2 - t + 0.1875
        let poly = Polynomial::new(vec![0.1875, -1.0, 1.0]);
        let roots = roots_in_unit_interval(&poly, 1e-10);
        assert_eq!(roots.len(), 2);
        assert!((roots[0] - 0.25).abs() < 1e-8);
        assert!((roots[1] - 0.75).abs() < 1e-8);
    }

    #[test]
    fn ignores_roots_outside_unit_interval() {
        // (t - 2)(t + 1)
        let poly = Polynomial::new(vec![-2.0, -1.0, 1.0]);
        assert!(roots_in_unit_interval(&poly, 1e-10).is_empty());
    }

    #[test]
    fn zero_polynomial_has_no_roots() {
        let poly = Polynomial::new(vec![0.0, 0.0, 0.0]);
        assert_eq!(poly.degree(), None);
        assert!(roots_in_unit_interval(&poly, 1e-10).is_empty());
    }

    #[test]
    fn double_root_is_found() {
        // (t - 0.5)^2
        let poly = Polynomial::new(vec![0.25, -1.0, 1.0]);
        let roots = roots_in_unit_interval(&poly, 1e-10);
        assert_eq!(roots.len(), 1);
        assert!((roots[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn quintic_roots() {
        // (t - 0.1)(t - 0.3)(t - 0.5)(t - 0.7)(t - 0.9)
        let mut coeffs = vec![1.0];
        for r in [0.1, 0.3, 0.5, 0.7, 0.9] {
            let mut next = vec![0.0; coeffs.len() + 1];
            for (i, c) in coeffs.iter().enumerate() {
                next[i] -= c * r;
                next[i + 1] += c;
            }
            coeffs = next;
        }
        let roots = roots_in_unit_interval(&Polynomial::new(coeffs), 1e-12);
        assert_eq!(roots.len(), 5);
        for (root, expected) in roots.iter().zip([0.1, 0.3, 0.5, 0.7, 0.9]) {
            assert!((root - expected).abs() < 1e-7);
        }
    }
}
