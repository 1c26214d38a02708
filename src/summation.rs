//! Compensated summation used by every metric accumulation.
//!
//! Naive left-to-right summation loses low-order bits whenever a large running
//! total absorbs a small term. [`CompensatedSum`] implements Neumaier's variant
//! of Kahan summation: it carries the rounding error of every addition in a
//! separate term and folds it back in at the end, so the result is largely
//! insensitive to the order of the inputs. Products additionally recover their
//! own rounding error through a fused multiply-add.
//!
//! Norms and distances are accumulated on inputs rescaled by a power of two so
//! that squaring neither overflows for huge coordinates nor underflows for tiny
//! ones. Dividing by a power of two is exact, so in-range inputs lose nothing.

/// Running sum with a Neumaier error-compensation term.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single term.
    pub fn add(&mut self, value: f64) {
        let t = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - t) + value;
        } else {
            self.compensation += (value - t) + self.sum;
        }
        self.sum = t;
    }

    /// Add `a * b`, including the rounding error of the multiplication itself.
    pub fn add_product(&mut self, a: f64, b: f64) {
        let product = a * b;
        self.add(product);
        if product.is_finite() {
            self.compensation += a.mul_add(b, -product);
        }
    }

    /// The compensated total.
    pub fn value(&self) -> f64 {
        // Once the running sum overflows the error term is meaningless (inf - inf).
        if !self.sum.is_finite() {
            return self.sum;
        }
        self.sum + self.compensation
    }
}

impl Extend<f64> for CompensatedSum {
    fn extend<T: IntoIterator<Item = f64>>(&mut self, iter: T) {
        for value in iter {
            self.add(value);
        }
    }
}

impl FromIterator<f64> for CompensatedSum {
    fn from_iter<T: IntoIterator<Item = f64>>(iter: T) -> Self {
        let mut acc = CompensatedSum::new();
        acc.extend(iter);
        acc
    }
}

/// Compensated sum of a sequence of terms.
pub fn stable_sum(values: impl IntoIterator<Item = f64>) -> f64 {
    values.into_iter().collect::<CompensatedSum>().value()
}

/// Compensated dot product. Callers must check that the slices have equal length.
pub fn stable_dot(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    let mut acc = CompensatedSum::new();
    for (x, y) in a.iter().zip(b) {
        acc.add_product(*x, *y);
    }
    acc.value()
}

/// Dot product that survives intermediate overflow.
///
/// Falls back to accumulating on rescaled inputs when the plain compensated
/// sum overflows, so cancelling huge terms still give a finite answer.
pub fn overflow_safe_dot(a: &[f64], b: &[f64]) -> f64 {
    let raw = stable_dot(a, b);
    if raw.is_finite() {
        return raw;
    }
    let (Some(sa), Some(sb)) = (pow2_scale(a), pow2_scale(b)) else {
        return raw;
    };
    let mut acc = CompensatedSum::new();
    for (x, y) in a.iter().zip(b) {
        acc.add_product(x / sa, y / sb);
    }
    let (lo, hi) = if sa < sb { (sa, sb) } else { (sb, sa) };
    acc.value() * lo * hi
}

/// Largest absolute coordinate, `0.0` for an empty or all-zero slice.
fn max_abs(a: &[f64]) -> f64 {
    a.iter().fold(0.0_f64, |m, x| m.max(x.abs()))
}

/// Power of two at or below `max_abs(a)`, or `None` for a zero vector.
///
/// Subnormal maxima scale by the maximum itself.
pub fn pow2_scale(a: &[f64]) -> Option<f64> {
    scale_for(max_abs(a))
}

fn scale_for(max: f64) -> Option<f64> {
    if max == 0.0 {
        return None;
    }
    let exponent = (max.to_bits() >> 52) & 0x7ff;
    if exponent == 0 {
        Some(max)
    } else {
        Some(f64::from_bits(exponent << 52))
    }
}

/// `scale * sqrt(sum((x / scale)^2))` over the `len` values produced by `at`.
fn scaled_norm(len: usize, at: impl Fn(usize) -> f64) -> f64 {
    let max = (0..len).fold(0.0_f64, |m, i| m.max(at(i).abs()));
    let Some(scale) = scale_for(max) else {
        return 0.0;
    };
    let mut acc = CompensatedSum::new();
    for i in 0..len {
        let x = at(i) / scale;
        acc.add_product(x, x);
    }
    scale * acc.value().sqrt()
}

/// L2 norm, exact to zero only for the zero vector.
pub fn stable_norm(a: &[f64]) -> f64 {
    scaled_norm(a.len(), |i| a[i])
}

/// Euclidean distance. Callers must check that the slices have equal length.
///
/// Identical inputs give exactly `0.0`. Differences that would overflow are
/// taken on halved coordinates, so the result is `inf` only when the true
/// distance exceeds `f64::MAX`.
pub fn stable_distance(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    let overflows = a.iter().zip(b).any(|(x, y)| (x - y).is_infinite());
    if overflows {
        2.0 * scaled_norm(a.len(), |i| a[i] * 0.5 - b[i] * 0.5)
    } else {
        scaled_norm(a.len(), |i| a[i] - b[i])
    }
}
