use crate::Value;

/// Exact floating point sum, independent of the order values are added in.
///
/// Keeps a list of non-overlapping partial sums whose exact total equals the
/// exact total of all values added so far (Shewchuk's algorithm), and rounds
/// once when read.
///
/// Once a non-finite value is added, or the running total overflows, the sum
/// saturates: it reads as the IEEE sum of the infinities (or NaN) seen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExactSum {
    partials: Vec<Value>,

    /// Set once the sum left the finite range
    saturated: Option<Value>,
}

impl ExactSum {
    /// Adds a value.
    pub fn add(&mut self, mut x: Value) {
        if !x.is_finite() {
            self.saturate(x);
            return;
        }

        if self.saturated.is_some() {
            return;
        }

        let mut idx = 0;

        for j in 0..self.partials.len() {
            let Some(&partial) = self.partials.get(j) else {
                break;
            };

            let (big, small) = if x.abs() < partial.abs() {
                (partial, x)
            } else {
                (x, partial)
            };

            let hi = big + small;

            if !hi.is_finite() {
                self.saturate(hi);
                return;
            }

            let lo = small - (hi - big);

            if lo != 0.0 {
                if let Some(slot) = self.partials.get_mut(idx) {
                    *slot = lo;
                }
                idx += 1;
            }

            x = hi;
        }

        self.partials.truncate(idx);
        self.partials.push(x);
    }

    fn saturate(&mut self, x: Value) {
        self.partials.clear();
        self.saturated = Some(self.saturated.map_or(x, |s| s + x));
    }

    /// Returns the correctly rounded sum.
    #[must_use]
    pub fn value(&self) -> Value {
        if let Some(saturated) = self.saturated {
            return saturated;
        }

        let mut partials = self.partials.iter().rev().copied();

        let Some(mut hi) = partials.next() else {
            return 0.0;
        };

        let mut lo = 0.0;
        let mut rest = None;

        while let Some(y) = partials.next() {
            let x = hi;
            hi = x + y;
            lo = y - (hi - x);

            if lo != 0.0 {
                rest = partials.next();
                break;
            }
        }

        // NOTE: Round half to even when the remainder sits exactly halfway
        if let Some(next) = rest {
            if (lo < 0.0 && next < 0.0) || (lo > 0.0 && next > 0.0) {
                let y = lo * 2.0;
                let x = hi + y;

                if y == x - hi {
                    hi = x;
                }
            }
        }

        hi
    }
}
