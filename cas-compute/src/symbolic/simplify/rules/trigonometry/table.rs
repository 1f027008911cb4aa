//! Lookup tables for the trigonometric functions at multiples of `pi/12` and `pi/8`.
//!
//! Angles are normalized to a fraction of a full turn, measured in 24ths: the angle `pi/6` is
//! `1/12` of a turn, which is key `2`. Every angle whose value is known exactly is a whole number
//! of 24ths, and angles that are not in a table have no simple exact value.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use super::consts::Exact;

/// The number of table keys in a full turn.
pub const FULL_TURN: i64 = 24;

/// The output of a trigonometric function at a tabled angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrigOut {
    /// Whether the output is negative.
    pub neg: bool,

    /// The magnitude of the output.
    pub output: Exact,
}

/// Creates a [`TrigOut`].
const fn out(neg: bool, output: Exact) -> TrigOut {
    TrigOut { neg, output }
}

/// `sin` on the first half turn. The second half turn is the negation of the first.
const SIN_HALF_TURN: [(i64, Exact); 9] = [
    (0, Exact::Zero),
    (2, Exact::Half),
    (3, Exact::HalfSqrt2),
    (4, Exact::HalfSqrt3),
    (6, Exact::One),
    (8, Exact::HalfSqrt3),
    (9, Exact::HalfSqrt2),
    (10, Exact::Half),
    (12, Exact::Zero),
];

/// `tan` on the first half turn, which is its period. `tan` is undefined at a quarter turn.
const TAN_HALF_TURN: [(i64, TrigOut); 7] = [
    (0, out(false, Exact::Zero)),
    (2, out(false, Exact::ThirdSqrt3)),
    (3, out(false, Exact::One)),
    (4, out(false, Exact::Sqrt3)),
    (8, out(true, Exact::Sqrt3)),
    (9, out(true, Exact::One)),
    (10, out(true, Exact::ThirdSqrt3)),
];

/// Lookup table for the `sin` function.
pub static SIN_TABLE: Lazy<HashMap<i64, TrigOut>> = Lazy::new(|| {
    SIN_HALF_TURN.iter()
        .flat_map(|&(key, output)| {
            let second_half = (key + FULL_TURN / 2) % FULL_TURN;
            [
                (key, out(false, output)),
                (second_half, out(output != Exact::Zero, output)),
            ]
        })
        .collect()
});

/// Lookup table for the `cos` function, using `cos(t) = sin(t + pi/2)`.
pub static COS_TABLE: Lazy<HashMap<i64, TrigOut>> = Lazy::new(|| {
    SIN_TABLE.iter()
        .map(|(&key, &output)| ((key - FULL_TURN / 4).rem_euclid(FULL_TURN), output))
        .collect()
});

/// Lookup table for the `tan` function.
pub static TAN_TABLE: Lazy<HashMap<i64, TrigOut>> = Lazy::new(|| {
    TAN_HALF_TURN.iter()
        .flat_map(|&(key, output)| [(key, output), (key + FULL_TURN / 2, output)])
        .collect()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_agree_with_floats() {
        for key in 0..FULL_TURN {
            let angle = key as f64 * std::f64::consts::PI / 12.0;
            for (table, f) in [(&SIN_TABLE, f64::sin as fn(f64) -> f64), (&COS_TABLE, f64::cos), (&TAN_TABLE, f64::tan)] {
                if let Some(out) = table.get(&key) {
                    let magnitude = match out.output {
                        Exact::Zero => 0.0,
                        Exact::Half => 0.5,
                        Exact::HalfSqrt2 => 2f64.sqrt() / 2.0,
                        Exact::HalfSqrt3 => 3f64.sqrt() / 2.0,
                        Exact::ThirdSqrt3 => 3f64.sqrt() / 3.0,
                        Exact::One => 1.0,
                        Exact::Sqrt3 => 3f64.sqrt(),
                    };
                    let expected = if out.neg { -magnitude } else { magnitude };
                    assert!((f(angle) - expected).abs() < 1e-9, "key {key}");
                }
            }
        }
    }

    #[test]
    fn table_sizes() {
        assert_eq!(SIN_TABLE.len(), 16);
        assert_eq!(COS_TABLE.len(), 16);
        assert_eq!(TAN_TABLE.len(), 14);
    }
}
