//==================================================
// File: builtins/random.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: randomNumber builtin
//==================================================

use crate::binding::ArgumentBinding;
use crate::capabilities::SharedSource;
use crate::value::Value;

pub const RANDOM_NUMBER_DOC: &str = "\
Get a random number.

Example:
myDiceRoll = randomNumber(1, 6)

- Parameter min: minimum number.
- Parameter max: maximum number.
- Returns: a random number.";

/// Largest magnitude at which every integer is exact in an `f64`.
const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

/// Uniform integer in `[min, max]`. Unusable bounds give the degenerate
/// draw from `[0, 1)`, which is always `0`.
pub fn random_number(source: &SharedSource, args: &ArgumentBinding) -> Value {
    let bounds = match (args.get("min"), args.get("max")) {
        (Some(Value::Number(min)), Some(Value::Number(max))) => integral_bounds(*min, *max),
        _ => None,
    };
    let (low, high) = bounds.unwrap_or((0, 0));
    let drawn = source.lock().uniform_inclusive(low, high);
    Value::Number(drawn as f64)
}

fn integral_bounds(min: f64, max: f64) -> Option<(i64, i64)> {
    let in_range = |n: f64| n.is_finite() && n.abs() <= MAX_EXACT;
    if !in_range(min) || !in_range(max) {
        return None;
    }
    let (low, high) = (min.trunc() as i64, max.trunc() as i64);
    (low <= high).then_some((low, high))
}
