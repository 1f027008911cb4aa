//! Real-valued functions available to numeric evaluation.

use levenshtein::levenshtein;

/// The names of every function that can be evaluated numerically.
pub const FUNCTIONS: [&str; 18] = [
    "sin", "cos", "tan", "sec", "csc", "cot",
    "asin", "acos", "atan",
    "sinh", "cosh", "tanh",
    "exp", "ln", "log", "sqrt", "cbrt", "abs",
];

/// Returns the implementation of the function of one argument with the given name.
pub fn lookup(name: &str) -> Option<fn(f64) -> f64> {
    let f: fn(f64) -> f64 = match name {
        "sin" => f64::sin,
        "cos" => f64::cos,
        "tan" => f64::tan,
        "sec" => |x| x.cos().recip(),
        "csc" => |x| x.sin().recip(),
        "cot" => |x| x.tan().recip(),
        "asin" => f64::asin,
        "acos" => f64::acos,
        "atan" => f64::atan,
        "sinh" => f64::sinh,
        "cosh" => f64::cosh,
        "tanh" => f64::tanh,
        "exp" => f64::exp,
        "ln" => f64::ln,
        "log" => f64::log10,
        "sqrt" => f64::sqrt,
        "cbrt" => f64::cbrt,
        "abs" => f64::abs,
        _ => return None,
    };
    Some(f)
}

/// Returns true if the function with the given name can be evaluated numerically.
pub fn is_known(name: &str) -> bool {
    lookup(name).is_some()
}

/// Returns up to three names from `candidates` that are similar to the given name, closest
/// first.
pub fn similar_names<'a>(name: &str, candidates: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut similar = candidates.into_iter()
        .map(|candidate| (levenshtein(name, candidate), candidate))
        .filter(|(distance, candidate)| *distance > 0 && *distance <= 2 && *distance < candidate.len())
        .collect::<Vec<_>>();
    similar.sort();
    similar.into_iter()
        .take(3)
        .map(|(_, candidate)| candidate.to_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_function_exists() {
        for name in FUNCTIONS {
            assert!(is_known(name), "{name} should be known");
        }
        assert!(!is_known("gamma"));
    }

    #[test]
    fn suggestions() {
        assert_eq!(similar_names("son", FUNCTIONS)[0], "sin");
        assert_eq!(similar_names("sqr", FUNCTIONS)[0], "sqrt");
        assert!(similar_names("son", FUNCTIONS).len() <= 3);
        assert!(similar_names("gamma", FUNCTIONS).is_empty());
    }
}
