pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Percentage change from `base` to `value`; `None` when `base` is zero.
#[must_use]
pub fn percent_change(base: f64, value: f64) -> Option<f64> {
    if base.abs() < f64::EPSILON {
        None
    } else {
        Some((value - base) / base * 100.0)
    }
}
