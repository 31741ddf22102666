//! Percent-complete calculation.

/// Percent of the way from start to target, in `[0, 100]`.
///
/// A baseline (`initial`) combined with `current > target` selects the
/// downward branch, where progress is measured from the baseline toward the
/// target. Everything else is measured upward from zero. A zero target always
/// yields 0.
pub fn percent_complete(current: f64, target: f64, initial: Option<f64>) -> f64 {
    if target == 0.0 {
        return 0.0;
    }

    if let Some(initial) = initial {
        if current > target {
            if initial == target {
                return if current <= target { 100.0 } else { 0.0 };
            }
            return clamp_percent((initial - current) / (initial - target) * 100.0);
        }
    }

    clamp_percent(current / target * 100.0)
}

/// Clamp to `[0, 100]`; NaN maps to 0.
pub(crate) fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}
