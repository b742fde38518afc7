//! Rolling-window and exponential smoothing primitives.
//!
//! All functions take and return index-aligned series where `None` marks an
//! undefined point. A window containing any undefined point is undefined.

use stockscope_core::types::Bar;

/// Substitute for zero denominators where a formula calls for one.
pub const EPSILON: f64 = 1e-6;

/// Lift a fully defined series into the aligned representation.
pub fn defined(data: &[f64]) -> Vec<Option<f64>> {
    data.iter().copied().map(Some).collect()
}

/// Extract one per-bar quantity as a defined series.
pub fn column<F>(bars: &[Bar], f: F) -> Vec<Option<f64>>
where
    F: Fn(&Bar) -> f64,
{
    bars.iter().map(|b| Some(f(b))).collect()
}

/// Apply `f` to every complete window, writing the result at the window's
/// last index.
pub fn rolling_apply<F>(values: &[Option<f64>], window: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let mut result = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return result;
    }

    for (i, slots) in values.windows(window).enumerate() {
        let complete: Option<Vec<f64>> = slots.iter().copied().collect();
        if let Some(complete) = complete {
            result[i + window - 1] = f(&complete);
        }
    }

    result
}

/// Rolling sum.
pub fn rolling_sum(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling_apply(values, window, |w| Some(w.iter().sum()))
}

/// Rolling arithmetic mean.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let window_f64 = window as f64;
    rolling_apply(values, window, |w| Some(w.iter().sum::<f64>() / window_f64))
}

/// Rolling maximum.
pub fn rolling_max(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling_apply(values, window, |w| {
        Some(w.iter().copied().fold(f64::NEG_INFINITY, f64::max))
    })
}

/// Rolling minimum.
pub fn rolling_min(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling_apply(values, window, |w| Some(w.iter().copied().fold(f64::INFINITY, f64::min)))
}

/// Recursive exponential smoothing: `s = alpha * x + (1 - alpha) * s_prev`.
///
/// The recursion is seeded with the first defined input. An undefined input
/// after the seed leaves the state unchanged.
pub fn ewm(values: &[Option<f64>], alpha: f64) -> Vec<Option<f64>> {
    let mut state: Option<f64> = None;
    values
        .iter()
        .map(|value| {
            if let Some(x) = *value {
                state = Some(match state {
                    Some(prev) => alpha * x + (1.0 - alpha) * prev,
                    None => x,
                });
            }
            state
        })
        .collect()
}

/// Bias-adjusted exponential mean: the weighted average of all inputs so
/// far with weights `(1 - alpha)^age`.
pub fn ewm_adjusted(values: &[Option<f64>], alpha: f64) -> Vec<Option<f64>> {
    let decay = 1.0 - alpha;
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    let mut seeded = false;

    values
        .iter()
        .map(|value| {
            match *value {
                Some(x) => {
                    numerator = x + decay * numerator;
                    denominator = 1.0 + decay * denominator;
                    seeded = true;
                }
                None if seeded => {
                    numerator *= decay;
                    denominator *= decay;
                }
                None => {}
            }
            seeded.then(|| numerator / denominator)
        })
        .collect()
}

/// Smoothing factor for a span: `2 / (span + 1)`.
#[inline]
pub fn span_alpha(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// Mark the first `count` points undefined.
pub fn mask_head<T>(mut values: Vec<Option<T>>, count: usize) -> Vec<Option<T>> {
    for slot in values.iter_mut().take(count) {
        *slot = None;
    }
    values
}

/// Combine two aligned series point by point.
pub fn zip_with<F>(a: &[Option<f64>], b: &[Option<f64>], f: F) -> Vec<Option<f64>>
where
    F: Fn(f64, f64) -> Option<f64>,
{
    a.iter()
        .zip(b)
        .map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => f(*x, *y),
            _ => None,
        })
        .collect()
}
