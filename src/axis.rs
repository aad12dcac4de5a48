//! Time axis construction for profile figures
//!
//! The averaged profile carries no positions of its own (averaging across
//! events discards the per-event adaptive grids), so the session figure
//! lays its samples out on an evenly spaced axis spanning the extraction
//! window, then shows only the configured display sub-range.

/// `n` evenly spaced points spanning `[start, end]`, endpoints included
///
/// `n == 1` yields `[start]` and `n == 0` yields nothing.
pub fn time_axis(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut axis: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            // Pin the endpoint; accumulated rounding must not push the last
            // sample past `end`.
            axis[n - 1] = end;
            axis
        }
    }
}

/// The sub-range of an axis/value pairing with `from <= t <= to`, inclusive
///
/// Returns the kept axis times and their values as parallel vectors.
pub fn display_window(axis: &[f64], values: &[f64], from: f64, to: f64) -> (Vec<f64>, Vec<f64>) {
    debug_assert_eq!(axis.len(), values.len());

    axis.iter()
        .zip(values)
        .filter(|(t, _)| **t >= from && **t <= to)
        .map(|(t, v)| (*t, *v))
        .unzip()
}
