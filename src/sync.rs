//! Spike-train synchrony measurement
//!
//! This module defines the measurement seam the pipeline computes against
//! ([`SyncMeasure`]) and ships [`SpikeSync`], an adaptive
//! coincidence-detection measure. The measure is parameter-free: instead of
//! a fixed coincidence window, each spike pair is compared within half the
//! smallest interspike interval surrounding it, so the timescale adapts to
//! the local firing rate.

/// A spike train bounded by its observation window
#[derive(Debug, Clone, PartialEq)]
pub struct SpikeTrain {
    /// Spike times in seconds, sorted ascending
    pub times: Vec<f64>,
    /// Start of the observation window
    pub t_start: f64,
    /// End of the observation window
    pub t_end: f64,
}

impl SpikeTrain {
    /// Create a train from spike times and window edges `(t_start, t_end)`
    ///
    /// Spike times are sorted ascending; the edges are carried along and
    /// bound the coincidence windows of the first and last spike.
    pub fn new(mut times: Vec<f64>, edges: (f64, f64)) -> Self {
        times.sort_by(|a, b| a.total_cmp(b));
        Self {
            times,
            t_start: edges.0,
            t_end: edges.1,
        }
    }

    /// Whether this train carries no spikes
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// A time-resolved synchrony measurement over a set of spike trains
///
/// Implementations choose their own sample positions; callers must not
/// assume a fixed profile length. Returned values are per-spike synchrony
/// in [0, 1] and are not divided by the population size; that normalization
/// belongs to the pipeline.
pub trait SyncMeasure {
    /// Time-resolved synchrony curve for `trains`
    ///
    /// Returns `(values, positions)` with positions strictly increasing
    /// within the trains' declared edges. Defined for two or more trains;
    /// fewer trains, or no spikes at all, yields an empty profile.
    fn profile(&self, trains: &[SpikeTrain]) -> (Vec<f64>, Vec<f64>);

    /// Single synchrony value in [0, 1] for `trains`
    ///
    /// Defined for two or more trains. With no spike to compare the value
    /// is 1.0: nothing fired out of sync.
    fn scalar(&self, trains: &[SpikeTrain]) -> f64;
}

/// Adaptive coincidence detection
///
/// A spike scores 1 against a partner train when that train fires within
/// the pair's coincidence window, half the smallest of the four interspike
/// intervals surrounding the two spikes (bounded by the window edges for
/// first and last spikes). A spike's value is its mean score over all
/// partner trains. The profile pools every spike of every train in time
/// order, merging spikes that share an exact position into one sample, and
/// carries the window edges as first and last positions with values copied
/// from the adjacent sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpikeSync;

impl SyncMeasure for SpikeSync {
    fn profile(&self, trains: &[SpikeTrain]) -> (Vec<f64>, Vec<f64>) {
        let pooled = pooled_coincidence(trains);
        if pooled.is_empty() {
            return (Vec::new(), Vec::new());
        }

        let mut positions: Vec<f64> = Vec::with_capacity(pooled.len() + 2);
        let mut values: Vec<f64> = Vec::with_capacity(pooled.len() + 2);

        // Merge spikes sharing an exact position; near-coincident spikes
        // stay separate samples.
        let mut idx = 0;
        while idx < pooled.len() {
            let time = pooled[idx].time;
            let mut sum = 0.0;
            let mut count = 0usize;
            while idx < pooled.len() && pooled[idx].time == time {
                sum += pooled[idx].value;
                count += 1;
                idx += 1;
            }
            positions.push(time);
            values.push(sum / count as f64);
        }

        let (t_start, t_end) = (trains[0].t_start, trains[0].t_end);
        if positions[0] > t_start {
            positions.insert(0, t_start);
            let first = values[0];
            values.insert(0, first);
        }
        if positions[positions.len() - 1] < t_end {
            positions.push(t_end);
            let last = values[values.len() - 1];
            values.push(last);
        }

        (values, positions)
    }

    fn scalar(&self, trains: &[SpikeTrain]) -> f64 {
        let pooled = pooled_coincidence(trains);
        if pooled.is_empty() {
            return 1.0;
        }
        pooled.iter().map(|s| s.value).sum::<f64>() / pooled.len() as f64
    }
}

/// One pooled spike with its mean coincidence value
struct PooledSpike {
    time: f64,
    value: f64,
}

/// Coincidence value of every spike of every train, in time order
///
/// Empty when fewer than two trains are supplied or no train fired.
fn pooled_coincidence(trains: &[SpikeTrain]) -> Vec<PooledSpike> {
    if trains.len() < 2 {
        return Vec::new();
    }

    let partners = (trains.len() - 1) as f64;
    let mut pooled = Vec::new();

    for (n, train) in trains.iter().enumerate() {
        for i in 0..train.times.len() {
            let hits = trains
                .iter()
                .enumerate()
                .filter(|(m, _)| *m != n)
                .filter(|(_, other)| coincides(train, i, other))
                .count();
            pooled.push(PooledSpike {
                time: train.times[i],
                value: hits as f64 / partners,
            });
        }
    }

    pooled.sort_by(|a, b| a.time.total_cmp(&b.time));
    pooled
}

/// Whether spike `i` of `train` has a coincident partner in `other`
///
/// Only the nearest spike on either side of the candidate can coincide, so
/// the check is a range search plus two window comparisons.
fn coincides(train: &SpikeTrain, i: usize, other: &SpikeTrain) -> bool {
    let t = train.times[i];
    let split = other.times.partition_point(|&s| s < t);
    let neighbors = [
        split.checked_sub(1),
        (split < other.times.len()).then_some(split),
    ];

    neighbors.into_iter().flatten().any(|j| {
        let tau = 0.5 * surrounding_interval(train, i).min(surrounding_interval(other, j));
        (t - other.times[j]).abs() < tau
    })
}

/// Smaller of the intervals to the neighboring spikes of `train.times[i]`
///
/// The first and last spike take the distance to their window edge in
/// place of the missing neighbor interval.
fn surrounding_interval(train: &SpikeTrain, i: usize) -> f64 {
    let prev = if i > 0 {
        train.times[i] - train.times[i - 1]
    } else {
        train.times[i] - train.t_start
    };
    let next = if i + 1 < train.times.len() {
        train.times[i + 1] - train.times[i]
    } else {
        train.t_end - train.times[i]
    };
    prev.min(next)
}
