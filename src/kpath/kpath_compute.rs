/// Computation routine of the band-structure k-path
use itertools_num::linspace;
use na::Vector3;
use tracing::{debug, warn};

use crate::error::KPathError;

use super::{HighSymmetryPoint, PathSegment, SampledPath, Tick};

/**
Build a piecewise-linear k-path through the given high-symmetry points.
# Arguments:
  * `points`: the high-symmetry points, in path order. A closed path repeats the first point at the end.
  * `total_samples`: total point budget shared by all segments.
# Returns:
  * `SampledPath`: k-points and one tick per high-symmetry point.
# Notes:
  * Every segment gets `floor(total_samples * L_i / L)` samples on its own; the truncation
  residue is dropped, so the path may hold fewer than `total_samples` points.
  * A segment never emits its own end point.
# Examples:
```
use tbbands_rust::{build_path, HighSymmetryPoint};

let points = [
    HighSymmetryPoint::new("G", [0.0, 0.0, 0.0]),
    HighSymmetryPoint::new("X", [0.5, 0.0, 0.0]),
    HighSymmetryPoint::new("M", [0.5, 0.5, 0.0]),
];
let path = build_path(&points, 20).unwrap();
assert_eq!(path.segment_counts(), &[10, 10]);
assert_eq!(path.tick_indices(), vec![0, 9, 19]);
```
*/
pub fn build_path(
    points: &[HighSymmetryPoint],
    total_samples: usize,
) -> Result<SampledPath, KPathError> {
    if total_samples == 0 {
        return Err(KPathError::InvalidSampleBudget(total_samples));
    }
    let segments = PathSegment::segments_of(points);
    let lengths: Vec<f64> = segments.iter().map(|seg| seg.length()).collect();
    let total_length: f64 = lengths.iter().sum();
    // NaN or infinite coordinates leave no usable length either
    if !(total_length.is_finite() && total_length > 0.0) {
        return Err(KPathError::DegeneratePath {
            num_points: points.len(),
        });
    }
    let segment_counts: Vec<usize> = lengths
        .iter()
        .map(|l| segment_sample_count(total_samples, *l, total_length))
        .collect();

    let num_kpoints = segment_counts
        .iter()
        .try_fold(0_usize, |acc, n| acc.checked_add(*n))
        .ok_or(KPathError::SampleOverflow { total_samples })?;
    let mut kpoints: Vec<Vector3<f64>> = Vec::new();
    kpoints
        .try_reserve_exact(num_kpoints)
        .map_err(|_| KPathError::SampleOverflow { total_samples })?;
    segments
        .iter()
        .zip(segment_counts.iter())
        .for_each(|(seg, n)| {
            debug!(
                from = seg.from().label(),
                to = seg.to().label(),
                length = seg.length(),
                samples = *n,
                "k-path segment"
            );
            if *n == 0 {
                warn!(
                    "segment {} -> {} receives no samples",
                    seg.from().label(),
                    seg.to().label()
                );
            }
            kpoints.extend(interpolate_segment(seg.from().coord(), seg.to().coord(), *n));
        });

    let ticks = compute_ticks(points, &segment_counts);
    Ok(SampledPath::new(kpoints, ticks, segment_counts))
}

/// n_i = floor(total * L_i / L)
fn segment_sample_count(total_samples: usize, length: f64, total_length: f64) -> usize {
    (total_samples as f64 * length / total_length).floor() as usize
}

/**
`n` samples from `from` (inclusive) towards `to` (exclusive):
`from + (to - from) * j / n` for `j = 0..n`.
*/
fn interpolate_segment(from: &Vector3<f64>, to: &Vector3<f64>, n: usize) -> Vec<Vector3<f64>> {
    if n == 0 {
        return Vec::new();
    }
    let delta = to - from;
    // n + 1 evenly spaced fractions on [0, 1], end point dropped
    linspace::<f64>(0.0, 1.0, n + 1)
        .take(n)
        .map(|t| from + delta * t)
        .collect()
}

/**
Tick of point 0 is 0; tick of point i marks the last sample of the incoming
segment, `(sum of n_k for k < i) - 1`, collapsing onto the previous tick when
nothing has been sampled yet.
*/
fn compute_ticks(points: &[HighSymmetryPoint], segment_counts: &[usize]) -> Vec<Tick> {
    let mut cumulative = 0_usize;
    points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            if i == 0 {
                Tick::new(0, point.label())
            } else {
                cumulative += segment_counts[i - 1];
                Tick::new(cumulative.saturating_sub(1), point.label())
            }
        })
        .collect()
}
