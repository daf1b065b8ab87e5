pub mod kpath_compute;
pub mod kpath_util;

use na::Vector3;
use serde::{Deserialize, Serialize};

/**
Named point in fractional reciprocal coordinates.
# Field:
  * label: String - e.g. "G", "K", "M"
  * coord: Vector3<f64> - fractional reciprocal coordinate
*/
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighSymmetryPoint {
    label: String,
    coord: Vector3<f64>,
}

impl HighSymmetryPoint {
    pub fn new(label: impl Into<String>, coord: [f64; 3]) -> Self {
        Self {
            label: label.into(),
            coord: Vector3::from(coord),
        }
    }

    pub fn label(&self) -> &str {
        self.label.as_ref()
    }

    pub fn coord(&self) -> &Vector3<f64> {
        &self.coord
    }
}

/// Consecutive pair of high-symmetry points.
#[derive(Debug, Clone, Copy)]
pub struct PathSegment<'a> {
    from: &'a HighSymmetryPoint,
    to: &'a HighSymmetryPoint,
}

impl<'a> PathSegment<'a> {
    pub fn new(from: &'a HighSymmetryPoint, to: &'a HighSymmetryPoint) -> Self {
        Self { from, to }
    }

    pub fn from(&self) -> &'a HighSymmetryPoint {
        self.from
    }

    pub fn to(&self) -> &'a HighSymmetryPoint {
        self.to
    }

    /// Euclidean length in fractional coordinates.
    pub fn length(&self) -> f64 {
        (self.to.coord() - self.from.coord()).norm()
    }

    /// Segments implied by a point sequence.
    pub fn segments_of(points: &'a [HighSymmetryPoint]) -> Vec<PathSegment<'a>> {
        points
            .windows(2)
            .map(|pair| PathSegment::new(&pair[0], &pair[1]))
            .collect()
    }
}

/// Labelled index into the sampled k-point sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    index: usize,
    label: String,
}

impl Tick {
    pub fn new(index: usize, label: impl Into<String>) -> Self {
        Self {
            index,
            label: label.into(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn label(&self) -> &str {
        self.label.as_ref()
    }
}

/**
Output of `build_path`.
# Field:
  * kpoints: Vec<Vector3<f64>> - concatenated per-segment samples
  * ticks: Vec<Tick> - one per high-symmetry point
  * segment_counts: Vec<usize> - samples contributed by each segment
*/
#[derive(Debug, Clone, PartialEq)]
pub struct SampledPath {
    kpoints: Vec<Vector3<f64>>,
    ticks: Vec<Tick>,
    segment_counts: Vec<usize>,
}

impl SampledPath {
    pub fn new(kpoints: Vec<Vector3<f64>>, ticks: Vec<Tick>, segment_counts: Vec<usize>) -> Self {
        Self {
            kpoints,
            ticks,
            segment_counts,
        }
    }

    pub fn kpoints(&self) -> &[Vector3<f64>] {
        self.kpoints.as_ref()
    }

    pub fn ticks(&self) -> &[Tick] {
        self.ticks.as_ref()
    }

    pub fn segment_counts(&self) -> &[usize] {
        self.segment_counts.as_ref()
    }

    pub fn len(&self) -> usize {
        self.kpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kpoints.is_empty()
    }

    pub fn tick_indices(&self) -> Vec<usize> {
        self.ticks.iter().map(|t| t.index()).collect()
    }

    pub fn tick_labels(&self) -> Vec<&str> {
        self.ticks.iter().map(|t| t.label()).collect()
    }

    /**
    Cumulative distance along the sampled k-points, starting at 0.
    Useful as a plotting abscissa that respects segment lengths.
    */
    pub fn linear_k(&self) -> Vec<f64> {
        let mut total = 0.0;
        let mut distances = Vec::with_capacity(self.kpoints.len());
        if let Some(first) = self.kpoints.first() {
            let mut prev = first;
            for k in self.kpoints.iter() {
                total += (k - prev).norm();
                distances.push(total);
                prev = k;
            }
        }
        distances
    }
}
