pub mod band_compute;

use na::Vector3;
use ndarray::{Array2, ArrayView1};

/**
Capability returning the band energies at a fractional k-point.
Closures `Fn(&Vector3<f64>) -> Result<Vec<f64>, E>` implement it, so analytic
dispersions can stand in for a real diagonalisation.
*/
pub trait Eigensolver {
    type Error: std::error::Error + Send + Sync + 'static;
    fn eigenvalues_at(&self, k: &Vector3<f64>) -> Result<Vec<f64>, Self::Error>;
}

impl<F, E> Eigensolver for F
where
    F: Fn(&Vector3<f64>) -> Result<Vec<f64>, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    type Error = E;
    fn eigenvalues_at(&self, k: &Vector3<f64>) -> Result<Vec<f64>, E> {
        self(k)
    }
}

/**
Eigenvalue table in k-point order.
# Field:
  * energies: Array2<f64> - shape (num_kpoints, num_bands)
*/
#[derive(Debug, Clone, PartialEq)]
pub struct BandEigenvalues {
    energies: Array2<f64>,
}

impl BandEigenvalues {
    pub fn new(energies: Array2<f64>) -> Self {
        Self { energies }
    }

    pub fn energies(&self) -> &Array2<f64> {
        &self.energies
    }

    pub fn num_kpoints(&self) -> usize {
        self.energies.nrows()
    }

    pub fn num_bands(&self) -> usize {
        self.energies.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }

    /// Eigenvalues at the `nth` k-point.
    pub fn at_kpoint(&self, nth: usize) -> ArrayView1<f64> {
        self.energies.row(nth)
    }

    /// One band across the whole path.
    pub fn band(&self, nth: usize) -> ArrayView1<f64> {
        self.energies.column(nth)
    }
}
