use std::f64::consts::PI;

use na::{Complex, DMatrix, SymmetricEigen, Vector3};

use crate::bands::Eigensolver;
use crate::error::ModelError;

const EIGEN_EPS: f64 = 1.0e-14;
const EIGEN_MAX_ITER: usize = 10_000;

/**
One hopping term t_ij(R).
# Field:
  * from: usize - orbital i in the home cell
  * to: usize - orbital j in the cell at `offset`
  * offset: [i32; 3] - lattice vector R in units of the primitive vectors
  * value: f64 - hopping energy in eV
*/
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hopping {
    from: usize,
    to: usize,
    offset: [i32; 3],
    value: f64,
}

impl Hopping {
    pub fn from(&self) -> usize {
        self.from
    }

    pub fn to(&self) -> usize {
        self.to
    }

    pub fn offset(&self) -> [i32; 3] {
        self.offset
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    fn is_onsite(&self) -> bool {
        self.from == self.to && self.offset == [0, 0, 0]
    }
}

/**
Orthogonal tight-binding model. Each stored hopping also contributes its
Hermitian conjugate, so a bond is listed once.
*/
#[derive(Debug, Clone, PartialEq)]
pub struct TightBinding {
    onsite: Vec<f64>,
    hoppings: Vec<Hopping>,
}

impl TightBinding {
    pub fn new(onsite: Vec<f64>) -> Self {
        Self {
            onsite,
            hoppings: vec![],
        }
    }

    /**
    Two-orbital graphene cell. With a1 = (3/2, √3/2)·a and a2 = (3/2, -√3/2)·a
    and the B atom at (a, 0), atom A bonds to B in the home cell and in the
    cells at -a1 and -a2.
    */
    pub fn graphene(onsite: f64, hopping: f64) -> Self {
        let mut model = Self::new(vec![onsite; 2]);
        for offset in [[0, 0, 0], [-1, 0, 0], [0, -1, 0]] {
            model.push_hopping(0, 1, offset, hopping);
        }
        model
    }

    /// Single orbital on a square lattice.
    pub fn square(onsite: f64, hopping: f64) -> Self {
        let mut model = Self::new(vec![onsite]);
        model.push_hopping(0, 0, [1, 0, 0], hopping);
        model.push_hopping(0, 0, [0, 1, 0], hopping);
        model
    }

    /// Single orbital on a 1-D chain along the first lattice vector.
    pub fn chain(onsite: f64, hopping: f64) -> Self {
        let mut model = Self::new(vec![onsite]);
        model.push_hopping(0, 0, [1, 0, 0], hopping);
        model
    }

    pub fn num_orbitals(&self) -> usize {
        self.onsite.len()
    }

    pub fn onsite(&self) -> &[f64] {
        self.onsite.as_ref()
    }

    pub fn hoppings(&self) -> &[Hopping] {
        self.hoppings.as_ref()
    }

    pub fn add_hopping(
        &mut self,
        from: usize,
        to: usize,
        offset: [i32; 3],
        value: f64,
    ) -> Result<&mut Self, ModelError> {
        let num_orbitals = self.num_orbitals();
        if let Some(&orbital) = [from, to].iter().find(|&&o| o >= num_orbitals) {
            return Err(ModelError::OrbitalOutOfRange {
                orbital,
                num_orbitals,
            });
        }
        self.push_hopping(from, to, offset, value);
        Ok(self)
    }

    fn push_hopping(&mut self, from: usize, to: usize, offset: [i32; 3], value: f64) {
        self.hoppings.push(Hopping {
            from,
            to,
            offset,
            value,
        });
    }

    /// H_ij(k) = Σ_R t_ij(R) exp(2πi k·R), k fractional.
    pub fn bloch_hamiltonian(&self, k: &Vector3<f64>) -> DMatrix<Complex<f64>> {
        let n = self.num_orbitals();
        let mut h = DMatrix::<Complex<f64>>::from_fn(n, n, |i, j| {
            if i == j {
                Complex::new(self.onsite[i], 0.0)
            } else {
                Complex::new(0.0, 0.0)
            }
        });
        self.hoppings.iter().for_each(|hop| {
            if hop.is_onsite() {
                h[(hop.from, hop.from)] += Complex::new(hop.value, 0.0);
                return;
            }
            let r = Vector3::new(
                hop.offset[0] as f64,
                hop.offset[1] as f64,
                hop.offset[2] as f64,
            );
            let term = Complex::from_polar(hop.value, 2.0 * PI * k.dot(&r));
            h[(hop.from, hop.to)] += term;
            h[(hop.to, hop.from)] += term.conj();
        });
        h
    }
}

impl Eigensolver for TightBinding {
    type Error = ModelError;

    /// Ascending eigenvalues of the Hermitian Bloch matrix.
    fn eigenvalues_at(&self, k: &Vector3<f64>) -> Result<Vec<f64>, ModelError> {
        // the eigen-decomposition needs a non-empty matrix
        if self.onsite.is_empty() {
            return Err(ModelError::NoOrbitals);
        }
        let h = self.bloch_hamiltonian(k);
        let eigen = SymmetricEigen::try_new(h, EIGEN_EPS, EIGEN_MAX_ITER).ok_or(
            ModelError::NotConverged {
                k1: k.x,
                k2: k.y,
                k3: k.z,
            },
        )?;
        let mut values: Vec<f64> = eigen.eigenvalues.iter().copied().collect();
        values.sort_by(|a, b| a.total_cmp(b));
        Ok(values)
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;
    use na::Vector3;

    use super::TightBinding;
    use crate::bands::Eigensolver;
    use crate::error::ModelError;
    use crate::model::{CARBON_ONSITE, GRAPHENE_HOPPING};

    #[test]
    fn test_graphene_gamma_and_k() {
        let model = TightBinding::graphene(CARBON_ONSITE, GRAPHENE_HOPPING);
        let gamma = model.eigenvalues_at(&Vector3::zeros()).unwrap();
        assert_relative_eq!(gamma[0], -8.1, epsilon = 1e-10);
        assert_relative_eq!(gamma[1], 8.1, epsilon = 1e-10);
        let k = model
            .eigenvalues_at(&Vector3::new(2.0 / 3.0, 1.0 / 3.0, 0.0))
            .unwrap();
        assert_relative_eq!(k[0], 0.0, epsilon = 1e-10);
        assert_relative_eq!(k[1], 0.0, epsilon = 1e-10);
        let m = model.eigenvalues_at(&Vector3::new(0.5, 0.5, 0.0)).unwrap();
        assert_relative_eq!(m[0], -2.7, epsilon = 1e-10);
        assert_relative_eq!(m[1], 2.7, epsilon = 1e-10);
    }

    #[test]
    fn test_bloch_hamiltonian_is_hermitian() {
        let model = TightBinding::graphene(0.3, GRAPHENE_HOPPING);
        let h = model.bloch_hamiltonian(&Vector3::new(0.13, 0.71, 0.0));
        let diff = &h - h.adjoint();
        assert!(diff.norm() < 1e-12);
        assert_relative_eq!(h[(0, 0)].re, 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_square_dispersion() {
        let model = TightBinding::square(4.0, -1.0);
        let at = |k: [f64; 3]| model.eigenvalues_at(&Vector3::from(k)).unwrap()[0];
        assert_relative_eq!(at([0.0, 0.0, 0.0]), 0.0, epsilon = 1e-12);
        assert_relative_eq!(at([0.5, 0.0, 0.0]), 4.0, epsilon = 1e-12);
        assert_relative_eq!(at([0.5, 0.5, 0.0]), 8.0, epsilon = 1e-12);
    }

    #[test]
    fn test_chain_dispersion() {
        let model = TightBinding::chain(0.0, -2.7);
        let e = model.eigenvalues_at(&Vector3::new(0.25, 0.0, 0.0)).unwrap();
        assert_eq!(e.len(), 1);
        assert_relative_eq!(e[0], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_add_hopping_checks_orbitals() {
        let mut model = TightBinding::new(vec![0.0, 0.0]);
        assert!(model.add_hopping(0, 1, [0, 0, 0], -1.0).is_ok());
        assert_eq!(
            model.add_hopping(0, 2, [1, 0, 0], -1.0),
            Err(ModelError::OrbitalOutOfRange {
                orbital: 2,
                num_orbitals: 2
            })
        );
        assert_eq!(model.hoppings().len(), 1);
    }

    #[test]
    fn test_empty_model_rejected() {
        let model = TightBinding::new(vec![]);
        assert_eq!(
            model.eigenvalues_at(&Vector3::zeros()),
            Err(ModelError::NoOrbitals)
        );
    }

    #[test]
    fn test_onsite_hopping_added_once() {
        let mut model = TightBinding::new(vec![1.0]);
        model.add_hopping(0, 0, [0, 0, 0], 0.5).unwrap();
        let e = model.eigenvalues_at(&Vector3::zeros()).unwrap();
        assert_relative_eq!(e[0], 1.5, epsilon = 1e-12);
    }
}
