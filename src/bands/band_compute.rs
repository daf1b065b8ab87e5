/// Evaluation of band energies along a sampled k-path
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use ndarray::{Array2, ArrayView1};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::KPathError;
use crate::kpath::SampledPath;

use super::{BandEigenvalues, Eigensolver};

/**
Evaluate the eigensolver at every k-point of `path`, in order.
# Arguments:
  * `path`: output of `build_path`.
  * `solver`: the eigenvalue capability, called exactly once per k-point.
# Returns:
  * `BandEigenvalues` with row `i` belonging to `path.kpoints()[i]`.
# Notes:
  * The first failing k-point aborts the whole call; nothing is retried or substituted.
*/
pub fn sample_bands<S>(path: &SampledPath, solver: &S) -> Result<BandEigenvalues, KPathError>
where
    S: Eigensolver + ?Sized,
{
    sample_bands_cancellable(path, solver, None)
}

/**
Same as `sample_bands`, but stops issuing eigensolver calls once `cancel` is set.
Partial results are discarded.
*/
pub fn sample_bands_cancellable<S>(
    path: &SampledPath,
    solver: &S,
    cancel: Option<&AtomicBool>,
) -> Result<BandEigenvalues, KPathError>
where
    S: Eigensolver + ?Sized,
{
    let start = Instant::now();
    info!(num_kpoints = path.len(), "sampling bands");
    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(path.len());
    for (index, k) in path.kpoints().iter().enumerate() {
        if is_cancelled(cancel) {
            return Err(KPathError::Cancelled { completed: index });
        }
        let eigen_values = solver
            .eigenvalues_at(k)
            .map_err(|e| KPathError::BandEvaluation {
                index,
                source: Box::new(e),
            })?;
        debug!(
            index,
            k1 = k.x,
            k2 = k.y,
            k3 = k.z,
            bands = eigen_values.len(),
            "k-point solved"
        );
        rows.push(eigen_values);
    }
    let bands = assemble_rows(rows)?;
    info!(
        num_kpoints = bands.num_kpoints(),
        num_bands = bands.num_bands(),
        "bands sampled in {:.2?}",
        start.elapsed()
    );
    Ok(bands)
}

/**
Rayon-parallel variant of `sample_bands`. Eigensolver calls are independent;
rows are put back in k-point order and the lowest failing index is reported.
*/
pub fn sample_bands_parallel<S>(
    path: &SampledPath,
    solver: &S,
) -> Result<BandEigenvalues, KPathError>
where
    S: Eigensolver + Sync + ?Sized,
{
    sample_bands_parallel_cancellable(path, solver, None)
}

pub fn sample_bands_parallel_cancellable<S>(
    path: &SampledPath,
    solver: &S,
    cancel: Option<&AtomicBool>,
) -> Result<BandEigenvalues, KPathError>
where
    S: Eigensolver + Sync + ?Sized,
{
    let start = Instant::now();
    info!(
        num_kpoints = path.len(),
        threads = rayon::current_num_threads(),
        "sampling bands in parallel"
    );
    // None marks a k-point skipped after cancellation
    let results: Vec<Option<Result<Vec<f64>, S::Error>>> = path
        .kpoints()
        .par_iter()
        .map(|k| {
            if is_cancelled(cancel) {
                None
            } else {
                Some(solver.eigenvalues_at(k))
            }
        })
        .collect();
    let bands = assemble_rows(collect_in_order(results)?)?;
    info!(
        num_kpoints = bands.num_kpoints(),
        num_bands = bands.num_bands(),
        "bands sampled in {:.2?}",
        start.elapsed()
    );
    Ok(bands)
}

fn is_cancelled(cancel: Option<&AtomicBool>) -> bool {
    cancel.map_or(false, |flag| flag.load(Ordering::Relaxed))
}

/**
Stack per-k-point eigenvalue vectors into the (num_kpoints, num_bands) table.
The first row fixes the band count.
*/
fn assemble_rows(rows: Vec<Vec<f64>>) -> Result<BandEigenvalues, KPathError> {
    let num_bands = rows.first().map_or(0, |row| row.len());
    if let Some((index, row)) = rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != num_bands)
    {
        return Err(KPathError::InconsistentBandCount {
            index,
            expected: num_bands,
            found: row.len(),
        });
    }
    let mut energies = Array2::<f64>::zeros((rows.len(), num_bands));
    energies
        .rows_mut()
        .into_iter()
        .zip(rows.iter())
        .for_each(|(mut dst, src)| dst.assign(&ArrayView1::from(src.as_slice())));
    Ok(BandEigenvalues::new(energies))
}

/**
Walk per-k-point results in path order. The first failure or skipped k-point
decides the error, so `completed` counts only the rows before it.
*/
fn collect_in_order<E>(
    results: Vec<Option<Result<Vec<f64>, E>>>,
) -> Result<Vec<Vec<f64>>, KPathError>
where
    E: std::error::Error + Send + Sync + 'static,
{
    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(results.len());
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Some(Ok(eigen_values)) => rows.push(eigen_values),
            Some(Err(e)) => {
                return Err(KPathError::BandEvaluation {
                    index,
                    source: Box::new(e),
                })
            }
            None => return Err(KPathError::Cancelled { completed: index }),
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;
    use std::f64::consts::PI;
    use std::fmt;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use approx::assert_relative_eq;
    use na::Vector3;

    use super::{
        collect_in_order, sample_bands, sample_bands_cancellable, sample_bands_parallel,
        sample_bands_parallel_cancellable,
    };
    use crate::bands::Eigensolver;
    use crate::error::KPathError;
    use crate::kpath::{kpath_compute::build_path, kpath_util::graphene_path, SampledPath, Tick};

    #[derive(Debug)]
    struct NoConvergence;

    impl fmt::Display for NoConvergence {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "no convergence")
        }
    }

    impl std::error::Error for NoConvergence {}

    /// Two-band cosine dispersion, +/- (1 + cos 2πk1)
    fn two_band(k: &Vector3<f64>) -> Result<Vec<f64>, NoConvergence> {
        let e = 1.0 + (2.0 * PI * k.x).cos();
        Ok(vec![-e, e])
    }

    fn line_path(n: usize) -> SampledPath {
        let kpoints = (0..n)
            .map(|i| Vector3::new(i as f64 / n as f64, 0.0, 0.0))
            .collect();
        SampledPath::new(kpoints, vec![Tick::new(0, "G")], vec![n])
    }

    #[test]
    fn test_order_and_length_preserved() {
        let path = build_path(&graphene_path(), 60).unwrap();
        let bands = sample_bands(&path, &two_band).unwrap();
        assert_eq!(bands.num_kpoints(), path.len());
        assert_eq!(bands.num_bands(), 2);
        path.kpoints().iter().enumerate().for_each(|(i, k)| {
            let expected = 1.0 + (2.0 * PI * k.x).cos();
            assert_relative_eq!(bands.at_kpoint(i)[1], expected, epsilon = 1e-12);
            assert_relative_eq!(bands.at_kpoint(i)[0], -expected, epsilon = 1e-12);
        });
    }

    #[test]
    fn test_one_call_per_kpoint() {
        struct Counting(RefCell<usize>);
        impl Eigensolver for Counting {
            type Error = NoConvergence;
            fn eigenvalues_at(&self, _k: &Vector3<f64>) -> Result<Vec<f64>, NoConvergence> {
                *self.0.borrow_mut() += 1;
                Ok(vec![0.0])
            }
        }
        let path = line_path(17);
        let solver = Counting(RefCell::new(0));
        sample_bands(&path, &solver).unwrap();
        assert_eq!(*solver.0.borrow(), 17);
    }

    #[test]
    fn test_failure_reports_index_and_stops() {
        let calls = AtomicUsize::new(0);
        let failing = |k: &Vector3<f64>| -> Result<Vec<f64>, NoConvergence> {
            calls.fetch_add(1, Ordering::SeqCst);
            if k.x >= 0.5 {
                Err(NoConvergence)
            } else {
                Ok(vec![k.x])
            }
        };
        let path = line_path(10);
        match sample_bands(&path, &failing) {
            Err(KPathError::BandEvaluation { index, source }) => {
                assert_eq!(index, 5);
                assert_eq!(source.to_string(), "no convergence");
            }
            other => panic!("unexpected result {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_inconsistent_band_count() {
        let ragged = |k: &Vector3<f64>| -> Result<Vec<f64>, NoConvergence> {
            if k.x > 0.25 {
                Ok(vec![0.0; 3])
            } else {
                Ok(vec![0.0; 2])
            }
        };
        let result = sample_bands(&line_path(8), &ragged);
        assert!(matches!(
            result,
            Err(KPathError::InconsistentBandCount {
                index: 3,
                expected: 2,
                found: 3
            })
        ));
    }

    #[test]
    fn test_parallel_matches_serial() {
        let path = build_path(&graphene_path(), 301).unwrap();
        let serial = sample_bands(&path, &two_band).unwrap();
        let parallel = sample_bands_parallel(&path, &two_band).unwrap();
        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_parallel_reports_lowest_failing_index() {
        let failing = |k: &Vector3<f64>| -> Result<Vec<f64>, NoConvergence> {
            if k.x > 0.3 {
                Err(NoConvergence)
            } else {
                Ok(vec![k.x])
            }
        };
        let result = sample_bands_parallel(&line_path(100), &failing);
        assert!(matches!(
            result,
            Err(KPathError::BandEvaluation { index: 31, .. })
        ));
    }

    #[test]
    fn test_cancelled_before_start() {
        let cancel = AtomicBool::new(true);
        let path = line_path(5);
        assert!(matches!(
            sample_bands_cancellable(&path, &two_band, Some(&cancel)),
            Err(KPathError::Cancelled { completed: 0 })
        ));
        assert!(matches!(
            sample_bands_parallel_cancellable(&path, &two_band, Some(&cancel)),
            Err(KPathError::Cancelled { completed: 0 })
        ));
    }

    #[test]
    fn test_cancelled_midway() {
        let cancel = AtomicBool::new(false);
        let stopping = |k: &Vector3<f64>| -> Result<Vec<f64>, NoConvergence> {
            if k.x >= 0.2 {
                cancel.store(true, Ordering::SeqCst);
            }
            Ok(vec![k.x])
        };
        let result = sample_bands_cancellable(&line_path(10), &stopping, Some(&cancel));
        assert!(matches!(result, Err(KPathError::Cancelled { completed: 3 })));
    }

    #[test]
    fn test_cancelled_count_stops_at_first_skipped() {
        // rows 3 and 4 finished on other threads after row 2 was skipped
        let results: Vec<Option<Result<Vec<f64>, NoConvergence>>> = vec![
            Some(Ok(vec![0.0])),
            Some(Ok(vec![0.1])),
            None,
            Some(Ok(vec![0.3])),
            Some(Ok(vec![0.4])),
        ];
        assert!(matches!(
            collect_in_order(results),
            Err(KPathError::Cancelled { completed: 2 })
        ));
        let failed: Vec<Option<Result<Vec<f64>, NoConvergence>>> =
            vec![Some(Ok(vec![0.0])), Some(Err(NoConvergence)), None];
        assert!(matches!(
            collect_in_order(failed),
            Err(KPathError::BandEvaluation { index: 1, .. })
        ));
    }

    #[test]
    fn test_empty_path() {
        let path = build_path(&graphene_path(), 1).unwrap();
        let bands = sample_bands(&path, &two_band).unwrap();
        assert!(bands.is_empty());
        assert_eq!(bands.num_kpoints(), 0);
    }
}
