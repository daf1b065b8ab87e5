/**
Error types of the crate. Each concern gets its own enum; the task runner
wraps them all in `TaskError`.
*/
use thiserror::Error;

/// Boxed error coming out of an external eigensolver.
pub type SolverError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum KPathError {
    #[error("the sample budget must be a positive integer, got {0}")]
    InvalidSampleBudget(usize),
    #[error("the k-path has no finite positive length ({num_points} points)")]
    DegeneratePath { num_points: usize },
    #[error("{total_samples} samples cannot be held in memory")]
    SampleOverflow { total_samples: usize },
    #[error("eigensolver failed at k-point #{index}: {source}")]
    BandEvaluation {
        index: usize,
        #[source]
        source: SolverError,
    },
    #[error("k-point #{index} returned {found} eigenvalues, expected {expected}")]
    InconsistentBandCount {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("band sampling cancelled after {completed} k-points")]
    Cancelled { completed: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("model has no orbitals")]
    NoOrbitals,
    #[error("orbital {orbital} is out of range for a model with {num_orbitals} orbitals")]
    OrbitalOutOfRange { orbital: usize, num_orbitals: usize },
    #[error("Hermitian eigen-decomposition did not converge at k = ({k1:.6}, {k2:.6}, {k3:.6})")]
    NotConverged { k1: f64, k2: f64, k3: f64 },
}

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("nothing to plot: the band table is empty")]
    EmptyBands,
    #[error("band energies contain NaN values")]
    InvalidEnergies,
    #[error("plotting backend failure: {0}")]
    Backend(String),
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("failed to parse {what}: {detail}")]
    Syntax { what: &'static str, detail: String },
    #[error("{what} declares {declared} entries but {found} were read")]
    CountMismatch {
        what: &'static str,
        declared: usize,
        found: usize,
    },
}

#[derive(Error, Debug)]
pub enum TaskError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    KPath(#[from] KPathError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Plot(#[from] PlotError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}
