//! Band-structure k-paths for tight-binding models.
//!
//! `kpath` samples a piecewise-linear path through high-symmetry points,
//! `bands` evaluates an eigensolver along it, and `plot`/`parser` hand the
//! result to SVG plots and `.bands` exports.
extern crate nalgebra as na;

pub mod bands;
pub mod config;
pub mod error;
pub mod kpath;
pub mod model;
pub mod parser;
pub mod plot;
pub mod telemetry;

pub use bands::{
    band_compute::{
        sample_bands, sample_bands_cancellable, sample_bands_parallel,
        sample_bands_parallel_cancellable,
    },
    BandEigenvalues, Eigensolver,
};
pub use error::{KPathError, ModelError, ParseError, PlotError, TaskError};
pub use kpath::{kpath_compute::build_path, HighSymmetryPoint, PathSegment, SampledPath, Tick};
