/// Struct for band-structure config in .toml
use std::path::PathBuf;

use serde::Deserialize;
use tracing::info;

use super::TaskProcess;
use crate::{
    bands::{
        band_compute::{sample_bands, sample_bands_parallel},
        BandEigenvalues,
    },
    error::TaskError,
    kpath::{
        kpath_compute::build_path,
        kpath_util::{chain_path, graphene_path, square_path},
        HighSymmetryPoint, SampledPath,
    },
    model::{tight_binding::TightBinding, CARBON_ONSITE, GRAPHENE_HOPPING},
    parser::{bands::BandsFile, cell::read_kpoint_path, write_bands_file},
    plot::plot_bands,
};

/**
Configs of a band-structure task.
# Field:
  * seed: String - output prefix, `<seed>.bands` and `<seed>.svg`
  * total_samples: usize - k-point budget of the path
  * parallel: bool - evaluate k-points with rayon
  * plot: bool - write the SVG plot, default true
  * path_file: Option<String> - `.cell` file holding a BS_KPOINT_PATH block
  * points: Vec<HighSymmetryPoint> - explicit path, used when `path_file` is absent
  * model: ModelConfig - tight-binding model to diagonalise
*/
#[derive(Deserialize, Debug)]
pub struct BandsTask {
    seed: String,
    total_samples: usize,
    #[serde(default)]
    parallel: bool,
    #[serde(default = "default_plot")]
    plot: bool,
    path_file: Option<String>,
    #[serde(default)]
    points: Vec<HighSymmetryPoint>,
    model: ModelConfig,
}

fn default_plot() -> bool {
    true
}

impl BandsTask {
    pub fn seed(&self) -> &str {
        self.seed.as_ref()
    }

    pub fn bands_filename(&self) -> PathBuf {
        PathBuf::from(format!("{}.bands", self.seed))
    }

    pub fn plot_filename(&self) -> PathBuf {
        PathBuf::from(format!("{}.svg", self.seed))
    }

    pub fn total_samples(&self) -> usize {
        self.total_samples
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    pub fn plot(&self) -> bool {
        self.plot
    }

    pub fn path_file(&self) -> Option<&str> {
        self.path_file.as_deref()
    }

    pub fn points(&self) -> &[HighSymmetryPoint] {
        self.points.as_ref()
    }

    pub fn model(&self) -> &ModelConfig {
        &self.model
    }

    /**
    High-symmetry points of the run: the `.cell` block if given, then the explicit
    `points`, and finally the standard path of the model's lattice.
    */
    pub fn high_symmetry_points(&self) -> Result<Vec<HighSymmetryPoint>, TaskError> {
        if let Some(cell_file) = self.path_file() {
            return read_kpoint_path(cell_file);
        }
        if !self.points.is_empty() {
            return Ok(self.points.clone());
        }
        Ok(self.model.kind.standard_path())
    }
}

/// Result of a band-structure task.
#[derive(Debug)]
pub struct BandsOutput {
    pub path: SampledPath,
    pub bands: BandEigenvalues,
    pub bands_file: PathBuf,
    pub plot_file: Option<PathBuf>,
}

impl TaskProcess for BandsTask {
    type Output = BandsOutput;

    fn task_execute(&self) -> Result<BandsOutput, TaskError> {
        let points = self.high_symmetry_points()?;
        info!(
            seed = self.seed(),
            points = points.len(),
            total_samples = self.total_samples,
            "band-structure task"
        );
        let path = build_path(&points, self.total_samples)?;
        let model = self.model.build();
        let bands = if self.parallel {
            sample_bands_parallel(&path, &model)?
        } else {
            sample_bands(&path, &model)?
        };
        let bands_file = self.bands_filename();
        write_bands_file(&bands_file, &BandsFile::new(&path, &bands))?;
        let plot_file = if self.plot {
            let svg = self.plot_filename();
            plot_bands(&path, &bands, &svg)?;
            Some(svg)
        } else {
            None
        };
        Ok(BandsOutput {
            path,
            bands,
            bands_file,
            plot_file,
        })
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Graphene,
    Square,
    Chain,
}

impl ModelKind {
    pub fn standard_path(&self) -> Vec<HighSymmetryPoint> {
        match self {
            ModelKind::Graphene => graphene_path(),
            ModelKind::Square => square_path(),
            ModelKind::Chain => chain_path(),
        }
    }
}

/**
Nearest-neighbour model parameters.
# Field:
  * kind: ModelKind - "graphene", "square" or "chain"
  * onsite: f64 - eV, default 0.0
  * hopping: f64 - eV, default -2.7
*/
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ModelConfig {
    kind: ModelKind,
    #[serde(default = "default_onsite")]
    onsite: f64,
    #[serde(default = "default_hopping")]
    hopping: f64,
}

fn default_onsite() -> f64 {
    CARBON_ONSITE
}

fn default_hopping() -> f64 {
    GRAPHENE_HOPPING
}

impl ModelConfig {
    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn onsite(&self) -> f64 {
        self.onsite
    }

    pub fn hopping(&self) -> f64 {
        self.hopping
    }

    pub fn build(&self) -> TightBinding {
        match self.kind {
            ModelKind::Graphene => TightBinding::graphene(self.onsite, self.hopping),
            ModelKind::Square => TightBinding::square(self.onsite, self.hopping),
            ModelKind::Chain => TightBinding::chain(self.onsite, self.hopping),
        }
    }
}
