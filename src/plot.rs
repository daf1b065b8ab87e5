/*!
Band-structure line plot: x is the k-point index, one line per band, and a
vertical guide line at every tick.
*/
use std::path::Path;

use ndarray_stats::QuantileExt;
use plotters::prelude::*;
use tracing::info;

use crate::{bands::BandEigenvalues, error::PlotError, kpath::SampledPath};

const PLOT_SIZE: (u32, u32) = (1080, 720);
/// Fraction of the energy window added above and below the bands.
const Y_PADDING: f64 = 0.05;

/**
Render `bands` along `path` as an SVG file.
# Arguments:
  * `path`: supplies the tick indices and labels
  * `bands`: eigenvalue table, one row per k-point of `path`
  * `svg_file`: output file
*/
pub fn plot_bands<P: AsRef<Path>>(
    path: &SampledPath,
    bands: &BandEigenvalues,
    svg_file: P,
) -> Result<(), PlotError> {
    if bands.is_empty() {
        return Err(PlotError::EmptyBands);
    }
    let (y_min, y_max) = energy_window(bands)?;
    let num_kpts = bands.num_kpoints();
    let x_max = num_kpts.saturating_sub(1).max(1) as i32;

    let root = SVGBackend::new(svg_file.as_ref(), PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(backend_err)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0..x_max, y_min..y_max)
        .map_err(backend_err)?;

    let ticks = path.ticks();
    let tick_label = |x: &i32| -> String {
        ticks
            .iter()
            .filter(|t| t.index() as i32 == *x)
            .map(|t| t.label())
            .collect::<Vec<&str>>()
            .join("|")
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(num_kpts)
        .x_label_formatter(&tick_label)
        .y_desc("Energy (eV)")
        .draw()
        .map_err(backend_err)?;

    for nth in 0..bands.num_bands() {
        let band = bands.band(nth);
        chart
            .draw_series(LineSeries::new(
                band.iter().enumerate().map(|(i, e)| (i as i32, *e)),
                &Palette99::pick(nth),
            ))
            .map_err(backend_err)?;
    }
    chart
        .draw_series(ticks.iter().map(|t| {
            let x = t.index() as i32;
            PathElement::new(vec![(x, y_min), (x, y_max)], &BLACK)
        }))
        .map_err(backend_err)?;
    root.present().map_err(backend_err)?;
    info!(file = %svg_file.as_ref().display(), "band plot written");
    Ok(())
}

fn backend_err<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::Backend(e.to_string())
}

/// Energy range of all bands, padded; flat bands get a unit window.
fn energy_window(bands: &BandEigenvalues) -> Result<(f64, f64), PlotError> {
    let energies = bands.energies();
    let e_min = *energies.min().map_err(|_| PlotError::InvalidEnergies)?;
    let e_max = *energies.max().map_err(|_| PlotError::InvalidEnergies)?;
    let span = e_max - e_min;
    if span <= f64::EPSILON {
        return Ok((e_min - 0.5, e_max + 0.5));
    }
    Ok((e_min - Y_PADDING * span, e_max + Y_PADDING * span))
}

#[cfg(test)]
mod test {
    use std::fs;

    use approx::assert_relative_eq;
    use ndarray::{array, Array2};

    use super::{energy_window, plot_bands};
    use crate::bands::{band_compute::sample_bands, BandEigenvalues};
    use crate::error::PlotError;
    use crate::kpath::{kpath_compute::build_path, kpath_util::graphene_path};
    use crate::model::{tight_binding::TightBinding, CARBON_ONSITE, GRAPHENE_HOPPING};

    #[test]
    fn test_energy_window() {
        let bands = BandEigenvalues::new(array![[-1.0, 1.0], [-2.0, 3.0]]);
        let (lo, hi) = energy_window(&bands).unwrap();
        assert_relative_eq!(lo, -2.25, epsilon = 1e-12);
        assert_relative_eq!(hi, 3.25, epsilon = 1e-12);
        let flat = BandEigenvalues::new(array![[4.0], [4.0]]);
        assert_eq!(energy_window(&flat).unwrap(), (3.5, 4.5));
        let nan = BandEigenvalues::new(array![[f64::NAN, 1.0]]);
        assert!(matches!(
            energy_window(&nan),
            Err(PlotError::InvalidEnergies)
        ));
    }

    #[test]
    fn test_plot_graphene_bands() {
        let path = build_path(&graphene_path(), 120).unwrap();
        let model = TightBinding::graphene(CARBON_ONSITE, GRAPHENE_HOPPING);
        let bands = sample_bands(&path, &model).unwrap();
        let file =
            std::env::temp_dir().join(format!("tbbands_plot_{}.svg", std::process::id()));
        plot_bands(&path, &bands, &file).unwrap();
        let svg = fs::read_to_string(&file).unwrap();
        assert!(svg.contains("<svg"));
        let compact: String = svg.split_whitespace().collect();
        assert!(compact.contains(">K<"));
        assert!(compact.contains(">M<"));
        let _ = fs::remove_file(&file);
    }

    #[test]
    fn test_plot_rejects_empty() {
        let path = build_path(&graphene_path(), 1).unwrap();
        let bands = BandEigenvalues::new(Array2::zeros((0, 0)));
        let file =
            std::env::temp_dir().join(format!("tbbands_plot_empty_{}.svg", std::process::id()));
        assert!(matches!(
            plot_bands(&path, &bands, &file),
            Err(PlotError::EmptyBands)
        ));
    }
}
