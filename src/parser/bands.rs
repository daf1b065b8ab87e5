use std::fmt;

use na::Vector3;
use ndarray::{Array2, ArrayView1};
use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, multispace1},
    multi::{count, many0},
    sequence::{preceded, terminated, tuple},
    IResult,
};

use super::general::{decimal, float, header_count, label};
use crate::{
    bands::BandEigenvalues,
    error::ParseError,
    kpath::{SampledPath, Tick},
};

/**
Text export of a sampled band structure, laid out like CASTEP's `<seed>.bands`:
a header with the counts, the tick table, then one entry per k-point holding its
fractional coordinate, its linear distance along the path and its band energies.
*/
#[derive(Debug, Clone, PartialEq)]
pub struct BandsFile {
    ticks: Vec<Tick>,
    ///! Length = number of k-points
    kpoints: Vec<Vector3<f64>>,
    ///! Length = number of k-points
    linear_k: Vec<f64>,
    ///! shape (num_kpoints, num_bands)
    energies: Array2<f64>,
}

impl BandsFile {
    pub fn new(path: &SampledPath, bands: &BandEigenvalues) -> Self {
        Self {
            ticks: path.ticks().to_vec(),
            kpoints: path.kpoints().to_vec(),
            linear_k: path.linear_k(),
            energies: bands.energies().clone(),
        }
    }

    pub fn ticks(&self) -> &[Tick] {
        self.ticks.as_ref()
    }

    pub fn kpoints(&self) -> &[Vector3<f64>] {
        self.kpoints.as_ref()
    }

    pub fn linear_k(&self) -> &[f64] {
        self.linear_k.as_ref()
    }

    pub fn energies(&self) -> &Array2<f64> {
        &self.energies
    }

    pub fn num_kpts(&self) -> usize {
        self.energies.nrows()
    }

    pub fn num_bands(&self) -> usize {
        self.energies.ncols()
    }

    /**
    Read a `.bands` export back, checking the declared counts against the entries found.
    */
    pub fn read(text: &str) -> Result<Self, ParseError> {
        let (_, raw) = Self::parse(text).map_err(|e| ParseError::Syntax {
            what: ".bands file",
            detail: e.to_string(),
        })?;
        let RawBands {
            num_kpts,
            num_bands,
            num_ticks,
            ticks,
            entries,
        } = raw;
        if ticks.len() != num_ticks {
            return Err(ParseError::CountMismatch {
                what: "tick table",
                declared: num_ticks,
                found: ticks.len(),
            });
        }
        if entries.len() != num_kpts {
            return Err(ParseError::CountMismatch {
                what: "k-point list",
                declared: num_kpts,
                found: entries.len(),
            });
        }
        if let Some(entry) = entries.iter().find(|e| e.energies.len() != num_bands) {
            return Err(ParseError::CountMismatch {
                what: "band energies of a k-point",
                declared: num_bands,
                found: entry.energies.len(),
            });
        }
        let mut energies = Array2::<f64>::zeros((num_kpts, num_bands));
        energies
            .rows_mut()
            .into_iter()
            .zip(entries.iter())
            .for_each(|(mut row, entry)| {
                row.assign(&ArrayView1::from(entry.energies.as_slice()))
            });
        Ok(Self {
            ticks,
            kpoints: entries.iter().map(|e| e.coordinate).collect(),
            linear_k: entries.iter().map(|e| e.linear_k).collect(),
            energies,
        })
    }

    fn parse(data: &str) -> IResult<&str, RawBands> {
        let (i, _) = multispace0(data)?;
        let (i, num_kpts) = header_count("Number of k-points")(i)?;
        let (i, num_bands) = header_count("Number of bands")(i)?;
        let (i, num_ticks) = header_count("Number of ticks")(i)?;
        let (i, ticks) = count(Self::parse_tick, num_ticks)(i)?;
        let (i, entries) = many0(Self::parse_kpoint_entry)(i)?;
        Ok((
            i,
            RawBands {
                num_kpts,
                num_bands,
                num_ticks,
                ticks,
                entries,
            },
        ))
    }

    fn parse_tick(data: &str) -> IResult<&str, Tick> {
        let (i, (index, name)) = tuple((
            preceded(tuple((tag("Tick"), multispace1)), decimal),
            terminated(preceded(multispace1, label), multispace0),
        ))(data)?;
        Ok((i, Tick::new(index, name)))
    }

    fn parse_kpoint_entry(data: &str) -> IResult<&str, KPointEntry> {
        let (i, (_nth, coords, linear_k)) = tuple((
            preceded(tuple((tag("K-point"), multispace0)), decimal),
            count(preceded(multispace1, float), 3),
            preceded(multispace1, float),
        ))(data)?;
        let (i, energies) = preceded(
            tuple((multispace0, tag("Band energies"))),
            many0(preceded(multispace0, float)),
        )(i)?;
        let (i, _) = multispace0(i)?;
        Ok((
            i,
            KPointEntry {
                coordinate: Vector3::new(coords[0], coords[1], coords[2]),
                linear_k,
                energies,
            },
        ))
    }
}

impl fmt::Display for BandsFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of k-points {}", self.num_kpts())?;
        writeln!(f, "Number of bands {}", self.num_bands())?;
        writeln!(f, "Number of ticks {}", self.ticks.len())?;
        for tick in self.ticks.iter() {
            // labels are single tokens in the file
            let name: String = tick
                .label()
                .chars()
                .map(|c| if c.is_whitespace() { '_' } else { c })
                .collect();
            writeln!(f, "Tick {} {}", tick.index(), name)?;
        }
        for (nth, ((k, dist), row)) in self
            .kpoints
            .iter()
            .zip(self.linear_k.iter())
            .zip(self.energies.rows())
            .enumerate()
        {
            writeln!(
                f,
                "K-point {} {:.8} {:.8} {:.8} {:.8}",
                nth + 1,
                k.x,
                k.y,
                k.z,
                dist
            )?;
            writeln!(f, "Band energies")?;
            for e in row.iter() {
                writeln!(f, "{:>16.8}", e)?;
            }
        }
        Ok(())
    }
}

struct RawBands {
    num_kpts: usize,
    num_bands: usize,
    num_ticks: usize,
    ticks: Vec<Tick>,
    entries: Vec<KPointEntry>,
}

struct KPointEntry {
    coordinate: Vector3<f64>,
    linear_k: f64,
    energies: Vec<f64>,
}
