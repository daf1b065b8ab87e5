use std::{fs, path::Path};

use nom::{
    character::complete::{multispace1, one_of, space0},
    combinator::{all_consuming, opt},
    multi::count,
    sequence::{preceded, terminated, tuple},
    IResult,
};

use super::general::{float, label};
use crate::{error::ParseError, error::TaskError, kpath::HighSymmetryPoint};

const PATH_BLOCKS: [&str; 2] = ["bs_kpoint_path", "spectral_kpoint_path"];

/**
Read the high-symmetry points of a CASTEP `.cell` file.
# Arguments:
  * `cell_filepath`: path to the `.cell` file
# Notes:
  * See `parse_kpoint_path_block`.
*/
pub fn read_kpoint_path<P: AsRef<Path>>(
    cell_filepath: P,
) -> Result<Vec<HighSymmetryPoint>, TaskError> {
    let cell_text = fs::read_to_string(cell_filepath)?;
    Ok(parse_kpoint_path_block(&cell_text)?)
}

/**
Parse the `%BLOCK BS_KPOINT_PATH` (or `SPECTRAL_KPOINT_PATH`) block of a `.cell` text.
Each line is `x y z [! label]`; keywords are case-insensitive and points without a
label are named `P<n>` (1-based).
*/
pub fn parse_kpoint_path_block(text: &str) -> Result<Vec<HighSymmetryPoint>, ParseError> {
    let mut lines = text.lines().map(str::trim);
    lines
        .by_ref()
        .find(|line| is_block_marker(line, "%block"))
        .ok_or_else(|| ParseError::Syntax {
            what: "cell file",
            detail: "no BS_KPOINT_PATH block found".to_string(),
        })?;
    let mut points = vec![];
    let mut closed = false;
    for line in lines {
        if is_block_marker(line, "%endblock") {
            closed = true;
            break;
        }
        if line.is_empty() || line.starts_with('!') || line.starts_with('#') {
            continue;
        }
        let (_, (coord, name)) = parse_path_line(line).map_err(|e| ParseError::Syntax {
            what: "k-point path line",
            detail: format!("'{}': {}", line, e),
        })?;
        let name = match name {
            Some(name) => name.to_string(),
            None => format!("P{}", points.len() + 1),
        };
        points.push(HighSymmetryPoint::new(name, [coord[0], coord[1], coord[2]]));
    }
    if !closed {
        return Err(ParseError::Syntax {
            what: "cell file",
            detail: "BS_KPOINT_PATH block is not terminated by %ENDBLOCK".to_string(),
        });
    }
    Ok(points)
}

fn is_block_marker(line: &str, keyword: &str) -> bool {
    let tokens: Vec<String> = line
        .split_whitespace()
        .map(|t| t.to_ascii_lowercase())
        .collect();
    tokens.len() == 2 && tokens[0] == keyword && PATH_BLOCKS.contains(&tokens[1].as_str())
}

fn parse_path_line(line: &str) -> IResult<&str, (Vec<f64>, Option<&str>)> {
    all_consuming(tuple((
        terminated(
            tuple((float, count(preceded(multispace1, float), 2))),
            space0,
        ),
        terminated(
            opt(preceded(tuple((one_of("!#"), space0)), label)),
            space0,
        ),
    )))(line)
    .map(|(i, ((first, rest), name))| {
        let mut coord = vec![first];
        coord.extend(rest);
        (i, (coord, name))
    })
}
