/*!
Text formats: CASTEP-style `.bands` export of sampled bands and the
`BS_KPOINT_PATH` block of `.cell` files.
*/
pub mod bands;
pub mod cell;
pub mod general;

use std::{fs, path::Path};

use tracing::info;

use self::bands::BandsFile;
use crate::error::TaskError;

/// Write `export` to `filepath`, replacing any existing file.
pub fn write_bands_file<P: AsRef<Path>>(filepath: P, export: &BandsFile) -> Result<(), TaskError> {
    fs::write(filepath.as_ref(), export.to_string())?;
    info!(
        file = %filepath.as_ref().display(),
        kpoints = export.num_kpts(),
        bands = export.num_bands(),
        "wrote band export"
    );
    Ok(())
}

pub fn read_bands_file<P: AsRef<Path>>(filepath: P) -> Result<BandsFile, TaskError> {
    let text = fs::read_to_string(filepath)?;
    Ok(BandsFile::read(&text)?)
}
