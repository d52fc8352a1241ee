pub mod convert;
pub mod displace;
pub mod rederive;
pub mod subtract;

use crate::error::{CliError, Result};
use std::path::Path;
use tracing::{info, warn};
use zmatrix::core::io::traits::StructureFile;
use zmatrix::core::io::xyz::XyzFile;
use zmatrix::core::io::zmat::ZMatrixFile;
use zmatrix::core::models::molecule::Molecule;
use zmatrix::core::zmatrix::ZMatrix;

fn read_zmatrices(path: &Path) -> Result<Vec<ZMatrix>> {
    info!("Loading Z-matrices from {:?}", path);
    let zmatrices = ZMatrixFile::read_from_path(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    if zmatrices.is_empty() {
        return Err(CliError::Argument(format!(
            "'{}' contains no Z-matrix",
            path.display()
        )));
    }
    Ok(zmatrices)
}

fn read_first_zmatrix(path: &Path) -> Result<ZMatrix> {
    let mut zmatrices = read_zmatrices(path)?;
    if zmatrices.len() > 1 {
        warn!(
            "'{}' holds {} Z-matrices; only the first is used.",
            path.display(),
            zmatrices.len()
        );
    }
    Ok(zmatrices.swap_remove(0))
}

fn write_zmatrices(zmatrices: &[ZMatrix], path: &Path) -> Result<()> {
    info!("Writing {} Z-matrix block(s) to {:?}", zmatrices.len(), path);
    ZMatrixFile::write_all_to_path(zmatrices, path).map_err(|e| CliError::FileWriting {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

fn write_molecules(molecules: &[Molecule], path: &Path) -> Result<()> {
    info!("Writing {} structure(s) to {:?}", molecules.len(), path);
    XyzFile::write_all_to_path(molecules, path).map_err(|e| CliError::FileWriting {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

fn is_xyz(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xyz"))
}
