use crate::core::models::molecule::Molecule;
use crate::core::zmatrix::ZMatrix;
use crate::engine::builder::ZMatrixBuilder;
use crate::engine::config::EngineConfig;
use crate::engine::converter::{Reconstruction, ZMatrixToCartesianConverter};
use crate::engine::error::ZMatrixError;
use crate::engine::selector::SelectionStrategy;
use tracing::{info, instrument};

/// Builds the Z-matrix of a molecule.
///
/// # Arguments
///
/// * `molecule` - Atoms in definition order; every atom after the first must
///   be bonded to an earlier atom.
/// * `strategy` - How reference atoms are chosen.
/// * `config` - Engine tolerances.
///
/// # Errors
///
/// Returns a [`ZMatrixError`] if reference atoms cannot be selected.
#[instrument(skip_all, name = "molecule_to_zmatrix", fields(title = %molecule.title))]
pub fn molecule_to_zmatrix(
    molecule: &Molecule,
    strategy: &SelectionStrategy,
    config: &EngineConfig,
) -> Result<ZMatrix, ZMatrixError> {
    let zmatrix = ZMatrixBuilder::new(config).build(molecule, strategy)?;
    info!(
        atoms = zmatrix.len(),
        coordinates = zmatrix.coordinates().count(),
        "Built Z-matrix."
    );
    Ok(zmatrix)
}

/// Rebuilds Cartesian coordinates and the bond graph of a Z-matrix.
///
/// When `template` is given, bond orders and stereo flags are copied from it.
#[instrument(skip_all, name = "zmatrix_to_molecule", fields(title = %zmatrix.title))]
pub fn zmatrix_to_molecule(
    zmatrix: &ZMatrix,
    template: Option<&Molecule>,
    config: &EngineConfig,
) -> Result<Reconstruction, ZMatrixError> {
    let reconstruction = ZMatrixToCartesianConverter::new(config).convert(zmatrix, template)?;
    if reconstruction.warnings.is_empty() {
        info!(
            atoms = reconstruction.molecule.atom_count(),
            "Reconstructed Cartesian coordinates."
        );
    } else {
        info!(
            atoms = reconstruction.molecule.atom_count(),
            clamped = reconstruction.warnings.len(),
            "Reconstructed Cartesian coordinates with reduced accuracy for some atoms."
        );
    }
    Ok(reconstruction)
}

/// Reconstructs a Z-matrix and derives a fresh one from the result.
///
/// Useful to normalize a hand-written Z-matrix or to re-express it with
/// proper torsions only.
pub fn rederive(
    zmatrix: &ZMatrix,
    strategy: &SelectionStrategy,
    config: &EngineConfig,
) -> Result<ZMatrix, ZMatrixError> {
    let reconstruction = zmatrix_to_molecule(zmatrix, None, config)?;
    molecule_to_zmatrix(&reconstruction.molecule, strategy, config)
}
