use crate::core::models::molecule::Molecule;
use crate::core::zmatrix::ZMatrix;
use crate::engine::builder::ZMatrixBuilder;
use crate::engine::config::EngineConfig;
use crate::engine::converter::{Reconstruction, ZMatrixToCartesianConverter};
use crate::engine::delta::DeltaApplier;
use crate::engine::error::ZMatrixError;
use crate::engine::selector::SelectionStrategy;
use tracing::{debug, info, instrument};

/// One displaced structure produced by the workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct Displacement {
    pub scale: f64,
    pub zmatrix: ZMatrix,
    pub reconstruction: Reconstruction,
}

/// Displaces a molecule along an internal-coordinate delta at several scales.
///
/// The molecule's Z-matrix is built with the delta's own reference atoms, so
/// both are defined over the same atoms. Each displaced Z-matrix is then
/// reconstructed using the molecule as bond template.
///
/// # Arguments
///
/// * `molecule` - The structure to displace.
/// * `delta` - The displacement, typically a structure copy of the molecule's
///   Z-matrix with a few non-zero values.
/// * `scales` - The factors at which the delta is applied, in output order.
/// * `config` - Engine tolerances.
///
/// # Return
///
/// One [`Displacement`] per scale factor.
///
/// # Errors
///
/// Returns a [`ZMatrixError`] if the delta does not fit the molecule or if a
/// displaced structure cannot be reconstructed.
#[instrument(skip_all, name = "displacement_workflow", fields(title = %molecule.title, scales = scales.len()))]
pub fn run(
    molecule: &Molecule,
    delta: &ZMatrix,
    scales: &[f64],
    config: &EngineConfig,
) -> Result<Vec<Displacement>, ZMatrixError> {
    info!("Building the reference Z-matrix from the delta's reference atoms.");
    let base = ZMatrixBuilder::new(config).build(molecule, &SelectionStrategy::Template(delta))?;
    displace_zmatrix(&base, delta, scales, Some(molecule), config)
}

/// Applies `delta` to an existing Z-matrix at each scale without rebuilding
/// Cartesian coordinates.
///
/// Each result is titled `"<base title> (scale <s>)"` and pairs with the
/// scale at the same position in `scales`.
#[instrument(skip_all, name = "zmatrix_scan", fields(title = %base.title, scales = scales.len()))]
pub fn displaced_zmatrices(
    base: &ZMatrix,
    delta: &ZMatrix,
    scales: &[f64],
    config: &EngineConfig,
) -> Result<Vec<ZMatrix>, ZMatrixError> {
    let applier = DeltaApplier::new(config);
    scales
        .iter()
        .map(|&scale| {
            let mut zmatrix = applier.apply(base, delta, scale)?;
            zmatrix.title = format!("{} (scale {})", base.title, scale);
            Ok(zmatrix)
        })
        .collect()
}

/// Applies `delta` to an existing Z-matrix at each scale and reconstructs the results.
#[instrument(skip_all, name = "zmatrix_displacement", fields(title = %base.title))]
pub fn displace_zmatrix(
    base: &ZMatrix,
    delta: &ZMatrix,
    scales: &[f64],
    template: Option<&Molecule>,
    config: &EngineConfig,
) -> Result<Vec<Displacement>, ZMatrixError> {
    let converter = ZMatrixToCartesianConverter::new(config);
    let zmatrices = displaced_zmatrices(base, delta, scales, config)?;

    let mut displacements = Vec::with_capacity(zmatrices.len());
    for (&scale, zmatrix) in scales.iter().zip(zmatrices) {
        let reconstruction = converter.convert(&zmatrix, template)?;
        debug!(
            scale,
            clamped = reconstruction.warnings.len(),
            "Displaced structure reconstructed"
        );
        displacements.push(Displacement {
            scale,
            zmatrix,
            reconstruction,
        });
    }

    info!(count = displacements.len(), "Displacement workflow finished.");
    Ok(displacements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::topology::{Bond, BondOrder};
    use crate::core::utils::geometry::{distance, torsion_angle};
    use crate::core::zmatrix::{InternalCoordinate, ThirdCoordinateKind, ZMatrixAtom};
    use nalgebra::Point3;
    use std::collections::HashSet;

    fn hydrogen_peroxide() -> Molecule {
        let mut mol = Molecule::with_title("H2O2");
        mol.add_atom(Atom::new("O", Point3::new(0.0, 0.7375, -0.0528)));
        mol.add_atom(Atom::new("O", Point3::new(0.0, -0.7375, -0.0528)));
        mol.add_atom(Atom::new("H", Point3::new(0.8190, 0.8170, 0.4220)));
        mol.add_atom(Atom::new("H", Point3::new(-0.8190, -0.8170, 0.4220)));
        mol.add_bond(0, 1, BondOrder::Single).unwrap();
        mol.add_bond(0, 2, BondOrder::Single).unwrap();
        mol.add_bond(1, 3, BondOrder::Double).unwrap();
        mol
    }

    fn torsion_delta(mol: &Molecule, step: f64) -> ZMatrix {
        let config = EngineConfig::default();
        let base = ZMatrixBuilder::new(&config)
            .build(mol, &SelectionStrategy::TorsionOnly)
            .unwrap();
        let mut delta = base.structure_copy("delta");
        let third = &mut delta.atoms_mut()[3].coordinates_mut()[2];
        third.value = step;
        delta
    }

    fn hooh_torsion(mol: &Molecule) -> f64 {
        let p = |i: usize| mol.atom(i).unwrap().position;
        torsion_angle(&p(3), &p(1), &p(0), &p(2))
    }

    #[test]
    fn displacement_rotates_the_torsion_by_the_scaled_step() {
        let config = EngineConfig::default();
        let mol = hydrogen_peroxide();
        let delta = torsion_delta(&mol, 10.0);
        let initial = hooh_torsion(&mol);

        let results = run(&mol, &delta, &[0.0, 1.0, -2.0], &config).unwrap();
        assert_eq!(results.len(), 3);

        for result in &results {
            let moved = hooh_torsion(&result.reconstruction.molecule);
            let expected = initial + 10.0 * result.scale;
            assert!(
                (moved - expected).abs() < 1e-6,
                "scale {}: {} vs {}",
                result.scale,
                moved,
                expected
            );
            let r = &result.reconstruction.molecule;
            let oo = distance(&r.atom(0).unwrap().position, &r.atom(1).unwrap().position);
            assert!((oo - 1.475).abs() < 1e-6);
        }
        assert!(results[1].zmatrix.title.ends_with("(scale 1)"));
    }

    #[test]
    fn displaced_structures_keep_the_template_bonds() {
        let config = EngineConfig::default();
        let mol = hydrogen_peroxide();
        let delta = torsion_delta(&mol, 30.0);

        let results = run(&mol, &delta, &[1.0], &config).unwrap();
        let rebuilt = &results[0].reconstruction.molecule;
        let keys: HashSet<_> = rebuilt.bonds().iter().map(Bond::key).collect();
        let expected: HashSet<_> = mol.bonds().iter().map(Bond::key).collect();
        assert_eq!(keys, expected);
        assert_eq!(rebuilt.bond_between(1, 3).unwrap().order, BondOrder::Double);
    }

    // Atom 2 swings to 180 degrees, leaving the torsion of atom 3 undefined.
    fn linearizing_pair() -> (ZMatrix, ZMatrix) {
        let mut base = ZMatrix::with_title("bent");
        base.add_atom(ZMatrixAtom::origin("C"));
        base.add_atom(ZMatrixAtom::with_distance(
            "C",
            0,
            InternalCoordinate::distance("dst1", 1.2, 1, 0),
        ));
        base.add_atom(ZMatrixAtom::with_angle(
            "C",
            (1, 0),
            InternalCoordinate::distance("dst2", 1.3, 2, 1),
            InternalCoordinate::angle("ang1", 170.0, 2, 1, 0),
        ));
        base.add_atom(ZMatrixAtom::with_third(
            "H",
            (2, 1, 0),
            InternalCoordinate::distance("dst3", 1.0, 3, 2),
            InternalCoordinate::angle("ang2", 90.0, 3, 2, 1),
            InternalCoordinate::third("tor1", 60.0, [3, 2, 1, 0], Some(ThirdCoordinateKind::Torsion)),
        ));
        let mut delta = base.structure_copy("delta");
        delta.atoms_mut()[2].coordinates_mut()[1].value = 10.0;
        (base, delta)
    }

    #[test]
    fn zmatrix_scan_skips_reconstruction() {
        let config = EngineConfig::default();
        let (base, delta) = linearizing_pair();

        let scanned = displaced_zmatrices(&base, &delta, &[0.5, 1.0], &config).unwrap();
        assert_eq!(scanned.len(), 2);
        assert_eq!(scanned[1].title, "bent (scale 1)");
        assert!((scanned[0].atom(2).unwrap().angle().unwrap().value - 175.0).abs() < 1e-9);
        assert!((scanned[1].atom(2).unwrap().angle().unwrap().value - 180.0).abs() < 1e-9);

        assert_eq!(
            displace_zmatrix(&base, &delta, &[1.0], None, &config),
            Err(ZMatrixError::LinearGeometry {
                atom: 3,
                reference: 2
            })
        );
    }

    #[test]
    fn mismatched_delta_is_rejected() {
        let config = EngineConfig::default();
        let mol = hydrogen_peroxide();
        let mut short = ZMatrix::new();
        short.add_atom(ZMatrixAtom::origin("O"));

        let base = ZMatrixBuilder::new(&config)
            .build(&mol, &SelectionStrategy::Heuristic)
            .unwrap();
        assert_eq!(
            displace_zmatrix(&base, &short, &[1.0], None, &config),
            Err(ZMatrixError::AtomCountMismatch { base: 4, delta: 1 })
        );
        assert!(matches!(
            run(&mol, &short, &[1.0], &config),
            Err(ZMatrixError::TemplateSizeMismatch { .. })
        ));
    }
}
