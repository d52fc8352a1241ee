use super::config::EngineConfig;
use super::error::ZMatrixError;
use super::selector::{ReferenceAtomSelector, References, SelectionStrategy};
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::pair_key;
use crate::core::utils::geometry::{bond_angle, distance, torsion_angle};
use crate::core::zmatrix::{InternalCoordinate, ThirdCoordinateKind, ZMatrix, ZMatrixAtom};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Sequential internal-coordinate names (`dst1`, `ang1`, `tor1`, ...) for one build.
#[derive(Debug, Default)]
pub struct NameCounters {
    distances: usize,
    angles: usize,
    torsions: usize,
}

impl NameCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_distance(&mut self) -> String {
        self.distances += 1;
        format!("dst{}", self.distances)
    }

    pub fn next_angle(&mut self) -> String {
        self.angles += 1;
        format!("ang{}", self.angles)
    }

    pub fn next_torsion(&mut self) -> String {
        self.torsions += 1;
        format!("tor{}", self.torsions)
    }

    /// Name for a third coordinate: second angles share the angle sequence.
    pub fn next_third(&mut self, kind: ThirdCoordinateKind) -> String {
        if kind.is_second_angle() {
            self.next_angle()
        } else {
            self.next_torsion()
        }
    }
}

/// Derives the Z-matrix of a Cartesian structure.
///
/// Atoms are defined in index order, so every atom after the first must be
/// bonded to at least one earlier atom. The distance reference edges form a
/// spanning tree of the bond graph; the resulting Z-matrix records which real
/// bonds are not tree edges and which tree edges are not real bonds.
pub struct ZMatrixBuilder<'a> {
    config: &'a EngineConfig,
}

impl<'a> ZMatrixBuilder<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Builds the Z-matrix of `molecule`.
    ///
    /// # Arguments
    ///
    /// * `molecule` - Atoms in definition order plus their bond graph.
    /// * `strategy` - How reference atoms are chosen.
    ///
    /// # Return
    ///
    /// A Z-matrix titled like the molecule, with fresh `dst#`/`ang#`/`tor#` names.
    ///
    /// # Errors
    ///
    /// Returns [`ZMatrixError::TemplateSizeMismatch`] when a template has a
    /// different number of atoms, or any error of the reference selection.
    pub fn build(
        &self,
        molecule: &Molecule,
        strategy: &SelectionStrategy<'_>,
    ) -> Result<ZMatrix, ZMatrixError> {
        if let SelectionStrategy::Template(template) = strategy {
            if template.len() != molecule.atom_count() {
                return Err(ZMatrixError::TemplateSizeMismatch {
                    template: template.len(),
                    molecule: molecule.atom_count(),
                });
            }
        }

        let selector = ReferenceAtomSelector::new(molecule, self.config);
        let mut names = NameCounters::new();
        let mut consumed: HashSet<(usize, usize)> = HashSet::new();
        let mut zmatrix = ZMatrix::with_title(&molecule.title);

        for (index, atom) in molecule.atoms().iter().enumerate() {
            let refs = selector.select(index, &zmatrix, strategy)?;
            let pos = |i: usize| molecule.atoms()[i].position;

            let row = match refs {
                References::Origin => ZMatrixAtom::origin(&atom.symbol),
                References::Distance { i } => ZMatrixAtom::with_distance(
                    &atom.symbol,
                    i,
                    InternalCoordinate::distance(
                        names.next_distance(),
                        distance(&atom.position, &pos(i)),
                        index,
                        i,
                    ),
                ),
                References::Angle { i, j } => ZMatrixAtom::with_angle(
                    &atom.symbol,
                    (i, j),
                    InternalCoordinate::distance(
                        names.next_distance(),
                        distance(&atom.position, &pos(i)),
                        index,
                        i,
                    ),
                    InternalCoordinate::angle(
                        names.next_angle(),
                        bond_angle(&atom.position, &pos(i), &pos(j)),
                        index,
                        i,
                        j,
                    ),
                ),
                References::Third { i, j, k, kind } => {
                    let distance_ic = InternalCoordinate::distance(
                        names.next_distance(),
                        distance(&atom.position, &pos(i)),
                        index,
                        i,
                    );
                    let angle_ic = InternalCoordinate::angle(
                        names.next_angle(),
                        bond_angle(&atom.position, &pos(i), &pos(j)),
                        index,
                        i,
                        j,
                    );
                    let third_value = if kind.is_second_angle() {
                        bond_angle(&atom.position, &pos(i), &pos(k))
                    } else {
                        torsion_angle(&atom.position, &pos(i), &pos(j), &pos(k))
                    };
                    let third_ic = InternalCoordinate::third(
                        names.next_third(kind),
                        third_value,
                        [index, i, j, k],
                        Some(kind),
                    );
                    ZMatrixAtom::with_third(&atom.symbol, (i, j, k), distance_ic, angle_ic, third_ic)
                }
            };

            if let Some(i) = row.i() {
                if molecule.are_bonded(index, i) {
                    consumed.insert(pair_key(index, i));
                } else {
                    trace!(atom = index, reference = i, "Distance reference is not a bond");
                    zmatrix.add_pointer_to_non_bonded(index, i);
                }
            }
            trace!(atom = index, symbol = %atom.symbol, "Defined Z-matrix row");
            zmatrix.add_atom(row);
        }

        for bond in molecule.bonds() {
            if !consumed.contains(&bond.key()) {
                zmatrix.add_pointer_to_bonded(bond.atom1, bond.atom2);
            }
        }

        debug!(
            atoms = zmatrix.len(),
            ring_closures = zmatrix.pointers_to_bonded().len(),
            non_bonded_edges = zmatrix.pointers_to_non_bonded().len(),
            "Built Z-matrix"
        );
        Ok(zmatrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::topology::BondOrder;
    use nalgebra::Point3;

    fn ethanol() -> Molecule {
        let mut mol = Molecule::with_title("ethanol");
        let coords = [
            ("C", -0.0487, 0.5407, 0.0000),
            ("C", 1.4590, 0.2738, 0.0000),
            ("O", -0.7480, -0.6980, 0.0000),
            ("H", -0.3460, 1.1050, 0.8880),
            ("H", -0.3460, 1.1050, -0.8880),
            ("H", 1.7560, -0.2890, 0.8880),
            ("H", 1.7560, -0.2890, -0.8880),
            ("H", 1.9920, 1.2270, 0.0000),
            ("H", -1.6810, -0.4800, 0.0000),
        ];
        for (symbol, x, y, z) in coords {
            mol.add_atom(Atom::new(symbol, Point3::new(x, y, z)));
        }
        for (a, b) in [(0, 1), (0, 2), (0, 3), (0, 4), (1, 5), (1, 6), (1, 7), (2, 8)] {
            mol.add_bond(a, b, BondOrder::Single).unwrap();
        }
        mol
    }

    fn cyclopropane() -> Molecule {
        let mut mol = Molecule::with_title("ring");
        mol.add_atom(Atom::new("C", Point3::new(0.0, 0.0, 0.0)));
        mol.add_atom(Atom::new("C", Point3::new(1.51, 0.0, 0.0)));
        mol.add_atom(Atom::new("C", Point3::new(0.755, 1.308, 0.0)));
        mol.add_atom(Atom::new("H", Point3::new(-0.55, -0.4, 0.9)));
        for (a, b) in [(0, 1), (1, 2), (2, 0), (0, 3)] {
            mol.add_bond(a, b, BondOrder::Single).unwrap();
        }
        mol
    }

    #[test]
    fn name_counters_are_independent_and_one_based() {
        let mut names = NameCounters::new();
        assert_eq!(names.next_distance(), "dst1");
        assert_eq!(names.next_distance(), "dst2");
        assert_eq!(names.next_angle(), "ang1");
        assert_eq!(names.next_third(ThirdCoordinateKind::AngleNegative), "ang2");
        assert_eq!(names.next_third(ThirdCoordinateKind::Torsion), "tor1");
    }

    #[test]
    fn rows_follow_the_reference_shape_invariants() {
        let config = EngineConfig::default();
        let zm = ZMatrixBuilder::new(&config)
            .build(&ethanol(), &SelectionStrategy::Heuristic)
            .unwrap();

        assert_eq!(zm.title, "ethanol");
        assert_eq!(zm.len(), 9);
        for (index, row) in zm.atoms().iter().enumerate() {
            assert_eq!(row.coordinates().len(), index.min(3));
            for reference in row.references().iter().flatten() {
                assert!(*reference < index);
            }
            if let Some(third) = row.third() {
                assert_eq!(third.atoms().len(), 4);
                assert_eq!(third.atoms()[0], index);
            }
        }
    }

    #[test]
    fn coordinates_match_the_cartesian_geometry() {
        let mol = ethanol();
        let config = EngineConfig::default();
        let zm = ZMatrixBuilder::new(&config)
            .build(&mol, &SelectionStrategy::Heuristic)
            .unwrap();
        let p = |i: usize| mol.atom(i).unwrap().position;

        let row1 = zm.atom(1).unwrap();
        assert!((row1.distance().unwrap().value - distance(&p(1), &p(0))).abs() < 1e-12);

        let row2 = zm.atom(2).unwrap();
        let (i, j) = (row2.i().unwrap(), row2.j().unwrap());
        assert!((row2.angle().unwrap().value - bond_angle(&p(2), &p(i), &p(j))).abs() < 1e-12);
    }

    #[test]
    fn name_counts_and_uniqueness() {
        let mol = ethanol();
        let n = mol.atom_count();
        let config = EngineConfig::default();
        let zm = ZMatrixBuilder::new(&config)
            .build(&mol, &SelectionStrategy::TorsionOnly)
            .unwrap();

        let names: Vec<&str> = zm.coordinates().map(|ic| ic.name.as_str()).collect();
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(unique.len(), names.len());
        assert_eq!(names.iter().filter(|n| n.starts_with("dst")).count(), n - 1);
        assert_eq!(names.iter().filter(|n| n.starts_with("ang")).count(), n - 2);
        assert_eq!(names.iter().filter(|n| n.starts_with("tor")).count(), n - 3);

        let heuristic = ZMatrixBuilder::new(&config)
            .build(&mol, &SelectionStrategy::Heuristic)
            .unwrap();
        let angle_slot = heuristic
            .atoms()
            .iter()
            .filter_map(|row| row.angle())
            .filter(|ic| ic.name.starts_with("ang"))
            .count();
        assert_eq!(angle_slot, n - 2);
    }

    #[test]
    fn repeated_builds_are_identical() {
        let mol = ethanol();
        let config = EngineConfig::default();
        let builder = ZMatrixBuilder::new(&config);

        let first = builder.build(&mol, &SelectionStrategy::Heuristic).unwrap();
        let second = builder.build(&mol, &SelectionStrategy::Heuristic).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn ring_closure_bond_is_recorded_as_pointer_to_bonded() {
        let config = EngineConfig::default();
        let zm = ZMatrixBuilder::new(&config)
            .build(&cyclopropane(), &SelectionStrategy::Heuristic)
            .unwrap();

        assert_eq!(zm.pointers_to_bonded().len(), 1);
        assert!(zm.pointers_to_non_bonded().is_empty());
        let (a, b) = zm.pointers_to_bonded()[0];
        assert!(zm.find_bond_distance(a, b).is_none());
    }

    #[test]
    fn template_strategy_reuses_references() {
        let mol = ethanol();
        let config = EngineConfig::default();
        let builder = ZMatrixBuilder::new(&config);
        let template = builder.build(&mol, &SelectionStrategy::Heuristic).unwrap();

        let rebuilt = builder
            .build(&mol, &SelectionStrategy::Template(&template))
            .unwrap();
        assert_eq!(rebuilt, template);

        let mut smaller = Molecule::with_title(&mol.title);
        for atom in mol.atoms().iter().take(3) {
            smaller.add_atom(atom.clone());
        }
        assert_eq!(
            builder.build(&smaller, &SelectionStrategy::Template(&template)),
            Err(ZMatrixError::TemplateSizeMismatch {
                template: 9,
                molecule: 3
            })
        );
    }

    #[test]
    fn empty_molecule_gives_empty_zmatrix() {
        let config = EngineConfig::default();
        let zm = ZMatrixBuilder::new(&config)
            .build(&Molecule::new(), &SelectionStrategy::Heuristic)
            .unwrap();
        assert!(zm.is_empty());
    }
}
