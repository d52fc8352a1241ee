use super::atom::ZMatrixAtom;
use super::coordinate::InternalCoordinate;
use crate::core::models::topology::pair_key;

/// An ordered internal-coordinate representation of a molecular structure.
///
/// Besides the atom rows, a Z-matrix records how its tree of distance
/// references differs from the real bond graph of the structure it was built
/// from:
///
/// - *pointers to bonded pairs* are real bonds that never served as a distance
///   reference edge and must be re-added when Cartesian coordinates are rebuilt;
/// - *pointers to non-bonded pairs* are distance reference edges that are not
///   real bonds and must not become bonds on reconstruction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZMatrix {
    pub title: String,
    atoms: Vec<ZMatrixAtom>,
    bonded_pointers: Vec<(usize, usize)>,
    non_bonded_pointers: Vec<(usize, usize)>,
}

impl ZMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }

    /// Appends an atom row and returns its index.
    pub fn add_atom(&mut self, atom: ZMatrixAtom) -> usize {
        self.atoms.push(atom);
        self.atoms.len() - 1
    }

    pub fn atom(&self, index: usize) -> Option<&ZMatrixAtom> {
        self.atoms.get(index)
    }

    pub fn atoms(&self) -> &[ZMatrixAtom] {
        &self.atoms
    }

    pub fn atoms_mut(&mut self) -> &mut [ZMatrixAtom] {
        &mut self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Iterates over every internal coordinate in row and slot order.
    pub fn coordinates(&self) -> impl Iterator<Item = &InternalCoordinate> {
        self.atoms.iter().flat_map(|atom| atom.coordinates().iter())
    }

    /// Records a real bond that is not a distance reference edge.
    pub fn add_pointer_to_bonded(&mut self, a: usize, b: usize) {
        self.bonded_pointers.push((a, b));
    }

    /// Records a distance reference edge that is not a real bond.
    pub fn add_pointer_to_non_bonded(&mut self, a: usize, b: usize) {
        self.non_bonded_pointers.push((a, b));
    }

    pub fn pointers_to_bonded(&self) -> &[(usize, usize)] {
        &self.bonded_pointers
    }

    pub fn pointers_to_non_bonded(&self) -> &[(usize, usize)] {
        &self.non_bonded_pointers
    }

    /// Whether the pair `a`-`b` (in either order) was recorded as non-bonded.
    pub fn is_pointer_to_non_bonded(&self, a: usize, b: usize) -> bool {
        let key = pair_key(a, b);
        self.non_bonded_pointers
            .iter()
            .any(|&(x, y)| pair_key(x, y) == key)
    }

    /// Whether some atom is already placed by a proper torsion with distance
    /// reference `i` and angle reference `j`.
    ///
    /// The axis is directed: a torsion around `j`-`i` does not count.
    pub fn uses_torsion(&self, i: usize, j: usize) -> bool {
        self.atoms
            .iter()
            .any(|atom| atom.i() == Some(i) && atom.j() == Some(j) && atom.uses_torsion())
    }

    /// Finds the atom row whose distance coordinate joins `a` and `b`.
    ///
    /// The pair is unordered: the row of atom `a` referencing `b` and the row
    /// of atom `b` referencing `a` both match.
    pub fn find_bond_distance(&self, a: usize, b: usize) -> Option<&ZMatrixAtom> {
        let key = pair_key(a, b);
        self.atoms.iter().find(|atom| {
            atom.distance()
                .is_some_and(|d| d.atoms().len() == 2 && pair_key(d.atoms()[0], d.atoms()[1]) == key)
        })
    }

    /// Copies the structure (symbols, references, names, kinds and pointers)
    /// with every internal-coordinate value set to zero.
    ///
    /// The result is the skeleton of a delta Z-matrix compatible with `self`.
    pub fn structure_copy(&self, title: &str) -> Self {
        let mut copy = self.clone();
        copy.title = title.to_string();
        for atom in &mut copy.atoms {
            for ic in atom.coordinates_mut() {
                ic.value = 0.0;
            }
        }
        copy
    }

    /// Whether both Z-matrices have the same number of rows and every row is
    /// defined over the same atom IDs.
    pub fn same_topology_as(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .atoms
                .iter()
                .zip(&other.atoms)
                .all(|(a, b)| a.same_ids_as(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::zmatrix::coordinate::ThirdCoordinateKind;

    // O-O-C(-H)(-H)(-H) chain with one second-angle row.
    fn sample() -> ZMatrix {
        let mut zm = ZMatrix::with_title("sample");
        zm.add_atom(ZMatrixAtom::origin("O"));
        zm.add_atom(ZMatrixAtom::with_distance(
            "O",
            0,
            InternalCoordinate::distance("dst1", 1.8, 1, 0),
        ));
        zm.add_atom(ZMatrixAtom::with_angle(
            "C",
            (1, 0),
            InternalCoordinate::distance("dst2", 2.1, 2, 1),
            InternalCoordinate::angle("ang1", 100.0, 2, 1, 0),
        ));
        zm.add_atom(ZMatrixAtom::with_third(
            "H",
            (2, 1, 0),
            InternalCoordinate::distance("dst3", 1.1, 3, 2),
            InternalCoordinate::angle("ang2", 109.0, 3, 2, 1),
            InternalCoordinate::third("tor1", 60.0, [3, 2, 1, 0], Some(ThirdCoordinateKind::Torsion)),
        ));
        zm.add_atom(ZMatrixAtom::with_third(
            "H",
            (2, 1, 3),
            InternalCoordinate::distance("dst4", 1.1, 4, 2),
            InternalCoordinate::angle("ang3", 109.0, 4, 2, 1),
            InternalCoordinate::third(
                "ang4",
                109.0,
                [4, 2, 1, 3],
                Some(ThirdCoordinateKind::AnglePositive),
            ),
        ));
        zm.add_pointer_to_bonded(0, 2);
        zm.add_pointer_to_non_bonded(2, 1);
        zm
    }

    #[test]
    fn find_bond_distance_ignores_pair_order() {
        let zm = sample();

        assert_eq!(zm.find_bond_distance(1, 0).unwrap().symbol, "O");
        assert!(std::ptr::eq(
            zm.find_bond_distance(0, 1).unwrap(),
            zm.atom(1).unwrap()
        ));
        assert!(std::ptr::eq(
            zm.find_bond_distance(2, 4).unwrap(),
            zm.atom(4).unwrap()
        ));
        assert!(zm.find_bond_distance(0, 2).is_none());
        assert!(zm.find_bond_distance(3, 1).is_none());
    }

    #[test]
    fn uses_torsion_matches_the_directed_axis_only() {
        let zm = sample();

        assert!(zm.uses_torsion(2, 1));
        assert!(!zm.uses_torsion(1, 2));
        assert!(!zm.uses_torsion(1, 0));
    }

    #[test]
    fn non_bonded_pointer_lookup_is_unordered() {
        let zm = sample();

        assert!(zm.is_pointer_to_non_bonded(1, 2));
        assert!(zm.is_pointer_to_non_bonded(2, 1));
        assert!(!zm.is_pointer_to_non_bonded(0, 2));
        assert_eq!(zm.pointers_to_bonded(), &[(0, 2)]);
    }

    #[test]
    fn structure_copy_zeroes_values_and_keeps_everything_else() {
        let original = sample();
        let copy = original.structure_copy("delta");

        assert_eq!(copy.title, "delta");
        assert_eq!(original.title, "sample");
        assert_eq!(copy.len(), original.len());
        assert!(copy.coordinates().all(|ic| ic.value == 0.0));
        assert!(copy.same_topology_as(&original));
        assert_eq!(copy.pointers_to_bonded(), original.pointers_to_bonded());
        assert_eq!(copy.pointers_to_non_bonded(), original.pointers_to_non_bonded());
        let names: Vec<_> = copy.coordinates().map(|ic| ic.name.clone()).collect();
        let original_names: Vec<_> = original.coordinates().map(|ic| ic.name.clone()).collect();
        assert_eq!(names, original_names);
        assert!((original.atom(1).unwrap().distance().unwrap().value - 1.8).abs() < 1e-12);
    }

    #[test]
    fn topology_comparison_detects_changed_references() {
        let a = sample();
        let mut b = sample();
        b.atoms_mut()[2] = ZMatrixAtom::with_angle(
            "C",
            (0, 1),
            InternalCoordinate::distance("dst2", 2.1, 2, 0),
            InternalCoordinate::angle("ang1", 100.0, 2, 0, 1),
        );

        assert!(!a.same_topology_as(&b));
        assert!(!a.same_topology_as(&ZMatrix::new()));
    }
}
