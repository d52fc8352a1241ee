use super::atom::Atom;
use super::topology::{Bond, BondOrder};

/// Represents a molecular structure as an ordered list of atoms and a bond graph.
///
/// The position of an atom in the list is its index, and the index order is the
/// order in which a Z-matrix defines the atoms. Bonds are stored together with a
/// cached adjacency list so neighbor queries do not scan the bond list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    /// Free-text title (e.g., the name of the structure or the file block title).
    pub title: String,
    /// Atoms in definition order.
    atoms: Vec<Atom>,
    /// List of all bonds, in insertion order and with their stored orientation.
    bonds: Vec<Bond>,
    /// Cached adjacency list for bond connectivity, indexed by atom index.
    adjacency: Vec<Vec<usize>>,
}

impl Molecule {
    /// Creates a new, empty molecule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty molecule with the given title.
    pub fn with_title(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }

    /// Appends an atom and returns its index.
    ///
    /// # Arguments
    ///
    /// * `atom` - The atom to add.
    ///
    /// # Return
    ///
    /// The index assigned to the atom.
    pub fn add_atom(&mut self, atom: Atom) -> usize {
        self.atoms.push(atom);
        self.adjacency.push(Vec::new());
        self.atoms.len() - 1
    }

    /// Adds a single, non-stereo bond between two atoms.
    ///
    /// See [`Molecule::add_bond_with`] for the semantics.
    pub fn add_bond(&mut self, atom1: usize, atom2: usize, order: BondOrder) -> Option<()> {
        self.add_bond_with(Bond::new(atom1, atom2, order))
    }

    /// Adds a bond between two atoms.
    ///
    /// This method stores the bond with the orientation given and updates the
    /// adjacency cache. It is idempotent: adding a bond between atoms that are
    /// already bonded (in either orientation) succeeds without creating a duplicate.
    ///
    /// # Arguments
    ///
    /// * `bond` - The bond to add.
    ///
    /// # Return
    ///
    /// Returns `Some(())` if successful, otherwise `None` (an index is out of
    /// range or the bond would join an atom to itself).
    pub fn add_bond_with(&mut self, bond: Bond) -> Option<()> {
        let (a, b) = (bond.atom1, bond.atom2);
        if a >= self.atoms.len() || b >= self.atoms.len() || a == b {
            return None;
        }

        if self.adjacency[a].contains(&b) {
            // Bond already exists, operation is successful (idempotent)
            return Some(());
        }

        self.bonds.push(bond);
        self.adjacency[a].push(b);
        self.adjacency[b].push(a);
        Some(())
    }

    /// Retrieves an atom by index.
    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    /// Returns all atoms in definition order.
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Returns the number of atoms.
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Whether the molecule contains no atoms.
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Returns a slice of all bonds.
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Retrieves the bonded neighbors of an atom.
    ///
    /// # Arguments
    ///
    /// * `index` - The index of the atom to query.
    ///
    /// # Return
    ///
    /// Returns `Some(&[usize])` with the neighbor indices in bonding order if the
    /// atom exists, otherwise `None`.
    pub fn bonded_neighbors(&self, index: usize) -> Option<&[usize]> {
        self.adjacency.get(index).map(Vec::as_slice)
    }

    /// Number of atoms bonded to `index` (zero for an unknown index).
    pub fn connectivity(&self, index: usize) -> usize {
        self.adjacency.get(index).map_or(0, Vec::len)
    }

    /// Whether atoms `a` and `b` are bonded.
    pub fn are_bonded(&self, a: usize, b: usize) -> bool {
        self.adjacency.get(a).is_some_and(|n| n.contains(&b))
    }

    /// Finds the bond joining `a` and `b`, in either orientation.
    pub fn bond_between(&self, a: usize, b: usize) -> Option<&Bond> {
        self.bonds.iter().find(|bond| bond.connects(a, b))
    }
}
