use super::element::{self, DUMMY_ATOM_MASS};
use nalgebra::Point3;

/// Element symbol conventionally used for linearity-breaking placeholder centers.
pub const DUMMY_SYMBOL: &str = "X";

/// Represents a single center of a molecular structure.
///
/// An atom carries its chemical identity, its Cartesian position, and the mass
/// used to rank it as a reference candidate when internal coordinates are
/// derived. Dummy atoms are non-chemical placeholders typically introduced to
/// break linear arrangements that would otherwise make a Z-matrix degenerate.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The element symbol (e.g., "C", "Cl") or a placeholder label for dummies.
    pub symbol: String,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// The atomic mass in g/mol.
    pub mass: f64,
    /// Whether this center is a placeholder rather than a chemical atom.
    pub is_dummy: bool,
}

impl Atom {
    /// Creates a new `Atom` from an element symbol and a position.
    ///
    /// The mass is taken from the element table. Symbols that do not name a
    /// known chemical element produce a dummy atom with a unit mass.
    ///
    /// # Arguments
    ///
    /// * `symbol` - The element symbol.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(symbol: &str, position: Point3<f64>) -> Self {
        match element::atomic_mass(symbol) {
            Some(mass) => Self {
                symbol: symbol.to_string(),
                position,
                mass,
                is_dummy: false,
            },
            None => Self {
                symbol: symbol.to_string(),
                position,
                mass: DUMMY_ATOM_MASS,
                is_dummy: true,
            },
        }
    }

    /// Creates a dummy atom at the given position.
    pub fn dummy(position: Point3<f64>) -> Self {
        Self {
            symbol: DUMMY_SYMBOL.to_string(),
            position,
            mass: DUMMY_ATOM_MASS,
            is_dummy: true,
        }
    }
}
