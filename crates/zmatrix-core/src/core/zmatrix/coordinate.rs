use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How the third internal coordinate of an atom is interpreted.
///
/// Proper torsions and chirality-tagged second angles share the same four atom
/// indices `(current, I, J, K)`; only the geometric meaning differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThirdCoordinateKind {
    /// Dihedral angle `current-I-J-K` (text token `0`).
    Torsion,
    /// Angle `current-I-K` with positive chirality sign (text token `1`).
    AnglePositive,
    /// Angle `current-I-K` with negative chirality sign (text token `-1`).
    AngleNegative,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid third-coordinate kind '{0}' (expected 0, 1 or -1)")]
pub struct ParseKindError(pub String);

impl ThirdCoordinateKind {
    /// The token used in the Z-matrix text format.
    pub fn token(self) -> &'static str {
        match self {
            Self::Torsion => "0",
            Self::AnglePositive => "1",
            Self::AngleNegative => "-1",
        }
    }

    pub fn is_second_angle(self) -> bool {
        !matches!(self, Self::Torsion)
    }

    /// Chirality sign applied when placing a second-angle atom (`0.0` for torsions).
    pub fn sign(self) -> f64 {
        match self {
            Self::Torsion => 0.0,
            Self::AnglePositive => 1.0,
            Self::AngleNegative => -1.0,
        }
    }

    /// The second-angle kind with the opposite chirality. Torsions are returned unchanged.
    pub fn flipped(self) -> Self {
        match self {
            Self::Torsion => Self::Torsion,
            Self::AnglePositive => Self::AngleNegative,
            Self::AngleNegative => Self::AnglePositive,
        }
    }
}

impl FromStr for ThirdCoordinateKind {
    type Err = ParseKindError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(Self::Torsion),
            "1" => Ok(Self::AnglePositive),
            "-1" => Ok(Self::AngleNegative),
            other => Err(ParseKindError(other.to_string())),
        }
    }
}

impl fmt::Display for ThirdCoordinateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A single scalar geometric quantity and the atoms that define it.
///
/// Two indices define a distance (Angstroms), three an angle at the middle
/// atom (degrees), four a third coordinate (degrees) whose meaning is given by
/// [`ThirdCoordinateKind`]. A four-index coordinate without a kind is read as
/// a torsion.
#[derive(Debug, Clone, PartialEq)]
pub struct InternalCoordinate {
    pub name: String,
    pub value: f64,
    atoms: Vec<usize>,
    pub kind: Option<ThirdCoordinateKind>,
}

impl InternalCoordinate {
    /// Distance between `atom` and its reference `i`.
    pub fn distance(name: impl Into<String>, value: f64, atom: usize, i: usize) -> Self {
        Self {
            name: name.into(),
            value,
            atoms: vec![atom, i],
            kind: None,
        }
    }

    /// Angle `atom-i-j` with its vertex at `i`.
    pub fn angle(name: impl Into<String>, value: f64, atom: usize, i: usize, j: usize) -> Self {
        Self {
            name: name.into(),
            value,
            atoms: vec![atom, i, j],
            kind: None,
        }
    }

    /// Third coordinate over `[atom, i, j, k]`.
    pub fn third(
        name: impl Into<String>,
        value: f64,
        atoms: [usize; 4],
        kind: Option<ThirdCoordinateKind>,
    ) -> Self {
        Self {
            name: name.into(),
            value,
            atoms: atoms.to_vec(),
            kind,
        }
    }

    pub fn atoms(&self) -> &[usize] {
        &self.atoms
    }

    /// Number of atom indices (2, 3 or 4).
    pub fn order(&self) -> usize {
        self.atoms.len()
    }

    /// Kind of a four-index coordinate, defaulting to a torsion when unset.
    pub fn effective_kind(&self) -> ThirdCoordinateKind {
        self.kind.unwrap_or(ThirdCoordinateKind::Torsion)
    }

    /// Whether this is a four-index proper torsion.
    pub fn is_torsion(&self) -> bool {
        self.atoms.len() == 4 && self.effective_kind() == ThirdCoordinateKind::Torsion
    }

    /// Whether both coordinates are defined over the same atoms, either in the
    /// same order or exactly reversed.
    pub fn same_ids_as(&self, other: &Self) -> bool {
        self.atoms == other.atoms || self.atoms.iter().eq(other.atoms.iter().rev())
    }
}
