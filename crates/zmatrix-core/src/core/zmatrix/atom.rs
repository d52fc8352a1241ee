use super::coordinate::{InternalCoordinate, ThirdCoordinateKind};

/// One row of a Z-matrix: an element symbol anchored to up to three earlier atoms.
///
/// The references `I`, `J`, `K` are 0-based indices of previously defined
/// atoms. The coordinates are stored in slot order: distance to `I`, angle at
/// `I`, then the third coordinate (torsion or second angle).
#[derive(Debug, Clone, PartialEq)]
pub struct ZMatrixAtom {
    pub symbol: String,
    references: [Option<usize>; 3],
    coordinates: Vec<InternalCoordinate>,
}

impl ZMatrixAtom {
    /// The first atom of a Z-matrix, with no references.
    pub fn origin(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            references: [None; 3],
            coordinates: Vec::new(),
        }
    }

    /// An atom placed by a distance to `i`.
    pub fn with_distance(symbol: &str, i: usize, distance: InternalCoordinate) -> Self {
        Self {
            symbol: symbol.to_string(),
            references: [Some(i), None, None],
            coordinates: vec![distance],
        }
    }

    /// An atom placed by a distance to `i` and an angle at `i` towards `j`.
    pub fn with_angle(
        symbol: &str,
        (i, j): (usize, usize),
        distance: InternalCoordinate,
        angle: InternalCoordinate,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            references: [Some(i), Some(j), None],
            coordinates: vec![distance, angle],
        }
    }

    /// An atom placed by distance, angle and a third coordinate.
    pub fn with_third(
        symbol: &str,
        (i, j, k): (usize, usize, usize),
        distance: InternalCoordinate,
        angle: InternalCoordinate,
        third: InternalCoordinate,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            references: [Some(i), Some(j), Some(k)],
            coordinates: vec![distance, angle, third],
        }
    }

    /// Builds an atom from raw parts without checking slot consistency.
    ///
    /// Used when reading external data; the converter validates the shape.
    pub fn from_parts(
        symbol: &str,
        references: [Option<usize>; 3],
        coordinates: Vec<InternalCoordinate>,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            references,
            coordinates,
        }
    }

    pub fn i(&self) -> Option<usize> {
        self.references[0]
    }

    pub fn j(&self) -> Option<usize> {
        self.references[1]
    }

    pub fn k(&self) -> Option<usize> {
        self.references[2]
    }

    pub fn references(&self) -> [Option<usize>; 3] {
        self.references
    }

    pub fn coordinates(&self) -> &[InternalCoordinate] {
        &self.coordinates
    }

    pub fn coordinates_mut(&mut self) -> &mut [InternalCoordinate] {
        &mut self.coordinates
    }

    pub fn distance(&self) -> Option<&InternalCoordinate> {
        self.coordinates.first()
    }

    pub fn angle(&self) -> Option<&InternalCoordinate> {
        self.coordinates.get(1)
    }

    pub fn third(&self) -> Option<&InternalCoordinate> {
        self.coordinates.get(2)
    }

    /// Kind of the third coordinate, if this atom has one.
    pub fn third_kind(&self) -> Option<ThirdCoordinateKind> {
        self.third().map(InternalCoordinate::effective_kind)
    }

    /// Whether this atom is placed through a proper torsion around `I`-`J`.
    pub fn uses_torsion(&self) -> bool {
        self.third().is_some_and(InternalCoordinate::is_torsion)
    }

    /// The coordinate with the most atom indices, which fixes the atom's topology.
    pub fn highest_order_coordinate(&self) -> Option<&InternalCoordinate> {
        self.coordinates.last()
    }

    /// Whether both atoms are defined over the same atom IDs.
    ///
    /// Compares the highest-order coordinates; their IDs must match in the same
    /// or in exactly reversed order. Two atoms without coordinates match.
    pub fn same_ids_as(&self, other: &Self) -> bool {
        match (self.highest_order_coordinate(), other.highest_order_coordinate()) {
            (Some(a), Some(b)) => a.same_ids_as(b),
            (None, None) => true,
            _ => false,
        }
    }
}
