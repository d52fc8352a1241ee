#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
    Aromatic,
}

/// Stereo annotation of a bond as drawn in 2D-aware structure formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondStereo {
    #[default]
    None,
    Up,
    Down,
    Either,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1: usize, // index of the first atom
    pub atom2: usize, // index of the second atom
    pub order: BondOrder,
    pub stereo: BondStereo,
}

impl Bond {
    pub fn new(atom1: usize, atom2: usize, order: BondOrder) -> Self {
        Self {
            atom1,
            atom2,
            order,
            stereo: BondStereo::None,
        }
    }

    pub fn with_stereo(mut self, stereo: BondStereo) -> Self {
        self.stereo = stereo;
        self
    }

    /// Whether this bond joins `a` and `b`, in either orientation.
    pub fn connects(&self, a: usize, b: usize) -> bool {
        (self.atom1 == a && self.atom2 == b) || (self.atom1 == b && self.atom2 == a)
    }

    /// The atom pair in ascending index order.
    pub fn key(&self) -> (usize, usize) {
        pair_key(self.atom1, self.atom2)
    }
}

/// Orders an atom pair so that unordered pairs compare equal.
pub fn pair_key(a: usize, b: usize) -> (usize, usize) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_bond_is_single_stereo_none_by_default() {
        let bond = Bond::new(3, 1, BondOrder::default());
        assert_eq!(bond.order, BondOrder::Single);
        assert_eq!(bond.stereo, BondStereo::None);
        assert_eq!(bond.atom1, 3);
        assert_eq!(bond.atom2, 1);
    }

    #[test]
    fn connects_ignores_orientation() {
        let bond = Bond::new(2, 5, BondOrder::Double).with_stereo(BondStereo::Up);
        assert!(bond.connects(2, 5));
        assert!(bond.connects(5, 2));
        assert!(!bond.connects(2, 4));
        assert_eq!(bond.key(), (2, 5));
        assert_eq!(pair_key(7, 1), (1, 7));
    }
}
