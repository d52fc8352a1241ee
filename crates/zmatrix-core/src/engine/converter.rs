use super::config::EngineConfig;
use super::error::ZMatrixError;
use crate::core::models::atom::Atom;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::{Bond, BondOrder};
use crate::core::zmatrix::{ThirdCoordinateKind, ZMatrix, ZMatrixAtom};
use nalgebra::{Point3, Vector3};
use tracing::{debug, trace, warn};

/// Outcome of placing one atom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// The internal coordinates were satisfied exactly.
    Exact(Point3<f64>),
    /// A second-angle placement whose out-of-plane term was negative (`c < 0`)
    /// and had to be clamped to zero; the position is approximate.
    Clamped { position: Point3<f64>, c: f64 },
}

impl Placement {
    pub fn position(&self) -> Point3<f64> {
        match self {
            Self::Exact(position) | Self::Clamped { position, .. } => *position,
        }
    }
}

/// Out-of-plane terms in `[-CLAMP_NOISE_BAND, 0)` are treated as rounding noise.
pub const CLAMP_NOISE_BAND: f64 = 1e-6;

/// Records an atom placed with reduced accuracy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClampWarning {
    pub atom: usize,
    /// The negative out-of-plane term that was clamped to zero.
    pub c: f64,
}

impl ClampWarning {
    /// Whether the two angles could not both be satisfied, as opposed to a
    /// term that fell just below zero through rounding.
    pub fn is_inconsistent(&self) -> bool {
        self.c < -CLAMP_NOISE_BAND
    }
}

/// A rebuilt Cartesian structure together with any accuracy warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    pub molecule: Molecule,
    pub warnings: Vec<ClampWarning>,
}

/// Rebuilds Cartesian coordinates and bonds from a Z-matrix.
///
/// The first atom sits at the origin, the second on the +z axis and the third
/// in the xz-plane; later atoms are placed from their three references.
pub struct ZMatrixToCartesianConverter<'a> {
    config: &'a EngineConfig,
}

impl<'a> ZMatrixToCartesianConverter<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Converts a Z-matrix into a molecule.
    ///
    /// # Arguments
    ///
    /// * `zmatrix` - The Z-matrix to convert.
    /// * `template` - Optional molecule whose bond orders, stereo flags and
    ///   bond orientations are copied onto matching bonds.
    ///
    /// # Errors
    ///
    /// Returns [`ZMatrixError::MalformedEntry`] for rows that violate the
    /// Z-matrix shape rules and [`ZMatrixError::LinearGeometry`] when a torsion
    /// is defined over collinear references.
    pub fn convert(
        &self,
        zmatrix: &ZMatrix,
        template: Option<&Molecule>,
    ) -> Result<Reconstruction, ZMatrixError> {
        let mut positions: Vec<Point3<f64>> = Vec::with_capacity(zmatrix.len());
        let mut warnings = Vec::new();

        for (index, row) in zmatrix.atoms().iter().enumerate() {
            validate_row(index, row)?;
            let placement = self.place_atom(index, row, &positions)?;
            if let Placement::Clamped { c, .. } = placement {
                warnings.push(ClampWarning { atom: index, c });
            }
            trace!(atom = index, position = ?placement.position(), "Placed atom");
            positions.push(placement.position());
        }

        let mut molecule = Molecule::with_title(&zmatrix.title);
        for (row, position) in zmatrix.atoms().iter().zip(&positions) {
            molecule.add_atom(Atom::new(&row.symbol, *position));
        }

        for (index, row) in zmatrix.atoms().iter().enumerate() {
            if let Some(i) = row.i() {
                if !zmatrix.is_pointer_to_non_bonded(index, i) {
                    add_styled_bond(&mut molecule, template, index, i);
                }
            }
        }
        for &(a, b) in zmatrix.pointers_to_bonded() {
            if a >= molecule.atom_count() || b >= molecule.atom_count() || a == b {
                return Err(ZMatrixError::MalformedEntry {
                    atom: a.max(b),
                    reason: format!("bond pointer {}-{} is out of range", a, b),
                });
            }
            add_styled_bond(&mut molecule, template, a, b);
        }

        debug!(
            atoms = molecule.atom_count(),
            bonds = molecule.bonds().len(),
            clamped = warnings.len(),
            "Reconstructed Cartesian structure"
        );
        Ok(Reconstruction { molecule, warnings })
    }

    /// Places one atom given the positions of all earlier atoms.
    ///
    /// The row must already satisfy the shape rules checked during conversion.
    pub fn place_atom(
        &self,
        index: usize,
        row: &ZMatrixAtom,
        placed: &[Point3<f64>],
    ) -> Result<Placement, ZMatrixError> {
        let coords = row.coordinates();
        let reference = |r: Option<usize>| -> Result<Point3<f64>, ZMatrixError> {
            r.and_then(|r| placed.get(r).copied())
                .ok_or_else(|| malformed(index, "reference atom has not been placed"))
        };

        match index {
            0 => Ok(Placement::Exact(Point3::origin())),
            1 => {
                let i = reference(row.i())?;
                Ok(Placement::Exact(i + Vector3::z() * coords[0].value))
            }
            2 => {
                let i = reference(row.i())?;
                let j = reference(row.j())?;
                self.place_by_angle(index, &i, &j, coords[0].value, coords[1].value)
            }
            _ => {
                let i = reference(row.i())?;
                let j = reference(row.j())?;
                let k = reference(row.k())?;
                let d = coords[0].value;
                let a = coords[1].value.to_radians();
                let third = &coords[2];
                let b = third.value.to_radians();
                match third.effective_kind() {
                    ThirdCoordinateKind::Torsion => {
                        self.place_by_torsion(index, row, (&i, &j, &k), d, a, b)
                    }
                    kind => Ok(self.place_by_second_angle(
                        index,
                        (&i, &j, &k),
                        d,
                        a,
                        b,
                        kind.sign(),
                    )),
                }
            }
        }
    }

    fn place_by_angle(
        &self,
        index: usize,
        i: &Point3<f64>,
        j: &Point3<f64>,
        d: f64,
        angle_deg: f64,
    ) -> Result<Placement, ZMatrixError> {
        let ij = i - j;
        let r_ij = ij.norm();
        if r_ij < self.config.linearity_tolerance {
            return Err(malformed(index, "angle references coincide"));
        }
        let e = ij / r_ij;
        let planar = (e.x * e.x + e.y * e.y).sqrt();
        let p = if planar == 0.0 {
            Vector3::x()
        } else {
            Vector3::new(e.y, -e.x, 0.0) / planar
        };
        let a = angle_deg.to_radians();
        Ok(Placement::Exact(
            j + e * (r_ij - d * a.cos()) + p * (d * a.sin()),
        ))
    }

    fn place_by_torsion(
        &self,
        index: usize,
        row: &ZMatrixAtom,
        (i, j, k): (&Point3<f64>, &Point3<f64>, &Point3<f64>),
        d: f64,
        a: f64,
        b: f64,
    ) -> Result<Placement, ZMatrixError> {
        let t = self.config.linearity_tolerance;
        let (Some(e), Some(f)) = (unit(i - j, t), unit(j - k, t)) else {
            return Err(malformed(index, "torsion references coincide"));
        };
        let dot = e.dot(&f);
        if dot.abs() >= 1.0 - t {
            return Err(ZMatrixError::LinearGeometry {
                atom: index,
                reference: row.i().unwrap_or_default(),
            });
        }
        let n = f.cross(&e) / (1.0 - dot * dot).max(t).sqrt();
        let m = n.cross(&e);
        let offset = m * (a.sin() * b.cos()) + n * (a.sin() * b.sin()) - e * a.cos();
        Ok(Placement::Exact(i + offset * d))
    }

    fn place_by_second_angle(
        &self,
        index: usize,
        (i, j, k): (&Point3<f64>, &Point3<f64>, &Point3<f64>),
        d: f64,
        a: f64,
        b: f64,
        sign: f64,
    ) -> Placement {
        let t = self.config.linearity_tolerance;
        let u1 = unit(j - i, t).unwrap_or_else(Vector3::z);
        let u2 = unit(k - i, t).unwrap_or_else(Vector3::x);
        let cos_theta = u1.dot(&u2);
        let compl = (1.0 - cos_theta * cos_theta).max(t);
        let (cos_a, cos_b) = (a.cos(), b.cos());

        let alpha = (cos_a - cos_theta * cos_b) / compl;
        let beta = (cos_b - cos_theta * cos_a) / compl;
        let c = (1.0 - alpha * cos_a - beta * cos_b) / compl;

        let normal = u1.cross(&u2);
        if c >= 0.0 {
            let gamma = sign * c.sqrt();
            Placement::Exact(i + (u1 * alpha + u2 * beta + normal * gamma) * d)
        } else {
            if c < -CLAMP_NOISE_BAND {
                warn!(
                    atom = index,
                    c,
                    "Second angles of atom {} cannot both be satisfied (c = {:.3e}); out-of-plane term clamped to zero, position is approximate",
                    index,
                    c
                );
            } else {
                warn!(
                    atom = index,
                    c,
                    "Out-of-plane term of atom {} fell below zero (c = {:.3e}); clamped to zero",
                    index,
                    c
                );
            }
            Placement::Clamped {
                position: i + (u1 * alpha + u2 * beta) * d,
                c,
            }
        }
    }
}

/// Checks the row shape: `min(index, 3)` coordinates and earlier, distinct references.
fn validate_row(index: usize, row: &ZMatrixAtom) -> Result<(), ZMatrixError> {
    let expected = index.min(3);
    if row.coordinates().len() != expected {
        return Err(malformed(
            index,
            &format!(
                "expected {} internal coordinates, found {}",
                expected,
                row.coordinates().len()
            ),
        ));
    }
    let refs = row.references();
    for (slot, reference) in refs.iter().enumerate() {
        match reference {
            Some(r) if slot >= expected => {
                return Err(malformed(index, &format!("unexpected reference {}", r)));
            }
            Some(r) if *r >= index => {
                return Err(malformed(
                    index,
                    &format!("reference {} is not an earlier atom", r),
                ));
            }
            None if slot < expected => {
                return Err(malformed(index, "missing reference atom"));
            }
            _ => {}
        }
    }
    let defined: Vec<usize> = refs.iter().flatten().copied().collect();
    for (n, a) in defined.iter().enumerate() {
        if defined[n + 1..].contains(a) {
            return Err(malformed(index, &format!("reference {} is repeated", a)));
        }
    }
    if row.coordinates().iter().any(|ic| !ic.value.is_finite()) {
        return Err(malformed(index, "non-finite internal coordinate"));
    }
    Ok(())
}

fn add_styled_bond(molecule: &mut Molecule, template: Option<&Molecule>, a: usize, b: usize) {
    let bond = template
        .and_then(|t| t.bond_between(a, b))
        .copied()
        .unwrap_or_else(|| Bond::new(a, b, BondOrder::Single));
    molecule.add_bond_with(bond);
}

fn unit(v: Vector3<f64>, tolerance: f64) -> Option<Vector3<f64>> {
    let norm = v.norm();
    (norm >= tolerance).then(|| v / norm)
}

fn malformed(atom: usize, reason: &str) -> ZMatrixError {
    ZMatrixError::MalformedEntry {
        atom,
        reason: reason.to_string(),
    }
}
