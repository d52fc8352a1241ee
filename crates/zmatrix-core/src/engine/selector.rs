use super::config::EngineConfig;
use super::error::ZMatrixError;
use crate::core::models::molecule::Molecule;
use crate::core::utils::geometry::{bond_angle, torsion_angle};
use crate::core::zmatrix::{ThirdCoordinateKind, ZMatrix};
use std::cmp::Ordering;
use tracing::{debug, trace};

/// How reference atoms are chosen while a Z-matrix is being built.
#[derive(Debug, Clone, Copy)]
pub enum SelectionStrategy<'a> {
    /// Connectivity-driven choice of references and third-coordinate kind.
    Heuristic,
    /// Heuristic references, but every third coordinate is a proper torsion.
    TorsionOnly,
    /// Reuse the references and kinds of an existing Z-matrix row by row.
    /// Only the chirality sign of second angles is recomputed.
    Template(&'a ZMatrix),
}

/// The references chosen for one atom, shaped by its position in the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum References {
    Origin,
    Distance {
        i: usize,
    },
    Angle {
        i: usize,
        j: usize,
    },
    Third {
        i: usize,
        j: usize,
        k: usize,
        kind: ThirdCoordinateKind,
    },
}

/// Picks up to three already-placed reference atoms for each atom of a molecule.
///
/// Only atoms with an index strictly lower than the current one are eligible.
/// Among eligible candidates the least-connected atom wins, then the lightest,
/// then the one with the lowest index.
pub struct ReferenceAtomSelector<'a> {
    molecule: &'a Molecule,
    config: &'a EngineConfig,
}

impl<'a> ReferenceAtomSelector<'a> {
    pub fn new(molecule: &'a Molecule, config: &'a EngineConfig) -> Self {
        Self { molecule, config }
    }

    /// Chooses the references of `atom`.
    ///
    /// # Arguments
    ///
    /// * `atom` - Index of the atom being defined.
    /// * `partial` - The Z-matrix rows built so far (atoms `0..atom`).
    /// * `strategy` - How references and kinds are decided.
    ///
    /// # Errors
    ///
    /// Returns [`ZMatrixError::NoReferenceAtom`] when the atom order does not
    /// follow connectivity, [`ZMatrixError::LinearReferences`] when every
    /// candidate for the third reference is collinear, and
    /// [`ZMatrixError::InvalidTemplate`] for unusable template rows.
    pub fn select(
        &self,
        atom: usize,
        partial: &ZMatrix,
        strategy: &SelectionStrategy<'_>,
    ) -> Result<References, ZMatrixError> {
        if atom == 0 {
            return Ok(References::Origin);
        }
        let refs = match strategy {
            SelectionStrategy::Template(template) => self.from_template(atom, template)?,
            SelectionStrategy::Heuristic => self.heuristic(atom, partial)?,
            SelectionStrategy::TorsionOnly => match self.heuristic(atom, partial)? {
                References::Third { i, j, k, .. } => References::Third {
                    i,
                    j,
                    k,
                    kind: ThirdCoordinateKind::Torsion,
                },
                other => other,
            },
        };
        debug!(atom, ?refs, "Selected reference atoms");
        Ok(refs)
    }

    fn heuristic(&self, atom: usize, partial: &ZMatrix) -> Result<References, ZMatrixError> {
        let i = self.choose_first(atom)?;
        if atom == 1 {
            return Ok(References::Distance { i });
        }
        let j = self.choose_second(atom, i)?;
        if atom == 2 {
            return Ok(References::Angle { i, j });
        }
        let (k, kind) = self.choose_third(atom, i, j, partial)?;
        Ok(References::Third { i, j, k, kind })
    }

    fn choose_first(&self, atom: usize) -> Result<usize, ZMatrixError> {
        let candidates = self.placed_neighbors(atom, atom);
        self.best(candidates)
            .ok_or(ZMatrixError::NoReferenceAtom { atom, role: "distance" })
    }

    fn choose_second(&self, atom: usize, i: usize) -> Result<usize, ZMatrixError> {
        let candidates = self.placed_neighbors(i, atom);
        self.best(candidates)
            .ok_or(ZMatrixError::NoReferenceAtom { atom, role: "angle" })
    }

    fn choose_third(
        &self,
        atom: usize,
        i: usize,
        j: usize,
        partial: &ZMatrix,
    ) -> Result<(usize, ThirdCoordinateKind), ZMatrixError> {
        let second_angle =
            partial.uses_torsion(i, j) || self.placed_neighbors(j, atom).len() == 1;

        let k = if second_angle {
            let candidates = self
                .placed_neighbors(i, atom)
                .into_iter()
                .filter(|&nbr| nbr != j)
                .filter(|&nbr| {
                    let angle = bond_angle(
                        &self.position(nbr),
                        &self.position(i),
                        &self.position(j),
                    );
                    let min = self.config.min_reference_angle;
                    let admissible = angle > min && angle < 180.0 - min;
                    trace!(atom, candidate = nbr, angle, admissible, "Second-angle candidate");
                    admissible
                })
                .collect();
            self.best(candidates)
        } else {
            let candidates = self
                .placed_neighbors(j, atom)
                .into_iter()
                .filter(|&nbr| nbr != i)
                .inspect(|&nbr| trace!(atom, candidate = nbr, "Torsion candidate"))
                .collect();
            self.best(candidates)
        };

        let k = k.ok_or(ZMatrixError::LinearReferences { atom, i, j })?;
        let kind = if second_angle {
            self.chirality(atom, i, j, k)
        } else {
            ThirdCoordinateKind::Torsion
        };
        Ok((k, kind))
    }

    fn from_template(&self, atom: usize, template: &ZMatrix) -> Result<References, ZMatrixError> {
        let invalid = |reason: &str| ZMatrixError::InvalidTemplate {
            atom,
            reason: reason.to_string(),
        };
        let row = template
            .atom(atom)
            .ok_or_else(|| invalid("no template row"))?;
        let check = |reference: Option<usize>, slot: &str| -> Result<usize, ZMatrixError> {
            match reference {
                Some(r) if r < atom => Ok(r),
                Some(_) => Err(invalid(&format!(
                    "{} reference is not an earlier atom",
                    slot
                ))),
                None => Err(invalid(&format!("missing {} reference", slot))),
            }
        };

        let i = check(row.i(), "distance")?;
        if atom == 1 {
            return Ok(References::Distance { i });
        }
        let j = check(row.j(), "angle")?;
        if i == j {
            return Err(invalid("repeated reference atom"));
        }
        if atom == 2 {
            return Ok(References::Angle { i, j });
        }
        let k = check(row.k(), "third")?;
        if k == i || k == j {
            return Err(invalid("repeated reference atom"));
        }
        let kind = match row.third_kind() {
            Some(ThirdCoordinateKind::Torsion) => ThirdCoordinateKind::Torsion,
            Some(_) => self.chirality(atom, i, j, k),
            None => return Err(invalid("missing third coordinate")),
        };
        Ok(References::Third { i, j, k, kind })
    }

    /// Second-angle chirality tag derived from the current geometry.
    fn chirality(&self, atom: usize, i: usize, j: usize, k: usize) -> ThirdCoordinateKind {
        let torsion = torsion_angle(
            &self.position(atom),
            &self.position(i),
            &self.position(j),
            &self.position(k),
        );
        if torsion > 0.0 {
            ThirdCoordinateKind::AngleNegative
        } else {
            ThirdCoordinateKind::AnglePositive
        }
    }

    /// Neighbors of `center` that are already placed when `current` is defined.
    fn placed_neighbors(&self, center: usize, current: usize) -> Vec<usize> {
        self.molecule
            .bonded_neighbors(center)
            .unwrap_or(&[])
            .iter()
            .copied()
            .filter(|&nbr| nbr < current)
            .collect()
    }

    fn best(&self, candidates: Vec<usize>) -> Option<usize> {
        candidates
            .into_iter()
            .min_by(|&a, &b| self.compare_candidates(a, b))
    }

    fn compare_candidates(&self, a: usize, b: usize) -> Ordering {
        let (conn_a, mass_a) = self.rank_key(a);
        let (conn_b, mass_b) = self.rank_key(b);
        conn_a
            .cmp(&conn_b)
            .then_with(|| mass_a.total_cmp(&mass_b))
            .then_with(|| a.cmp(&b))
    }

    fn rank_key(&self, index: usize) -> (usize, f64) {
        let connectivity = self.molecule.connectivity(index);
        match self.molecule.atom(index) {
            Some(atom) if atom.is_dummy && connectivity == 1 => {
                (self.config.dummy_connectivity, atom.mass)
            }
            Some(atom) => (connectivity, atom.mass),
            None => (usize::MAX, f64::MAX),
        }
    }

    fn position(&self, index: usize) -> nalgebra::Point3<f64> {
        self.molecule
            .atom(index)
            .map(|a| a.position)
            .unwrap_or_else(nalgebra::Point3::origin)
    }
}
