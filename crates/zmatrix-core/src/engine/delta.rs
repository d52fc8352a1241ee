use super::config::EngineConfig;
use super::error::ZMatrixError;
use crate::core::utils::geometry::wrap_degrees;
use crate::core::zmatrix::{InternalCoordinate, ZMatrix};
use tracing::{debug, trace};

/// Applies internal-coordinate displacements to a Z-matrix.
///
/// The inputs are never modified; every call returns a new Z-matrix carrying
/// the base's title, references and reconciliation pointers.
pub struct DeltaApplier<'a> {
    config: &'a EngineConfig,
}

impl<'a> DeltaApplier<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Computes `base + scale * delta`, coordinate by coordinate.
    ///
    /// Angles are wrapped into `(-180, 180]`. A second angle whose sine
    /// changes sign has its chirality flipped so the atom stays on the
    /// displaced side of the reference plane.
    ///
    /// # Arguments
    ///
    /// * `base` - The Z-matrix being displaced.
    /// * `delta` - A Z-matrix over the same atoms holding the displacement.
    /// * `scale` - Factor applied to every displacement value.
    ///
    /// # Errors
    ///
    /// Returns [`ZMatrixError::AtomCountMismatch`] if the Z-matrices differ in
    /// size, or [`ZMatrixError::TopologyMismatch`] if an entry is defined over
    /// different atoms.
    pub fn apply(
        &self,
        base: &ZMatrix,
        delta: &ZMatrix,
        scale: f64,
    ) -> Result<ZMatrix, ZMatrixError> {
        if base.len() != delta.len() {
            return Err(ZMatrixError::AtomCountMismatch {
                base: base.len(),
                delta: delta.len(),
            });
        }

        let mut result = base.clone();
        let mut changed = 0usize;
        for (index, (row, delta_row)) in result
            .atoms_mut()
            .iter_mut()
            .zip(delta.atoms())
            .enumerate()
        {
            if !row.same_ids_as(delta_row) {
                return Err(ZMatrixError::TopologyMismatch { index });
            }
            for (ic, delta_ic) in row
                .coordinates_mut()
                .iter_mut()
                .zip(delta_row.coordinates())
            {
                if self.displace(ic, scale * delta_ic.value) {
                    changed += 1;
                }
            }
        }

        debug!(scale, changed, "Applied Z-matrix displacement");
        Ok(result)
    }

    /// Computes `a - b`.
    pub fn subtract(&self, a: &ZMatrix, b: &ZMatrix) -> Result<ZMatrix, ZMatrixError> {
        self.apply(a, b, -1.0)
    }

    fn displace(&self, ic: &mut InternalCoordinate, step: f64) -> bool {
        if step.abs() < self.config.delta_threshold {
            return false;
        }
        let old = ic.value;
        let unwrapped = old + step;
        match ic.order() {
            2 => ic.value = unwrapped,
            3 => ic.value = wrap_degrees(unwrapped),
            _ => {
                ic.value = wrap_degrees(unwrapped);
                let crosses = old.to_radians().sin() * unwrapped.to_radians().sin() < 0.0;
                if let Some(kind) = ic.kind.filter(|k| k.is_second_angle() && crosses) {
                    trace!(name = %ic.name, old, new = ic.value, "Second angle changed side");
                    ic.kind = Some(kind.flipped());
                }
            }
        }
        true
    }
}
