//! # Z-Matrix Data Model
//!
//! Value types describing a structure by internal coordinates: each atom is
//! placed by a distance, an angle and a third coordinate relative to up to
//! three previously defined atoms.
//!
//! - [`coordinate`] - A named internal coordinate and the kind of a third coordinate
//! - [`atom`] - One Z-matrix row with its references and coordinates
//! - [`matrix`] - The ordered rows plus bond-graph reconciliation pointers

pub mod atom;
pub mod coordinate;
pub mod matrix;

pub use atom::ZMatrixAtom;
pub use coordinate::{InternalCoordinate, ThirdCoordinateKind};
pub use matrix::ZMatrix;
