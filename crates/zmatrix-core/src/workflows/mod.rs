//! # Workflows Module
//!
//! High-level entry points that tie the [`crate::engine`] components and the
//! [`crate::core`] data models together into complete procedures.
//!
//! - **Conversion** ([`convert`]) - Molecule to Z-matrix and back in one call,
//!   plus re-derivation of an existing Z-matrix with another selection strategy.
//! - **Displacement** ([`displace`]) - Application of an internal-coordinate
//!   delta at a list of scale factors, with Cartesian reconstruction of every
//!   displaced structure.

pub mod convert;
pub mod displace;
