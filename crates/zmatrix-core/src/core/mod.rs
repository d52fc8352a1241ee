//! # Core Module
//!
//! This module provides the data structures and stateless helpers the Z-matrix
//! engine is built on.
//!
//! ## Architecture
//!
//! - **Cartesian Representation** ([`models`]) - Atoms, bonds and molecules
//! - **Internal Coordinates** ([`zmatrix`]) - Z-matrix rows, internal coordinates and
//!   the bookkeeping that reconciles reference edges with real bonds
//! - **File I/O** ([`io`]) - The native Z-matrix text format and XYZ
//! - **Geometry** ([`utils`]) - Distance, angle and torsion primitives
//!
//! Nothing in this module holds state between calls; all algorithms that
//! derive or consume Z-matrices live in [`crate::engine`].

pub mod io;
pub mod models;
pub mod utils;
pub mod zmatrix;
