//! # Z-Matrix Core Library
//!
//! Conversion between Cartesian atomic structures and Z-matrix internal
//! coordinates, and displacement of structures along internal coordinates.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Plain data models (`Molecule`, `ZMatrix`),
//!   geometry primitives, and file I/O for the Z-matrix text format and XYZ.
//!
//! - **[`engine`]: The Logic Core.** Reference-atom selection, forward
//!   construction of Z-matrices, Cartesian reconstruction with explicit
//!   handling of near-linear geometry, and delta application.
//!
//! - **[`workflows`]: The Public API.** One-call conversions and the
//!   multi-scale displacement procedure built on top of the engine.

pub mod core;
pub mod engine;
pub mod workflows;
