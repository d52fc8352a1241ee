//! Provides input/output functionality for structure file formats.
//!
//! This module contains the native Z-matrix text format and the plain XYZ
//! Cartesian format. Both implement the [`traits::StructureFile`] trait, which
//! offers reader/writer entry points and path-based convenience methods.

pub mod traits;
pub mod xyz;
pub mod zmat;
