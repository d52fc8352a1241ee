//! # Core Models Module
//!
//! This module contains the Cartesian data structures that the Z-matrix engine
//! consumes and produces.
//!
//! ## Key Components
//!
//! - [`atom`] - A single center with element symbol, position, mass and dummy flag
//! - [`topology`] - Bonds, bond orders and stereo annotations
//! - [`molecule`] - An ordered set of atoms plus its bond graph
//! - [`element`] - Standard atomic weights used to rank reference candidates
//!
//! ## Usage
//!
//! ```ignore
//! use zmatrix::core::models::{atom::Atom, molecule::Molecule, topology::BondOrder};
//!
//! let mut mol = Molecule::with_title("hydrogen");
//! let h1 = mol.add_atom(Atom::new("H", Point3::origin()));
//! let h2 = mol.add_atom(Atom::new("H", Point3::new(0.74, 0.0, 0.0)));
//! mol.add_bond(h1, h2, BondOrder::Single);
//! ```

pub mod atom;
pub mod element;
pub mod molecule;
pub mod topology;
