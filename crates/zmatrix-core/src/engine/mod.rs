//! # Engine Module
//!
//! This module implements the Z-matrix engine: the algorithms that turn a
//! Cartesian structure into internal coordinates, rebuild Cartesian
//! coordinates from them, and displace a Z-matrix along another one.
//!
//! ## Overview
//!
//! Every component is a small, stateless worker borrowing an [`config::EngineConfig`].
//! Mutable bookkeeping (name counters, consumed bonds) lives only inside a
//! single call, so the same component can be reused freely.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Tolerances and ranking settings, with a validating builder
//! - **Reference Selection** ([`selector`]) - Choice of the I, J, K reference atoms for each atom
//! - **Forward Construction** ([`builder`]) - Cartesian structure to Z-matrix
//! - **Reconstruction** ([`converter`]) - Z-matrix to Cartesian structure and bond graph
//! - **Displacement** ([`delta`]) - Scaled application and subtraction of Z-matrices
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod builder;
pub mod config;
pub mod converter;
pub mod delta;
pub mod error;
pub mod selector;
