//! Constitutive soil-water relations.
//!
//! Free functions implementing the Campbell retention curve and the
//! saturation-dependent hydraulic conductivity of CLM 4.5, together with
//! the water-content sensitivities the implicit scheme needs. The solver
//! keeps its per-layer state in flat tables, so everything here takes
//! scalars rather than layer references.

pub mod conductivity;
pub mod retention;
