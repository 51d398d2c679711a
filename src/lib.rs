//! # Vadose Core
//!
//! An implicit soil-water movement solver for layered soil columns.
//!
//! This library provides:
//! - A soil column model of stacked moss, organic and mineral layers
//! - Campbell retention-curve physics (matric potential, hydraulic conductivity)
//! - A one-day implicit finite-difference solve of the mixed-form Richards
//!   equation, following the CLM 4.5 formulation (Oleson et al. 2013,
//!   NCAR/TN-503+STR, section 7.4)
//! - Clamped write-back of the solved water contents into the column
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`column`] - Soil column and layer representation
//! - [`physics`] - Constitutive relations (retention curve, conductivity)
//! - [`solver`] - Band scan, coefficient assembly, tridiagonal solve, update
//!
//! ## Usage
//!
//! ```
//! use vadose_core::{DayForcing, HydraulicParams, LayerKind, RichardsSolver, SoilColumn, SoilLayer};
//!
//! let mut column = SoilColumn::new();
//! column.push(SoilLayer::new(LayerKind::Mineral, 0.1, HydraulicParams::sand()).with_water(5.0, 20.0))?;
//! column.push(SoilLayer::new(LayerKind::Mineral, 0.2, HydraulicParams::sand()).with_water(10.0, 40.0))?;
//!
//! let transpiration = [0.0, 0.0];
//! let forcing = DayForcing {
//!     infiltration: 1.0e-3,
//!     evaporation: 0.0,
//!     transpiration: &transpiration,
//!     base_flow: 0.5,
//!     drain_depth: 0.3,
//! };
//!
//! let mut solver = RichardsSolver::new();
//! let outcome = solver.update(&mut column, 1, 2, &forcing)?;
//! assert!(outcome.band.is_some());
//! # Ok::<(), vadose_core::VadoseError>(())
//! ```
//!
//! ## Solution Method
//!
//! One call to [`RichardsSolver::update`] advances one column by one day:
//!
//! 1. Scan the column for the contiguous band of sufficiently unfrozen
//!    layers between the first eligible soil layer and the drain layer
//! 2. Derive water content, matric potential, equilibrium state, hydraulic
//!    conductivity and their sensitivities per active layer
//! 3. Assemble one tridiagonal row per layer (top, interior and drain rows
//!    carry different boundary terms) and solve for the water-content change
//! 4. Add each change to the layer's minimum bound, clamp into the physical
//!    range, and write the result back into the column
//!
//! The scheme is a single implicit step per day; there is no sub-daily
//! iteration and no convergence loop.

pub mod column;
pub mod error;
pub mod physics;
pub mod solver;

// Re-export main types for convenience
pub use column::{FrozenState, HydraulicParams, LayerKind, SoilColumn, SoilLayer};
pub use error::{Result, VadoseError};
pub use solver::{ActiveBand, DayForcing, RichardsSolver, SolveOutcome, SolverConfig};

/// Density of liquid water in kg/m^3
pub const DENSITY_WATER: f64 = 1000.0;

/// Seconds in one simulated day (the implicit timestep)
pub const SEC_IN_DAY: f64 = 86400.0;

/// Maximum number of layers a soil column may hold
pub const MAX_SOIL_LAYERS: usize = 32;
