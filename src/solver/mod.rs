//! Implicit solver for daily soil-water redistribution.
//!
//! This module provides the numerical engine that moves water through a
//! soil column, one simulated day at a time.
//!
//! ## Discretization
//!
//! Following CLM 4.5 (Oleson et al. 2013, section 7.4), the mixed-form
//! Richards equation is linearized around the current water content.
//! Each active layer contributes one equation coupling it to the layers
//! above and below:
//!
//! ```text
//! a_i * d(theta_{i-1}) + b_i * d(theta_i) + c_i * d(theta_{i+1}) = r_i
//! ```
//!
//! where the coefficients come from the inter-layer flux sensitivities
//! and the right-hand side from today's fluxes and forcing. The system
//! is tridiagonal and solved directly by the Thomas algorithm; there is
//! no sub-daily iteration.
//!
//! Frozen layers do not move water. A scan restricts the solve to the
//! contiguous run of sufficiently unfrozen layers between the first
//! eligible soil layer and the drain layer, and partially frozen edge
//! layers enter with their unfrozen slice only.

mod assemble;
mod richards;
mod scan;
mod tables;
mod tridiag;

pub use richards::{DayForcing, RichardsSolver, SolveOutcome, SolverConfig};
pub use scan::ActiveBand;

/// Minimum unfrozen layer thickness in meters for a layer to join the
/// active band.
pub const MIN_UNFROZEN_DZ: f64 = 0.005;
