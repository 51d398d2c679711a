//! Daily Richards-equation solve over a soil column.
//!
//! [`RichardsSolver::update`] is the entry point: it scans the column for
//! the active band, assembles and solves the tridiagonal system, writes
//! the clamped water contents back into the layers and gives excluded
//! moss layers an approximate content. One call advances one column by
//! one day.

use log::warn;

use crate::column::SoilColumn;
use crate::error::{Result, VadoseError};
use crate::{DENSITY_WATER, SEC_IN_DAY};

use super::assemble::{assemble_rows, compute_potentials};
use super::scan::{scan_column, ActiveBand};
use super::tables::{LayerTables, TridiagSystem, TABLE_LEN};
use super::{tridiag, MIN_UNFROZEN_DZ};

/// Configuration for [`RichardsSolver`].
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Minimum unfrozen thickness in meters for a layer to join the
    /// active band
    pub min_unfrozen_dz: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            min_unfrozen_dz: MIN_UNFROZEN_DZ,
        }
    }
}

impl SolverConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum unfrozen thickness (meters).
    ///
    /// Thinner unfrozen slices are numerically fragile; a layer under
    /// the threshold ends the active band.
    pub fn with_min_unfrozen_dz(mut self, min_unfrozen_dz: f64) -> Self {
        self.min_unfrozen_dz = min_unfrozen_dz;
        self
    }
}

/// Surface and subsurface water forcing for one simulated day.
///
/// All rates are in mm/s. The transpiration slice is indexed by solver
/// position: `transpiration[i]` belongs to the layer with
/// `solind == i + 1`, and the slice must cover every layer down to the
/// drain layer.
#[derive(Debug, Clone)]
pub struct DayForcing<'a> {
    /// Water entering the top of the column (mm/s)
    pub infiltration: f64,
    /// Water leaving the top of the column (mm/s)
    pub evaporation: f64,
    /// Per-layer root water uptake (mm/s)
    pub transpiration: &'a [f64],
    /// Fraction of the drain-layer conductivity leaving as baseflow,
    /// in [0, 1]
    pub base_flow: f64,
    /// Depth of the water table below the surface (m); non-positive
    /// means the column drains at the surface and nothing moves
    pub drain_depth: f64,
}

/// What one day's solve did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveOutcome {
    /// The band of layers that took part, if any
    pub band: Option<ActiveBand>,
    /// Water leaving through the bottom boundary over the day (mm)
    pub drainage: f64,
}

impl SolveOutcome {
    fn skipped() -> Self {
        Self {
            band: None,
            drainage: 0.0,
        }
    }
}

/// One-day implicit solver for soil-water movement.
///
/// Owns the per-layer working tables. They are cleared at the start of
/// every call and nothing carries over, so a single solver instance can
/// serve any number of independent columns sequentially.
#[derive(Debug)]
pub struct RichardsSolver {
    config: SolverConfig,
    tables: LayerTables,
    system: TridiagSystem,
    /// Solved water-content change per active layer (mm)
    delta: [f64; TABLE_LEN],
}

impl Default for RichardsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl RichardsSolver {
    /// Create a solver with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SolverConfig::default())
    }

    /// Create a solver with a custom configuration.
    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            config,
            tables: LayerTables::new(),
            system: TridiagSystem::new(),
            delta: [0.0; TABLE_LEN],
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Advance one column by one simulated day.
    ///
    /// `first_soil` and `drain` are 1-based solver indices: the first
    /// soil layer eligible for the solve and the layer holding the water
    /// table (or the column bottom). Moss layers at `first_soil` and
    /// below it are skipped, then the band scan starts. The liquid water
    /// of every active layer is updated in place, clamped into its
    /// physical bounds; skipped moss layers receive the volumetric
    /// content of the layer below them.
    ///
    /// Returns the band that was solved and the drainage leaving the
    /// column bottom. With a non-positive `drain_depth` the whole update
    /// is a no-op.
    pub fn update(
        &mut self,
        column: &mut SoilColumn,
        first_soil: usize,
        drain: usize,
        forcing: &DayForcing<'_>,
    ) -> Result<SolveOutcome> {
        if forcing.drain_depth <= 0.0 {
            return Ok(SolveOutcome::skipped());
        }

        self.validate(column, first_soil, drain, forcing)?;

        self.tables.clear();
        self.system.clear();
        self.delta.fill(0.0);

        // Moss layers do not join the solve; their water is approximated
        // afterwards from the layer below
        let mut top = first_soil;
        while column
            .layer(top)
            .map_or(false, |l| !l.kind.is_hydrologically_active())
        {
            top += 1;
        }
        if column.layer(top).is_none() {
            return Ok(SolveOutcome::skipped());
        }

        let band = scan_column(
            column,
            top,
            drain,
            forcing.drain_depth,
            self.config.min_unfrozen_dz,
            &mut self.tables,
        );

        if let Some(band) = band {
            // Water-table depth in mm drives the equilibrium profile
            let z_watertab = forcing.drain_depth * 1.0e3;
            compute_potentials(&mut self.tables, band, z_watertab);
            assemble_rows(&mut self.tables, &mut self.system, band, drain, forcing);

            let rows = band.first..=band.last();
            tridiag::solve(
                &self.system.sub[rows.clone()],
                &self.system.diag[rows.clone()],
                &self.system.sup[rows.clone()],
                &self.system.rhs[rows.clone()],
                &mut self.delta[rows],
            )?;

            self.apply_deltas(column, band);
        }

        self.propagate_excluded(column, first_soil, top);

        // Baseflow leaves through the drain layer at a rate set by its
        // conductivity; zero when the band never reached it
        let drainage = self.tables.k[drain] * forcing.base_flow * SEC_IN_DAY;

        Ok(SolveOutcome { band, drainage })
    }

    fn validate(
        &self,
        column: &SoilColumn,
        first_soil: usize,
        drain: usize,
        forcing: &DayForcing<'_>,
    ) -> Result<()> {
        let len = column.len();
        if first_soil == 0 || first_soil > len {
            return Err(VadoseError::IndexOutOfRange {
                index: first_soil,
                len,
            });
        }
        if drain == 0 || drain > len {
            return Err(VadoseError::IndexOutOfRange { index: drain, len });
        }
        if first_soil > drain {
            return Err(VadoseError::InvertedRange {
                first: first_soil,
                drain,
            });
        }
        if forcing.transpiration.len() < drain {
            return Err(VadoseError::TranspirationTooShort {
                got: forcing.transpiration.len(),
                need: drain,
            });
        }
        Ok(())
    }

    /// Add each solved change to the layer's minimum bound and clamp the
    /// result into the physical range.
    fn apply_deltas(&self, column: &mut SoilColumn, band: ActiveBand) {
        for ind in band.indices() {
            let min_liq = self.tables.eff_min_liq[ind];
            let max_liq = self.tables.eff_max_liq[ind];
            let delta = self.delta[ind];

            if !delta.is_finite() {
                warn!("non-finite water change for layer {ind}: {delta}");
            }

            let mut liq = delta + min_liq;
            if liq < min_liq {
                liq = min_liq;
            }
            if liq > max_liq {
                liq = max_liq;
            }
            if let Some(layer) = column.layer_mut(ind) {
                layer.liq = liq;
            }
        }
    }

    /// Approximate the water of excluded layers above the scan start:
    /// walking upward, the unfrozen part of each takes the volumetric
    /// content of the layer below it.
    fn propagate_excluded(&self, column: &mut SoilColumn, first_soil: usize, top: usize) {
        for ind in (first_soil..top).rev() {
            let below_vol = match column.layer(ind + 1) {
                Some(below) => below.vol_liq(),
                None => continue,
            };
            if let Some(layer) = column.layer_mut(ind) {
                layer.liq = layer.dz * (1.0 - layer.frozen_frac) * below_vol * DENSITY_WATER;
            }
        }
    }
}
