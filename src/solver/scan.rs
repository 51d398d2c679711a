//! Column scan: find the active band and derive per-layer geometry.
//!
//! The scan walks the column downward from the requested start and
//! collects the contiguous run of layers that can move water today. A
//! layer qualifies when its unfrozen thickness reaches the configured
//! minimum and it lies at or above the drain layer; the first layer that
//! fails either test ends the band, regardless of what lies below.
//!
//! Qualified layers get their geometry reduced to the part that actually
//! conducts water: partially frozen layers shrink to their unfrozen
//! slice, and a drain layer containing the water table shrinks to the
//! slice above it. Node depths follow the unfrozen slice, which sits at
//! the top of a layer under a thawing front and at the bottom under a
//! freezing front.

use log::warn;

use crate::column::SoilColumn;
use crate::DENSITY_WATER;

use super::tables::LayerTables;

/// Contiguous run of 1-based solver indices taking part in one solve.
///
/// `count` is always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveBand {
    /// Solver index of the first (shallowest) active layer
    pub first: usize,
    /// Number of active layers
    pub count: usize,
}

impl ActiveBand {
    /// Solver index of the last active layer.
    pub fn last(&self) -> usize {
        self.first + self.count - 1
    }

    /// Iterate the band's solver indices.
    pub fn indices(&self) -> std::ops::Range<usize> {
        self.first..self.first + self.count
    }

    /// Whether a solver index falls inside the band.
    pub fn contains(&self, solind: usize) -> bool {
        self.indices().contains(&solind)
    }
}

/// Walk the column from `top` toward `drain`, qualify layers for the
/// solve and populate the geometric and effective-water tables.
///
/// Returns `None` when not even the first layer qualifies.
pub(crate) fn scan_column(
    column: &SoilColumn,
    top: usize,
    drain: usize,
    drain_depth: f64,
    min_unfrozen_dz: f64,
    tables: &mut LayerTables,
) -> Option<ActiveBand> {
    let mut first = None;
    let mut count = 0;

    for layer in column.iter().skip(top - 1) {
        let ind = layer.solind;
        if layer.unfrozen_dz() < min_unfrozen_dz || ind > drain {
            break;
        }
        if first.is_none() {
            first = Some(ind);
        }
        count += 1;

        // Reduce the layer to its conducting slice
        let mut front_dz_adj = 1.0;
        let mut front_z_adj = 0.0;
        let mut drain_adj = 1.0;

        if layer.frozen.has_front() {
            front_dz_adj = 1.0 - layer.frozen_frac;
            if first == Some(ind) || ind == drain {
                front_z_adj = (layer.dz * layer.frozen_frac).max(0.0);
            }
        } else if ind == drain {
            // Water table sits inside the drain layer
            drain_adj = (drain_depth - layer.z) / layer.dz;
        }

        let min_vol_liq = layer.min_liq / DENSITY_WATER / layer.dz;
        tables.theta_sat[ind] = (layer.hydraulics.porosity - min_vol_liq).max(0.0);
        tables.dzmm[ind] = layer.dz * 1.0e3 * front_dz_adj.min(drain_adj);

        // Under a thawing front the frozen slice lies at the layer
        // bottom; under a freezing front it lies at the top.
        let thawing = match column.layer(ind - 1) {
            Some(above) => !above.frozen.is_frozen(),
            None => column
                .layer(ind + 1)
                .map_or(false, |below| below.frozen.is_frozen()),
        };
        if thawing {
            tables.z_h[ind] = (layer.z + layer.dz - front_z_adj) * 1.0e3;
            tables.node_mm[ind] = tables.z_h[ind] - 0.5 * tables.dzmm[ind];
        } else {
            tables.z_h[ind] = (layer.z + layer.dz) * 1.0e3;
            tables.node_mm[ind] = (layer.z + front_z_adj) * 1.0e3 + 0.5 * tables.dzmm[ind];
        }

        tables.eff_min_liq[ind] = layer.min_liq * front_dz_adj.min(drain_adj);
        tables.eff_max_liq[ind] = tables.theta_sat[ind] * tables.dzmm[ind];
        tables.eff_liq[ind] = (layer.liq * drain_adj - tables.eff_min_liq[ind]).max(0.0);

        if tables.eff_liq[ind] < 0.0
            || tables.eff_min_liq[ind] < 0.0
            || tables.eff_max_liq[ind] < 0.0
        {
            warn!("effective liquid bounds negative for layer {ind}");
        }

        tables.psi_sat[ind] = layer.hydraulics.psi_sat;
        tables.k_sat[ind] = layer.hydraulics.k_sat;
        tables.bsw[ind] = layer.hydraulics.bsw;
    }

    first.map(|first| ActiveBand { first, count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{FrozenState, HydraulicParams, LayerKind, SoilLayer};
    use approx::assert_relative_eq;

    fn params() -> HydraulicParams {
        HydraulicParams {
            porosity: 0.4,
            psi_sat: -10.0,
            k_sat: 1.0e-5,
            bsw: 4.0,
        }
    }

    fn wet_layer(dz: f64) -> SoilLayer {
        SoilLayer::new(LayerKind::Mineral, dz, params()).with_water(5.0, 30.0)
    }

    #[test]
    fn test_scan_single_layer() {
        let column = SoilColumn::from_layers([wet_layer(0.1)]).unwrap();
        let mut tables = LayerTables::new();

        let band = scan_column(&column, 1, 1, 0.1, 0.005, &mut tables).unwrap();
        assert_eq!(band, ActiveBand { first: 1, count: 1 });
        assert_eq!(band.last(), 1);

        // Porosity less the immobile 5 mm over 100 mm of soil
        assert_relative_eq!(tables.theta_sat[1], 0.35, max_relative = 1e-12);
        assert_relative_eq!(tables.dzmm[1], 100.0, max_relative = 1e-12);
        assert_relative_eq!(tables.z_h[1], 100.0, max_relative = 1e-12);
        assert_relative_eq!(tables.node_mm[1], 50.0, max_relative = 1e-12);
        assert_relative_eq!(tables.eff_min_liq[1], 5.0, max_relative = 1e-12);
        assert_relative_eq!(tables.eff_max_liq[1], 35.0, max_relative = 1e-12);
        assert_relative_eq!(tables.eff_liq[1], 25.0, max_relative = 1e-12);
        assert_relative_eq!(tables.psi_sat[1], -10.0);
        assert_relative_eq!(tables.k_sat[1], 1.0e-5);
        assert_relative_eq!(tables.bsw[1], 4.0);
    }

    #[test]
    fn test_scan_is_idempotent() {
        let column = SoilColumn::from_layers([wet_layer(0.1), wet_layer(0.2)]).unwrap();
        let mut tables = LayerTables::new();

        let band1 = scan_column(&column, 1, 2, 0.3, 0.005, &mut tables);
        let snapshot = tables.clone();
        let band2 = scan_column(&column, 1, 2, 0.3, 0.005, &mut tables);

        assert_eq!(band1, band2);
        assert_eq!(tables, snapshot);
    }

    #[test]
    fn test_scan_rejects_frozen_top() {
        let column = SoilColumn::from_layers([
            wet_layer(0.1).with_frozen(FrozenState::Frozen, 1.0),
            wet_layer(0.1),
        ])
        .unwrap();
        let mut tables = LayerTables::new();

        // The band must start at the scan start; a frozen first layer
        // means no solve even though thawed soil lies below
        assert_eq!(scan_column(&column, 1, 2, 0.2, 0.005, &mut tables), None);
    }

    #[test]
    fn test_scan_stops_below_minimum_unfrozen_thickness() {
        let thin = wet_layer(0.1).with_frozen(FrozenState::PartiallyFrozen, 0.96);
        let column = SoilColumn::from_layers([thin]).unwrap();
        let mut tables = LayerTables::new();
        // 4 mm of unfrozen soil is under the 5 mm floor
        assert_eq!(scan_column(&column, 1, 1, 0.1, 0.005, &mut tables), None);

        let workable = wet_layer(0.1).with_frozen(FrozenState::PartiallyFrozen, 0.9);
        let column = SoilColumn::from_layers([workable]).unwrap();
        let band = scan_column(&column, 1, 1, 0.1, 0.005, &mut tables).unwrap();
        assert_eq!(band.count, 1);
    }

    #[test]
    fn test_scan_ends_band_at_frozen_interior_layer() {
        let column = SoilColumn::from_layers([
            wet_layer(0.1),
            wet_layer(0.1).with_frozen(FrozenState::Frozen, 1.0),
            wet_layer(0.1),
        ])
        .unwrap();
        let mut tables = LayerTables::new();

        let band = scan_column(&column, 1, 3, 0.3, 0.005, &mut tables).unwrap();
        assert_eq!(band, ActiveBand { first: 1, count: 1 });
        assert!(!band.contains(3));
        // Nothing below the break is derived
        assert_eq!(tables.dzmm[3], 0.0);
    }

    #[test]
    fn test_scan_water_table_inside_drain_layer() {
        let column = SoilColumn::from_layers([wet_layer(0.1), wet_layer(0.1)]).unwrap();
        let mut tables = LayerTables::new();

        // Water table at 0.15 m: the drain layer conducts only its upper
        // half
        let band = scan_column(&column, 1, 2, 0.15, 0.005, &mut tables).unwrap();
        assert_eq!(band.count, 2);
        assert_relative_eq!(tables.dzmm[1], 100.0, max_relative = 1e-12);
        assert_relative_eq!(tables.dzmm[2], 50.0, max_relative = 1e-12);
        assert_relative_eq!(tables.eff_min_liq[2], 2.5, max_relative = 1e-12);
        // 30 mm * 0.5 - 2.5 mm
        assert_relative_eq!(tables.eff_liq[2], 12.5, max_relative = 1e-12);
        assert_relative_eq!(
            tables.eff_max_liq[2],
            tables.theta_sat[2] * 50.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_scan_freezing_front_node_placement() {
        // Layer 1 carries a front; layer 2 below is thawed, so the front
        // is freezing from the top and the node sits under the frozen
        // slice
        let column = SoilColumn::from_layers([
            wet_layer(0.1).with_frozen(FrozenState::PartiallyFrozen, 0.5),
            wet_layer(0.1),
        ])
        .unwrap();
        let mut tables = LayerTables::new();

        let band = scan_column(&column, 1, 2, 0.2, 0.005, &mut tables).unwrap();
        assert_eq!(band.count, 2);
        assert_relative_eq!(tables.dzmm[1], 50.0, max_relative = 1e-12);
        assert_relative_eq!(tables.z_h[1], 100.0, max_relative = 1e-12);
        assert_relative_eq!(tables.node_mm[1], 75.0, max_relative = 1e-12);
        // Layer 2 sits under a partially frozen layer, so its slice is
        // treated as thawing; with no front of its own the node is
        // central either way
        assert_relative_eq!(tables.z_h[2], 200.0, max_relative = 1e-12);
        assert_relative_eq!(tables.node_mm[2], 150.0, max_relative = 1e-12);
    }

    #[test]
    fn test_scan_thawing_front_node_placement() {
        // A lone partially frozen layer above fully frozen ground thaws
        // from the top; the conducting slice hangs from the layer top
        let column = SoilColumn::from_layers([
            wet_layer(0.1).with_frozen(FrozenState::PartiallyFrozen, 0.5),
            wet_layer(0.1).with_frozen(FrozenState::Frozen, 1.0),
        ])
        .unwrap();
        let mut tables = LayerTables::new();

        let band = scan_column(&column, 1, 2, 0.2, 0.005, &mut tables).unwrap();
        assert_eq!(band, ActiveBand { first: 1, count: 1 });
        assert_relative_eq!(tables.dzmm[1], 50.0, max_relative = 1e-12);
        assert_relative_eq!(tables.z_h[1], 50.0, max_relative = 1e-12);
        assert_relative_eq!(tables.node_mm[1], 25.0, max_relative = 1e-12);
    }
}
