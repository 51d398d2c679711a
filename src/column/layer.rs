//! Soil layer types and hydraulic parameters.

use std::fmt;

use crate::DENSITY_WATER;

/// What a layer is made of.
///
/// Moss layers are excluded from the water solve: their hydraulic
/// parameters are unreliable and make the implicit scheme oscillate, so
/// they receive an approximate water content after each solve instead.
/// Organic and mineral layers participate normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Moss,
    Organic,
    Mineral,
}

impl LayerKind {
    /// Whether the layer takes part in the hydrology solve.
    pub fn is_hydrologically_active(&self) -> bool {
        !matches!(self, LayerKind::Moss)
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerKind::Moss => write!(f, "moss"),
            LayerKind::Organic => write!(f, "organic"),
            LayerKind::Mineral => write!(f, "mineral"),
        }
    }
}

/// Freeze status of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrozenState {
    /// Entirely frozen
    Frozen,
    /// Carrying a freezing or thawing front
    PartiallyFrozen,
    /// Entirely thawed
    Unfrozen,
}

impl FrozenState {
    /// Whether the layer is frozen through.
    pub fn is_frozen(&self) -> bool {
        matches!(self, FrozenState::Frozen)
    }

    /// Whether a phase-change front sits inside the layer.
    pub fn has_front(&self) -> bool {
        matches!(self, FrozenState::PartiallyFrozen)
    }
}

/// Campbell retention-curve parameters for a soil layer.
///
/// The presets carry the Clapp & Hornberger (1978) fitted values with
/// lengths in mm and conductivities in mm/s.
#[derive(Debug, Clone, PartialEq)]
pub struct HydraulicParams {
    /// Porosity (saturated volumetric water content), dimensionless
    pub porosity: f64,
    /// Saturated matric potential in mm (negative)
    pub psi_sat: f64,
    /// Saturated hydraulic conductivity in mm/s
    pub k_sat: f64,
    /// Campbell pore-size distribution exponent
    pub bsw: f64,
}

impl Default for HydraulicParams {
    fn default() -> Self {
        Self::loam()
    }
}

impl HydraulicParams {
    /// Clapp & Hornberger (1978) values for sand.
    pub fn sand() -> Self {
        Self {
            porosity: 0.395,
            psi_sat: -121.0,
            k_sat: 0.176,
            bsw: 4.05,
        }
    }

    /// Clapp & Hornberger (1978) values for loam.
    pub fn loam() -> Self {
        Self {
            porosity: 0.451,
            psi_sat: -478.0,
            k_sat: 6.95e-3,
            bsw: 5.39,
        }
    }

    /// Clapp & Hornberger (1978) values for clay.
    pub fn clay() -> Self {
        Self {
            porosity: 0.482,
            psi_sat: -405.0,
            k_sat: 1.28e-3,
            bsw: 11.4,
        }
    }
}

/// One layer in a soil column.
///
/// The depth of the layer top `z` and the 1-based solver index `solind`
/// are assigned by [`SoilColumn::push`](crate::column::SoilColumn::push);
/// layers are constructed with both unset.
#[derive(Debug, Clone, PartialEq)]
pub struct SoilLayer {
    /// Layer material
    pub kind: LayerKind,
    /// Thickness in meters
    pub dz: f64,
    /// Depth of the layer top in meters below the surface
    pub z: f64,
    /// Freeze status
    pub frozen: FrozenState,
    /// Frozen fraction of the layer thickness, in [0, 1]
    pub frozen_frac: f64,
    /// Minimum liquid water in mm (kg/m^2)
    pub min_liq: f64,
    /// Actual liquid water in mm (kg/m^2)
    pub liq: f64,
    /// Retention-curve parameters
    pub hydraulics: HydraulicParams,
    /// 1-based solver index
    pub solind: usize,
}

impl SoilLayer {
    /// Create an unfrozen, dry layer of the given kind and thickness.
    pub fn new(kind: LayerKind, dz: f64, hydraulics: HydraulicParams) -> Self {
        Self {
            kind,
            dz,
            z: 0.0,
            frozen: FrozenState::Unfrozen,
            frozen_frac: 0.0,
            min_liq: 0.0,
            liq: 0.0,
            hydraulics,
            solind: 0,
        }
    }

    /// Set the minimum and actual liquid water contents (mm).
    pub fn with_water(mut self, min_liq: f64, liq: f64) -> Self {
        self.min_liq = min_liq;
        self.liq = liq;
        self
    }

    /// Set the freeze status and frozen fraction.
    pub fn with_frozen(mut self, frozen: FrozenState, frozen_frac: f64) -> Self {
        self.frozen = frozen;
        self.frozen_frac = frozen_frac;
        self
    }

    /// Volumetric liquid water content, dimensionless.
    pub fn vol_liq(&self) -> f64 {
        self.liq / DENSITY_WATER / self.dz
    }

    /// Thickness of the unfrozen part of the layer, in meters.
    pub fn unfrozen_dz(&self) -> f64 {
        self.dz * (1.0 - self.frozen_frac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_layer_kind_activity() {
        assert!(!LayerKind::Moss.is_hydrologically_active());
        assert!(LayerKind::Organic.is_hydrologically_active());
        assert!(LayerKind::Mineral.is_hydrologically_active());
    }

    #[test]
    fn test_vol_liq() {
        let layer =
            SoilLayer::new(LayerKind::Mineral, 0.1, HydraulicParams::sand()).with_water(5.0, 30.0);
        // 30 mm of water over 0.1 m of soil is 30% by volume
        assert_relative_eq!(layer.vol_liq(), 0.3, max_relative = 1e-12);
    }

    #[test]
    fn test_unfrozen_dz() {
        let layer = SoilLayer::new(LayerKind::Mineral, 0.2, HydraulicParams::loam())
            .with_frozen(FrozenState::PartiallyFrozen, 0.25);
        assert_relative_eq!(layer.unfrozen_dz(), 0.15, max_relative = 1e-12);
    }

    #[test]
    fn test_preset_exponents_ordered() {
        // Finer textures hold water harder
        assert!(HydraulicParams::sand().bsw < HydraulicParams::loam().bsw);
        assert!(HydraulicParams::loam().bsw < HydraulicParams::clay().bsw);
    }
}
