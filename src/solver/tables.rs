//! Per-layer working tables for one solve.
//!
//! The solver owns fixed-capacity arrays indexed by the 1-based solver
//! index, with one guard slot at each end (index 0 and
//! `MAX_SOIL_LAYERS + 1`). The flux formulas read `ind - 1` and
//! `ind + 1` unconditionally; guard slots stay at their cleared zero, so
//! a band-edge row sees zeros where a neighbor would be. Every table is
//! cleared at the start of each call and nothing persists across days.

use crate::MAX_SOIL_LAYERS;

/// Length of every working table: one slot per layer plus a guard slot
/// on each side.
pub(crate) const TABLE_LEN: usize = MAX_SOIL_LAYERS + 2;

/// Per-layer derived quantities populated by the scan and assembly passes.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LayerTables {
    // Captured from the column by the scan pass
    /// Campbell exponent
    pub bsw: [f64; TABLE_LEN],
    /// Saturated hydraulic conductivity (mm/s)
    pub k_sat: [f64; TABLE_LEN],
    /// Saturated matric potential (mm)
    pub psi_sat: [f64; TABLE_LEN],
    /// Saturated water content net of the minimum liquid
    pub theta_sat: [f64; TABLE_LEN],
    /// Adjusted layer thickness (mm)
    pub dzmm: [f64; TABLE_LEN],
    /// Node depth used for gradients (mm)
    pub node_mm: [f64; TABLE_LEN],
    /// Depth of the layer's lower interface (mm)
    pub z_h: [f64; TABLE_LEN],
    /// Effective liquid water above the minimum (mm)
    pub eff_liq: [f64; TABLE_LEN],
    /// Effective minimum liquid bound (mm)
    pub eff_min_liq: [f64; TABLE_LEN],
    /// Effective maximum liquid bound (mm)
    pub eff_max_liq: [f64; TABLE_LEN],

    // First assembly pass
    /// Volumetric water content
    pub theta: [f64; TABLE_LEN],
    /// Matric potential (mm), eq. 7.94
    pub psi: [f64; TABLE_LEN],
    /// Equilibrium water content, eq. 7.129
    pub theta_eq: [f64; TABLE_LEN],
    /// Equilibrium matric potential (mm), eq. 7.134
    pub psi_eq: [f64; TABLE_LEN],

    // Second assembly pass
    /// Hydraulic conductivity at the layer's lower interface (mm/s)
    pub k: [f64; TABLE_LEN],
    /// Flux entering through the layer top (mm/s), eq. 7.115
    pub q_in: [f64; TABLE_LEN],
    /// Flux leaving through the layer bottom (mm/s), eq. 7.116
    pub q_out: [f64; TABLE_LEN],
    /// d(psi)/d(theta) of the layer above, eq. 7.121
    pub dpsi_above: [f64; TABLE_LEN],
    /// d(psi)/d(theta) of the layer itself, eq. 7.122
    pub dpsi_self: [f64; TABLE_LEN],
    /// d(psi)/d(theta) of the layer below, eq. 7.123
    pub dpsi_below: [f64; TABLE_LEN],
    /// d(k)/d(theta) across the upper interface, eq. 7.124
    pub dk_upper: [f64; TABLE_LEN],
    /// d(k)/d(theta) across the lower interface, eq. 7.125
    pub dk_lower: [f64; TABLE_LEN],
    /// d(q_in)/d(theta) of the layer above, eq. 7.117
    pub dq_in_above: [f64; TABLE_LEN],
    /// d(q_in)/d(theta) of the layer itself, eq. 7.118
    pub dq_in_self: [f64; TABLE_LEN],
    /// d(q_out)/d(theta) of the layer itself, eq. 7.119
    pub dq_out_self: [f64; TABLE_LEN],
    /// d(q_out)/d(theta) of the layer below, eq. 7.120
    pub dq_out_below: [f64; TABLE_LEN],
}

impl LayerTables {
    pub fn new() -> Self {
        Self {
            bsw: [0.0; TABLE_LEN],
            k_sat: [0.0; TABLE_LEN],
            psi_sat: [0.0; TABLE_LEN],
            theta_sat: [0.0; TABLE_LEN],
            dzmm: [0.0; TABLE_LEN],
            node_mm: [0.0; TABLE_LEN],
            z_h: [0.0; TABLE_LEN],
            eff_liq: [0.0; TABLE_LEN],
            eff_min_liq: [0.0; TABLE_LEN],
            eff_max_liq: [0.0; TABLE_LEN],
            theta: [0.0; TABLE_LEN],
            psi: [0.0; TABLE_LEN],
            theta_eq: [0.0; TABLE_LEN],
            psi_eq: [0.0; TABLE_LEN],
            k: [0.0; TABLE_LEN],
            q_in: [0.0; TABLE_LEN],
            q_out: [0.0; TABLE_LEN],
            dpsi_above: [0.0; TABLE_LEN],
            dpsi_self: [0.0; TABLE_LEN],
            dpsi_below: [0.0; TABLE_LEN],
            dk_upper: [0.0; TABLE_LEN],
            dk_lower: [0.0; TABLE_LEN],
            dq_in_above: [0.0; TABLE_LEN],
            dq_in_self: [0.0; TABLE_LEN],
            dq_out_self: [0.0; TABLE_LEN],
            dq_out_below: [0.0; TABLE_LEN],
        }
    }

    /// Reset every table to zero.
    pub fn clear(&mut self) {
        self.bsw.fill(0.0);
        self.k_sat.fill(0.0);
        self.psi_sat.fill(0.0);
        self.theta_sat.fill(0.0);
        self.dzmm.fill(0.0);
        self.node_mm.fill(0.0);
        self.z_h.fill(0.0);
        self.eff_liq.fill(0.0);
        self.eff_min_liq.fill(0.0);
        self.eff_max_liq.fill(0.0);
        self.theta.fill(0.0);
        self.psi.fill(0.0);
        self.theta_eq.fill(0.0);
        self.psi_eq.fill(0.0);
        self.k.fill(0.0);
        self.q_in.fill(0.0);
        self.q_out.fill(0.0);
        self.dpsi_above.fill(0.0);
        self.dpsi_self.fill(0.0);
        self.dpsi_below.fill(0.0);
        self.dk_upper.fill(0.0);
        self.dk_lower.fill(0.0);
        self.dq_in_above.fill(0.0);
        self.dq_in_self.fill(0.0);
        self.dq_out_self.fill(0.0);
        self.dq_out_below.fill(0.0);
    }
}

/// Coefficients of the tridiagonal system, one row per active layer.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TridiagSystem {
    /// Sub-diagonal (coupling to the layer above)
    pub sub: [f64; TABLE_LEN],
    /// Main diagonal
    pub diag: [f64; TABLE_LEN],
    /// Super-diagonal (coupling to the layer below)
    pub sup: [f64; TABLE_LEN],
    /// Right-hand side
    pub rhs: [f64; TABLE_LEN],
}

impl TridiagSystem {
    pub fn new() -> Self {
        Self {
            sub: [0.0; TABLE_LEN],
            diag: [0.0; TABLE_LEN],
            sup: [0.0; TABLE_LEN],
            rhs: [0.0; TABLE_LEN],
        }
    }

    /// Reset every coefficient to zero.
    pub fn clear(&mut self) {
        self.sub.fill(0.0);
        self.diag.fill(0.0);
        self.sup.fill(0.0);
        self.rhs.fill(0.0);
    }
}
