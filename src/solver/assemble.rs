//! Coefficient assembly: derive per-layer state and build the rows.
//!
//! Two passes over the active band. The first turns effective liquid
//! water into volumetric content, matric potential and the equilibrium
//! state (CLM 4.5 eqs. 7.94, 7.129, 7.134). The second derives interface
//! conductivities, inter-layer fluxes and their water-content
//! sensitivities (eqs. 7.89, 7.115-7.125), then stamps one tridiagonal
//! row per layer (eqs. 7.136-7.147).
//!
//! Band-edge rows never consume entries belonging to a missing neighbor;
//! those entries are left at their cleared zero rather than evaluated
//! with empty guard slots, which would divide by a zero water content.
//! Out-of-range saturation ratios and potentials are logged and kept:
//! the solve proceeds with the value that was computed.

use log::error;

use crate::physics::{conductivity, retention};
use crate::{DENSITY_WATER, SEC_IN_DAY};

use super::richards::DayForcing;
use super::scan::ActiveBand;
use super::tables::{LayerTables, TridiagSystem};

/// First pass: water content, matric potential and equilibrium state per
/// active layer.
pub(crate) fn compute_potentials(tables: &mut LayerTables, band: ActiveBand, z_watertab: f64) {
    for ind in band.indices() {
        tables.theta[ind] =
            tables.eff_liq[ind] / DENSITY_WATER / (tables.dzmm[ind] / 1.0e3);
        tables.psi[ind] = retention::matric_potential(
            tables.theta[ind],
            tables.theta_sat[ind],
            tables.psi_sat[ind],
            tables.bsw[ind],
        );

        let sat_ratio = tables.theta[ind] / tables.theta_sat[ind];
        if sat_ratio < 0.01 || sat_ratio > 1.0 {
            error!("saturation ratio out of range for layer {ind}: {sat_ratio}");
        }
        if tables.psi[ind] < -1.0e8 {
            error!(
                "matric potential out of range for layer {ind}: {}",
                tables.psi[ind]
            );
        }

        // The interval integrated here runs from the interface above to
        // the interface below; for the top row the upper bound is the
        // surface, read from the zeroed guard slot
        tables.theta_eq[ind] = retention::equilibrium_water_content(
            tables.theta_sat[ind],
            tables.psi_sat[ind],
            tables.bsw[ind],
            tables.z_h[ind - 1],
            tables.z_h[ind],
            z_watertab,
        );
        tables.psi_eq[ind] = retention::equilibrium_potential(
            tables.theta_eq[ind],
            tables.theta_sat[ind],
            tables.psi_sat[ind],
            tables.bsw[ind],
        );

        if tables.theta_eq[ind] / tables.theta_sat[ind] < 0.01 {
            error!("equilibrium saturation ratio out of range for layer {ind}");
        }
        if tables.psi_eq[ind] < -1.0e8 {
            error!(
                "equilibrium potential out of range for layer {ind}: {}",
                tables.psi_eq[ind]
            );
        }
    }
}

/// Second pass: conductivities, fluxes, sensitivities and the tridiagonal
/// rows.
///
/// Expects [`compute_potentials`] to have run on the same band.
pub(crate) fn assemble_rows(
    tables: &mut LayerTables,
    system: &mut TridiagSystem,
    band: ActiveBand,
    drain: usize,
    forcing: &DayForcing<'_>,
) {
    let delta_t = SEC_IN_DAY;

    for ind in band.indices() {
        // Interface conductivity below this layer (eq. 7.89); the drain
        // layer has no active layer below and uses its own ratio
        tables.k[ind] = if ind < drain {
            conductivity::interface_conductivity(
                tables.k_sat[ind],
                tables.theta[ind],
                tables.theta[ind + 1],
                tables.theta_sat[ind],
                tables.theta_sat[ind + 1],
                tables.bsw[ind],
            )
        } else {
            conductivity::drain_conductivity(
                tables.k_sat[ind],
                tables.theta[ind],
                tables.theta_sat[ind],
                tables.bsw[ind],
            )
        };

        // Fluxes across the upper and lower interfaces (eqs. 7.115-7.116).
        // Above the band k is zero, so q_in of the top row drops out
        tables.q_in[ind] = -tables.k[ind - 1]
            * ((tables.psi[ind - 1] - tables.psi[ind] + tables.psi_eq[ind]
                - tables.psi_eq[ind - 1])
                / (tables.node_mm[ind] - tables.node_mm[ind - 1]));
        tables.q_out[ind] = -tables.k[ind]
            * ((tables.psi[ind] - tables.psi[ind + 1] + tables.psi_eq[ind + 1]
                - tables.psi_eq[ind])
                / (tables.node_mm[ind + 1] - tables.node_mm[ind]));

        // Potential sensitivities (eqs. 7.121-7.123); the neighbor-facing
        // ones exist only where that neighbor is active
        if ind > band.first {
            tables.dpsi_above[ind] = retention::d_psi_d_theta(
                tables.psi[ind - 1],
                tables.theta[ind - 1],
                tables.bsw[ind - 1],
            );
        }
        tables.dpsi_self[ind] =
            retention::d_psi_d_theta(tables.psi[ind], tables.theta[ind], tables.bsw[ind]);
        if ind < drain {
            tables.dpsi_below[ind] = retention::d_psi_d_theta(
                tables.psi[ind + 1],
                tables.theta[ind + 1],
                tables.bsw[ind + 1],
            );
        }

        // Conductivity sensitivities across both interfaces
        // (eqs. 7.124-7.125)
        tables.dk_upper[ind] = conductivity::d_k_d_theta(
            tables.k_sat[ind - 1],
            tables.theta[ind - 1],
            tables.theta[ind],
            tables.theta_sat[ind - 1],
            tables.theta_sat[ind],
            tables.bsw[ind - 1],
        );
        tables.dk_lower[ind] = conductivity::d_k_d_theta(
            tables.k_sat[ind],
            tables.theta[ind],
            tables.theta[ind + 1],
            tables.theta_sat[ind],
            tables.theta_sat[ind + 1],
            tables.bsw[ind],
        );

        // Flux sensitivities (eqs. 7.117-7.120). Only the trailing
        // equilibrium term carries the node-distance normalization in
        // the gradient factors
        if ind > band.first {
            let d_node = tables.node_mm[ind] - tables.node_mm[ind - 1];
            tables.dq_in_above[ind] = -((tables.k[ind - 1] / d_node) * tables.dpsi_above[ind])
                - tables.dk_upper[ind]
                    * (tables.psi[ind - 1] - tables.psi[ind] + tables.psi_eq[ind]
                        - tables.psi_eq[ind - 1] / d_node);
        }
        {
            let d_node = tables.node_mm[ind] - tables.node_mm[ind - 1];
            tables.dq_in_self[ind] = (tables.k[ind - 1] / d_node) * tables.dpsi_self[ind]
                - tables.dk_upper[ind]
                    * (tables.psi[ind - 1] - tables.psi[ind] + tables.psi_eq[ind]
                        - tables.psi_eq[ind - 1] / d_node);
        }
        {
            let d_node = tables.node_mm[ind + 1] - tables.node_mm[ind];
            tables.dq_out_self[ind] = -((tables.k[ind] / d_node) * tables.dpsi_self[ind])
                - tables.dk_lower[ind]
                    * (tables.psi[ind] - tables.psi[ind + 1] + tables.psi_eq[ind + 1]
                        - tables.psi_eq[ind] / d_node);
        }
        if ind < drain {
            let d_node = tables.node_mm[ind + 1] - tables.node_mm[ind];
            tables.dq_out_below[ind] = (tables.k[ind] / d_node) * tables.dpsi_below[ind]
                - tables.dk_lower[ind]
                    * (tables.psi[ind] - tables.psi[ind + 1] + tables.psi_eq[ind + 1]
                        - tables.psi_eq[ind] / d_node);
        }

        // Row stamping: the layer's role in the band picks the boundary
        // terms
        let dt_term = tables.dzmm[ind] / delta_t;
        let top_row = ind == band.first;
        let drain_row = ind == drain;

        if top_row && drain_row {
            // Single active layer: infiltration enters; the only outflow
            // path is drainage, scaled by the baseflow fraction
            system.sub[ind] = 0.0;
            system.diag[ind] = tables.dq_out_self[ind] - dt_term;
            system.sup[ind] = tables.dq_out_below[ind] * forcing.base_flow;
            system.rhs[ind] = forcing.infiltration;
        } else if top_row {
            // Top row (eqs. 7.136-7.139): no coupling upward; surface
            // forcing enters here, together with the transpiration of
            // the layer below
            system.sub[ind] = 0.0;
            system.diag[ind] = tables.dq_out_self[ind] - dt_term;
            system.sup[ind] = tables.dq_out_below[ind];
            system.rhs[ind] = forcing.infiltration - tables.q_out[ind]
                + (forcing.evaporation + forcing.transpiration[ind]);
        } else if !drain_row {
            // Interior row (eqs. 7.140-7.143)
            system.sub[ind] = -tables.dq_in_above[ind];
            system.diag[ind] =
                tables.dq_out_self[ind] - tables.dq_in_self[ind] - dt_term;
            system.sup[ind] = tables.dq_out_below[ind];
            system.rhs[ind] =
                tables.q_in[ind] - tables.q_out[ind] + forcing.transpiration[ind - 1];
        } else {
            // Drain row (eqs. 7.144-7.147): no coupling downward and no
            // explicit outflow term; drainage is reported separately
            system.sub[ind] = -tables.dq_in_above[ind];
            system.diag[ind] = -tables.dq_in_self[ind] - dt_term;
            system.sup[ind] = 0.0;
            system.rhs[ind] = tables.q_in[ind] + forcing.transpiration[ind - 1];
        }
    }
}
