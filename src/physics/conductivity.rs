//! Hydraulic conductivity relations.
//!
//! Conductivity at a layer interface follows CLM 4.5 eq. 7.89, evaluated
//! on the mean saturation of the two neighboring layers. The ice
//! impedance factor of the full equation collapses to one here because
//! only sufficiently unfrozen layers reach the solver:
//!
//! ```text
//! k = k_sat * [ 0.5*(theta_i + theta_j) / (0.5*(theta_sat_i + theta_sat_j)) ]^(2B+3)
//! ```
//!
//! The drain layer has no participating layer below it, so its lower
//! interface uses the layer's own saturation ratio.

/// Conductivity in mm/s at the interface below a layer, from the mean
/// saturation of the two neighbors (eq. 7.89). The 0.5 factors cancel;
/// they are kept so the code reads like the equation.
pub fn interface_conductivity(
    k_sat: f64,
    theta_upper: f64,
    theta_lower: f64,
    theta_sat_upper: f64,
    theta_sat_lower: f64,
    bsw: f64,
) -> f64 {
    k_sat
        * ((0.5 * (theta_upper + theta_lower)) / (0.5 * (theta_sat_upper + theta_sat_lower)))
            .powf(2.0 * bsw + 3.0)
}

/// Conductivity in mm/s at the drain layer's lower interface, from its
/// own saturation ratio.
pub fn drain_conductivity(k_sat: f64, theta: f64, theta_sat: f64, bsw: f64) -> f64 {
    k_sat * (theta / theta_sat).powf(2.0 * bsw + 3.0)
}

/// Sensitivity of interface conductivity to the water content of either
/// neighbor, d(k)/d(theta) (eqs. 7.124-7.125).
pub fn d_k_d_theta(
    k_sat: f64,
    theta_upper: f64,
    theta_lower: f64,
    theta_sat_upper: f64,
    theta_sat_lower: f64,
    bsw: f64,
) -> f64 {
    (2.0 * bsw + 3.0)
        * k_sat
        * ((0.5 * (theta_upper + theta_lower)) / (0.5 * (theta_sat_upper + theta_sat_lower)))
            .powf(2.0 * bsw + 2.0)
        * (0.5 / (0.5 * (theta_sat_upper + theta_sat_lower)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_saturated_interface_is_k_sat() {
        let k = interface_conductivity(0.176, 0.395, 0.395, 0.395, 0.395, 4.05);
        assert_relative_eq!(k, 0.176);
    }

    #[test]
    fn test_conductivity_scales_with_k_sat() {
        let k1 = interface_conductivity(1.0e-5, 0.25, 0.25, 0.35, 0.35, 4.0);
        let k2 = interface_conductivity(2.0e-5, 0.25, 0.25, 0.35, 0.35, 4.0);
        assert!(k2 > k1);
        assert_relative_eq!(k2, 2.0 * k1, max_relative = 1e-12);

        let d1 = drain_conductivity(1.0e-5, 0.25, 0.35, 4.0);
        let d2 = drain_conductivity(2.0e-5, 0.25, 0.35, 4.0);
        assert!(d2 > d1);
    }

    #[test]
    fn test_drier_soil_conducts_less() {
        let wet = interface_conductivity(1.0e-5, 0.3, 0.3, 0.35, 0.35, 4.0);
        let dry = interface_conductivity(1.0e-5, 0.2, 0.2, 0.35, 0.35, 4.0);
        assert!(dry < wet);
    }

    #[test]
    fn test_drain_form_matches_interface_with_equal_neighbors() {
        let own = drain_conductivity(1.0e-5, 0.25, 0.35, 4.0);
        let pair = interface_conductivity(1.0e-5, 0.25, 0.25, 0.35, 0.35, 4.0);
        assert_relative_eq!(own, pair, max_relative = 1e-12);
    }

    #[test]
    fn test_sensitivity_positive() {
        let dk = d_k_d_theta(1.0e-5, 0.25, 0.25, 0.35, 0.35, 4.0);
        assert!(dk > 0.0);
    }
}
