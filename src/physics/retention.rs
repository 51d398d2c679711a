//! Campbell retention-curve relations.
//!
//! Matric potential follows Campbell (1974) as used by CLM 4.5
//! (Oleson et al. 2013, section 7.4):
//!
//! ```text
//! psi = psi_sat * (theta / theta_sat)^(-B)        (eq. 7.94)
//! ```
//!
//! Integrating the hydrostatic equilibrium profile above the water table
//! across one layer gives a layer-average equilibrium water content
//! (eq. 7.129); pushing it back through the retention curve gives an
//! equilibrium potential (eq. 7.134). The difference between actual and
//! equilibrium potentials is what drives the fluxes, which makes the
//! scheme stable against the gravity term.

/// Matric potential in mm from volumetric water content (eq. 7.94).
pub fn matric_potential(theta: f64, theta_sat: f64, psi_sat: f64, bsw: f64) -> f64 {
    psi_sat * (theta / theta_sat).powf(-bsw)
}

/// Sensitivity of matric potential to water content, d(psi)/d(theta)
/// (the derivative factor of eqs. 7.121-7.123).
pub fn d_psi_d_theta(psi: f64, theta: f64, bsw: f64) -> f64 {
    -bsw * psi / theta
}

/// Layer-average equilibrium volumetric water content between the
/// interface depths `z_upper` and `z_lower` (mm below the surface) for a
/// water table at `z_watertab` mm (eq. 7.129).
///
/// The expression integrates the equilibrium profile assuming the layer
/// sits above the water table; it is applied as-is below the water table
/// as well, where the resulting content can leave its physical range.
/// The assembly pass logs such excursions and continues.
pub fn equilibrium_water_content(
    theta_sat: f64,
    psi_sat: f64,
    bsw: f64,
    z_upper: f64,
    z_lower: f64,
    z_watertab: f64,
) -> f64 {
    let expn = 1.0 - 1.0 / bsw;
    theta_sat * psi_sat / ((z_lower - z_upper) * expn)
        * (((psi_sat - z_watertab + z_lower) / psi_sat).powf(expn)
            - ((psi_sat - z_watertab + z_upper) / psi_sat).powf(expn))
}

/// Equilibrium matric potential in mm (eq. 7.134).
pub fn equilibrium_potential(theta_eq: f64, theta_sat: f64, psi_sat: f64, bsw: f64) -> f64 {
    psi_sat * (theta_eq / theta_sat).powf(-bsw)
}
